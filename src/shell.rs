//! Line-oriented toolbar for driving a [`WorkflowSession`] from a terminal.
//!
//! Each input line is one toolbar button or canvas gesture. While the save
//! dialog is waiting for a name, the next line is taken as that name, unless
//! it is `cancel`. Free text (labels, statements, workflow names) is taken
//! from the raw line, so spacing and indentation are kept.

use std::io::Write;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::domain::graph::{Connection, EdgeChange, GraphModel, NodeChange, Position};
use crate::domain::session::{Notice, NoticeLevel, RunOutcome, WorkflowSession};
use crate::domain::utils::id::{EdgeId, NodeId};
use crate::error::Result;

#[derive(Debug, Parser)]
#[command(multicall = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    /// Print nodes, statements and edges
    Nodes,
    /// Add a node at a random position
    Add,
    /// Select a node (node click)
    Select { id: String },
    /// Drag a node to a new position
    #[command(allow_negative_numbers = true)]
    Move { id: String, x: f64, y: f64 },
    /// Connect two nodes
    Connect { source: String, target: String },
    /// Remove an edge by id
    Disconnect { id: String },
    /// Delete the selected node
    Delete,
    /// Open the node dialog for the selected node
    Edit,
    /// Set the label in the node dialog
    Label {
        #[arg(num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Rename the node right away ("Save Node Name")
    ApplyLabel,
    /// Append an empty statement in the node dialog
    StmtAdd,
    /// Replace statement <index> in the node dialog
    StmtSet {
        index: usize,
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Delete statement <index> in the node dialog
    StmtDel { index: usize },
    /// Save the node dialog
    Commit,
    /// Close the node dialog without saving
    Cancel,
    /// Save the workflow; prompts for a name when none is given, `cancel` leaves the prompt
    Save {
        #[arg(num_args = 0.., trailing_var_arg = true)]
        name: Vec<String>,
    },
    /// Load a workflow from the catalog
    Load {
        #[arg(num_args = 1.., trailing_var_arg = true)]
        name: Vec<String>,
    },
    /// List cached workflows
    List,
    /// Fetch the workflow catalog again
    Refresh,
    /// Run the workflow and show the generated code
    Run,
    /// Print the generated code again
    Code,
    /// Close the code viewer
    CloseCode,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell<W: Write> {
    session: WorkflowSession,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(session: WorkflowSession, out: W) -> Self {
        Shell { session, out }
    }

    pub fn session(&self) -> &WorkflowSession {
        &self.session
    }

    pub fn into_parts(self) -> (WorkflowSession, W) {
        (self.session, self.out)
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        self.prompt()?;

        while let Some(line) = lines.next_line().await? {
            if self.execute(&line).await? == Flow::Quit {
                break;
            }
            self.prompt()?;
        }

        // Input ended while the save dialog was waiting.
        if self.session.state().name_prompt_open {
            self.session.cancel_save();
        }
        Ok(())
    }

    pub async fn execute(&mut self, line: &str) -> Result<Flow> {
        if self.session.state().name_prompt_open {
            if line.trim() == "cancel" {
                self.session.cancel_save();
                writeln!(self.out, "Save cancelled")?;
            } else {
                self.session.submit_save_name(Some(line)).await;
                self.flush_notices()?;
            }
            return Ok(Flow::Continue);
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                write!(self.out, "{}", e.render())?;
                return Ok(Flow::Continue);
            }
        };

        let flow = self.dispatch(command, line).await?;
        self.flush_notices()?;
        Ok(flow)
    }

    async fn dispatch(&mut self, command: ShellCommand, line: &str) -> Result<Flow> {
        match command {
            ShellCommand::Nodes => write_graph(&mut self.out, self.session.graph())?,
            ShellCommand::Add => {
                let id = self.session.add_node();
                writeln!(self.out, "Added node {}", id)?;
            }
            ShellCommand::Select { id } => {
                if !self.session.graph_mut().select_node(&NodeId::new(id.as_str())) {
                    writeln!(self.out, "No node {}", id)?;
                }
            }
            ShellCommand::Move { id, x, y } => {
                let change = NodeChange::Position { id: NodeId::new(id), position: Some(Position::new(x, y)) };
                self.session.apply_node_changes([change]);
            }
            ShellCommand::Connect { source, target } => {
                match self.session.graph_mut().connect(Connection::new(NodeId::new(source), NodeId::new(target))) {
                    Some(edge_id) => writeln!(self.out, "Added edge {}", edge_id)?,
                    None => writeln!(self.out, "Both endpoints must exist")?,
                }
            }
            ShellCommand::Disconnect { id } => {
                self.session.graph_mut().apply_edge_changes([EdgeChange::Remove { id: EdgeId::new(id) }]);
            }
            ShellCommand::Delete => match self.session.delete_selected_node() {
                Some(node) => writeln!(self.out, "Deleted node {}", node.id)?,
                None => writeln!(self.out, "Select a node other than start/end first")?,
            },
            ShellCommand::Edit => {
                if self.session.open_node_editor() {
                    self.write_editor()?;
                } else {
                    writeln!(self.out, "Select a node other than start/end first")?;
                }
            }
            ShellCommand::Label { text } => {
                let label = free_text(line, 1, &text);
                self.with_editor(|editor| editor.set_label_input(label))?
            }
            ShellCommand::ApplyLabel => {
                if !self.session.apply_node_label() {
                    writeln!(self.out, "Nothing renamed")?;
                }
            }
            ShellCommand::StmtAdd => self.with_editor(|editor| editor.add_statement())?,
            ShellCommand::StmtSet { index, text } => {
                let statement = free_text(line, 2, &text);
                self.with_editor(|editor| {
                    editor.update_statement(index, statement);
                })?
            }
            ShellCommand::StmtDel { index } => self.with_editor(|editor| {
                editor.remove_statement(index);
            })?,
            ShellCommand::Commit => {
                if !self.session.commit_node_editor() {
                    writeln!(self.out, "No node dialog open")?;
                }
            }
            ShellCommand::Cancel => self.session.cancel_node_editor(),
            ShellCommand::Save { name } => {
                self.session.begin_save();
                if name.is_empty() {
                    writeln!(self.out, "Enter a name for your workflow:")?;
                } else {
                    let name = free_text(line, 1, &name);
                    self.session.submit_save_name(Some(name.as_str())).await;
                }
            }
            ShellCommand::Load { name } => {
                let name = free_text(line, 1, &name);
                if !self.session.load(&name) {
                    writeln!(self.out, "No workflow named '{}'", name)?;
                }
            }
            ShellCommand::List => {
                let active = self.session.state().active_workflow.clone();
                for record in &self.session.state().catalog {
                    let marker = if active.as_deref() == Some(record.name.as_str()) { "*" } else { " " };
                    writeln!(self.out, "{} {} ({} nodes, {} edges)", marker, record.name, record.nodes.len(), record.edges.len())?;
                }
            }
            ShellCommand::Refresh => {
                if !self.session.refresh_catalog().await {
                    writeln!(self.out, "Catalog not refreshed, see log")?;
                }
            }
            ShellCommand::Run => {
                if let RunOutcome::CodeReady(code) = self.session.run().await {
                    writeln!(self.out, "{}", code)?;
                }
            }
            ShellCommand::Code => match self.session.state().code_viewer() {
                Some(viewer) => writeln!(self.out, "{}", viewer.code())?,
                None => writeln!(self.out, "No generated code")?,
            },
            ShellCommand::CloseCode => self.session.close_code_viewer(),
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn with_editor<F>(&mut self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut crate::domain::editor::NodeEditor),
    {
        match self.session.node_editor_mut() {
            Some(editor) => {
                edit(editor);
                self.write_editor()
            }
            None => {
                writeln!(self.out, "No node dialog open, use `edit` first")?;
                Ok(())
            }
        }
    }

    fn write_editor(&mut self) -> Result<()> {
        if let Some(editor) = &self.session.state().node_editor {
            writeln!(self.out, "Editing {} \"{}\"", editor.node_id(), editor.label_input())?;
            for (index, statement) in editor.statements().iter().enumerate() {
                writeln!(self.out, "  [{}] {}", index, statement)?;
            }
        }
        Ok(())
    }

    fn flush_notices(&mut self) -> Result<()> {
        let notices = self.session.drain_notices();
        write_notices(&mut self.out, &notices)
    }

    fn prompt(&mut self) -> Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()?;
        Ok(())
    }
}

/// The rest of `line` after its first `skip` words and the one separator that follows them.
///
/// Falls back to the parsed words when the line has nothing after them.
fn free_text(line: &str, skip: usize, words: &[String]) -> String {
    raw_tail(line, skip).map(str::to_string).unwrap_or_else(|| words.join(" "))
}

fn raw_tail(line: &str, skip: usize) -> Option<&str> {
    let mut rest = line;
    for _ in 0..skip {
        rest = rest.trim_start();
        let end = rest.find(char::is_whitespace)?;
        rest = &rest[end..];
    }

    let mut chars = rest.chars();
    chars.next()?;
    Some(chars.as_str())
}

pub fn write_notices<W: Write>(out: &mut W, notices: &[Notice]) -> Result<()> {
    for notice in notices {
        match notice.level {
            NoticeLevel::Info => writeln!(out, "{}", notice.message.green())?,
            NoticeLevel::Error => writeln!(out, "{}", notice.message.red())?,
        }
    }
    Ok(())
}

pub fn write_graph<W: Write>(out: &mut W, graph: &GraphModel) -> Result<()> {
    let selection = graph.selection();

    for node in graph.nodes() {
        let marker = if selection == Some(&node.id) { "*" } else { " " };
        writeln!(
            out,
            "{} {} [{}] \"{}\" @ ({:.0}, {:.0})",
            marker, node.id, node.node_type, node.data.label, node.position.x, node.position.y
        )?;
        for statement in &node.data.statements {
            writeln!(out, "      | {}", statement)?;
        }
    }

    for edge in graph.edges() {
        writeln!(out, "  {} -> {} ({})", edge.source, edge.target, edge.id)?;
    }
    Ok(())
}
