use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use workflow_editor::config::EditorConfig;
use workflow_editor::domain::session::RunOutcome;
use workflow_editor::shell::{Shell, write_graph, write_notices};
use workflow_editor::{logger, open_session};

#[derive(Debug, Parser)]
#[command(name = "workflow-editor", version, about = "Edit, save and run workflow graphs against a workflow service")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the stored workflows
    List,
    /// Print the nodes and edges of a stored workflow
    Show { name: String },
    /// Run a stored workflow and print the generated code
    Run {
        name: String,

        /// Write the code to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Interactive toolbar
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = Cli::parse();
    let config = EditorConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let mut session = open_session(&config).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::List => {
            for record in &session.state().catalog {
                writeln!(out, "{}\t{}\t{} nodes\t{} edges", record.id, record.name, record.nodes.len(), record.edges.len())?;
            }
        }
        Command::Show { name } => {
            if !session.load(&name) {
                bail!("No workflow named '{}'", name);
            }
            write_graph(&mut out, session.graph())?;
        }
        Command::Run { name, output } => {
            if !session.load(&name) {
                bail!("No workflow named '{}'", name);
            }

            let outcome = session.run().await;
            write_notices(&mut std::io::stderr(), &session.drain_notices())?;

            match outcome {
                RunOutcome::CodeReady(code) => match output {
                    Some(path) => {
                        std::fs::write(&path, code).with_context(|| format!("Failed to write '{}'", path.display()))?;
                        log::info!("Generated code written to '{}'", path.display());
                    }
                    None => writeln!(out, "{}", code)?,
                },
                RunOutcome::MissingCode => bail!("The workflow service returned no code"),
                RunOutcome::Failed(reason) => bail!("Running '{}' failed: {}", name, reason),
                RunOutcome::Stale => bail!("Run result for '{}' was superseded", name),
            }
        }
        Command::Shell => {
            write_notices(&mut out, &session.drain_notices())?;
            let mut shell = Shell::new(session, out);
            shell.run(BufReader::new(tokio::io::stdin())).await?;
        }
    }

    Ok(())
}
