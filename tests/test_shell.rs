
use std::sync::Arc;

use service_mock::{MockWorkflowService, RunReply, three_step_record};
use workflow_editor::domain::graph::CanvasBounds;
use workflow_editor::domain::session::{RunState, WorkflowSession};
use workflow_editor::shell::{Flow, Shell};

async fn shell_with(service: Arc<MockWorkflowService>) -> Shell<Vec<u8>> {
    let session = WorkflowSession::open(service, CanvasBounds::default()).await;
    Shell::new(session, Vec::new())
}

async fn run_script(shell: &mut Shell<Vec<u8>>, script: &str) {
    let input = tokio::io::BufReader::new(script.as_bytes());
    shell.run(input).await.unwrap();
}

fn output(shell: Shell<Vec<u8>>) -> (WorkflowSession, String) {
    let (session, out) = shell.into_parts();
    (session, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_shell_load_and_print_graph() {
    let service = Arc::new(MockWorkflowService::new(vec![three_step_record("Nightly ETL")]));
    let mut shell = shell_with(service).await;

    run_script(&mut shell, "list\nload Nightly ETL\nnodes\n").await;

    let (session, out) = output(shell);
    assert!(out.contains("Nightly ETL (3 nodes, 2 edges)"));
    assert!(out.contains("X [default] \"Transform\""));
    assert!(out.contains("| df = df.dropna()"));
    assert!(out.contains("start -> X"));
    assert_eq!(session.state().active_workflow.as_deref(), Some("Nightly ETL"));
}

#[tokio::test]
async fn test_shell_save_prompt_takes_next_line_as_name() {
    let service = Arc::new(MockWorkflowService::new(Vec::new()));
    let mut shell = shell_with(service.clone()).await;

    run_script(&mut shell, "add\nsave\n   \nsave\nmy flow\n").await;

    let (session, out) = output(shell);
    assert!(out.contains("Enter a name for your workflow:"));
    assert!(out.contains("Workflow name is required!"));
    assert!(out.contains("Workflow \"my flow\" saved."));
    assert_eq!(service.saved_count(), 1);
    assert!(session.state().find_record("my flow").is_some());
    assert!(!session.state().name_prompt_open);
}

#[tokio::test]
async fn test_shell_node_dialog_edits_selected_node() {
    let service = Arc::new(MockWorkflowService::new(vec![three_step_record("A")]));
    let mut shell = shell_with(service).await;

    let script = "load A\nselect X\nedit\nlabel Clean up\nstmt-add\nstmt-set 1 df = df.distinct()\nstmt-del 0\ncommit\nnodes\n";
    run_script(&mut shell, script).await;

    let (session, out) = output(shell);
    assert!(out.contains("Editing X \"Transform\""));
    assert!(out.contains("[1] df = df.distinct()"));

    let node = session.graph().nodes().iter().find(|node| node.id.as_str() == "X").unwrap();
    assert_eq!(node.data.label, "Clean up");
    assert_eq!(node.data.statements, vec!["df = df.distinct()".to_string()]);
}

#[tokio::test]
async fn test_shell_refuses_to_edit_or_delete_sentinels() {
    let service = Arc::new(MockWorkflowService::new(Vec::new()));
    let mut shell = shell_with(service).await;

    run_script(&mut shell, "select start\nedit\ndelete\n").await;

    let (session, out) = output(shell);
    assert_eq!(out.matches("Select a node other than start/end first").count(), 2);
    assert_eq!(session.graph().nodes().len(), 2);
}

#[tokio::test]
async fn test_shell_run_prints_code_and_stops_at_quit() {
    let service = Arc::new(MockWorkflowService::new(Vec::new()));
    service.set_run_reply(RunReply::Code("print(1)".to_string()));
    let mut shell = shell_with(service.clone()).await;

    run_script(&mut shell, "connect start end\nrun\ncode\nquit\nadd\n").await;

    let (session, out) = output(shell);
    assert!(out.contains("Added edge reactflow__edge-start-end"));
    assert!(out.contains("Workflow executed! Code generated."));
    assert_eq!(out.matches("print(1)").count(), 2);
    assert!(matches!(session.state().run_state, RunState::ViewingCode(_)));
    assert_eq!(session.graph().nodes().len(), 2);
    assert_eq!(service.run_payloads.lock().unwrap()[0].edges.len(), 1);
}

#[tokio::test]
async fn test_shell_reports_unknown_input_and_continues() {
    let service = Arc::new(MockWorkflowService::new(Vec::new()));
    let mut shell = shell_with(service).await;

    assert_eq!(shell.execute("frobnicate").await.unwrap(), Flow::Continue);
    assert_eq!(shell.execute("load nothing here").await.unwrap(), Flow::Continue);
    assert_eq!(shell.execute("").await.unwrap(), Flow::Continue);
    assert_eq!(shell.execute("exit").await.unwrap(), Flow::Quit);

    let (_, out) = output(shell);
    assert!(out.contains("No workflow named 'nothing here'"));
}

#[tokio::test]
async fn test_shell_cancel_leaves_save_prompt_without_saving() {
    let service = Arc::new(MockWorkflowService::new(Vec::new()));
    let mut shell = shell_with(service.clone()).await;

    run_script(&mut shell, "save\ncancel\nsave\n").await;

    let (session, out) = output(shell);
    assert!(out.contains("Save cancelled"));
    assert_eq!(service.saved_count(), 0);
    assert!(session.state().find_record("cancel").is_none());
    assert!(!session.state().name_prompt_open);
}

#[tokio::test]
async fn test_shell_keeps_spacing_of_statements_labels_and_names() {
    let service = Arc::new(MockWorkflowService::new(vec![three_step_record("a  b")]));
    let mut shell = shell_with(service.clone()).await;

    let script = "load a  b\nselect X\nedit\nlabel Clean  up\nstmt-add\nstmt-set 1     return  x\ncommit\nsave  nightly  run\n";
    run_script(&mut shell, script).await;

    let (session, _) = output(shell);
    assert_eq!(session.state().active_workflow.as_deref(), Some("a  b"));

    let node = session.graph().nodes().iter().find(|node| node.id.as_str() == "X").unwrap();
    assert_eq!(node.data.label, "Clean  up");
    assert_eq!(node.data.statements, vec!["df = df.dropna()".to_string(), "    return  x".to_string()]);

    let saved = service.saved.lock().unwrap().clone();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name, "nightly  run");
}
