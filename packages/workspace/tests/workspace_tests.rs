//! Workspace behaviour against in-memory hosts

use apiforge_editor::Command;
use apiforge_parser::FieldPath;
use apiforge_workspace::{
    message_channel, Host, HostError, HostMessage, MessageSender, NodeKind, Selection,
    Subscription, ValidationProblem, Workspace, WorkspaceConfig, WorkspaceError,
    SELECTION_STATE_KEY,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

const PETSTORE: &str = r#"{
  "openapi": "3.0.0",
  "info": {"title": "T", "version": "1"},
  "paths": {"/a": {"get": {"operationId": "opA"}}}
}"#;

#[derive(Default)]
struct MemoryHost {
    files: Mutex<HashMap<String, String>>,
    state: Mutex<HashMap<String, Value>>,
    errors: Mutex<Vec<String>>,
    sender: Mutex<Option<MessageSender>>,
    subscription: Mutex<Option<Subscription>>,
    fail_writes: bool,
}

impl MemoryHost {
    fn with_file(uri: &str, content: &str) -> Self {
        let host = Self::default();
        host.files
            .lock()
            .unwrap()
            .insert(uri.to_string(), content.to_string());
        let (tx, subscription) = message_channel();
        *host.sender.lock().unwrap() = Some(tx);
        *host.subscription.lock().unwrap() = Some(subscription);
        host
    }

    fn send(&self, message: HostMessage) {
        if let Some(tx) = self.sender.lock().unwrap().as_ref() {
            tx.send(message).unwrap();
        }
    }

    /// Stop sending; `serve` returns once the queue drains.
    fn close(&self) {
        self.sender.lock().unwrap().take();
    }

    fn file(&self, uri: &str) -> Option<String> {
        self.files.lock().unwrap().get(uri).cloned()
    }
}

#[async_trait]
impl Host for MemoryHost {
    async fn read_file(&self, uri: &str) -> Result<String, HostError> {
        self.file(uri).ok_or_else(|| HostError::NotFound(uri.to_string()))
    }

    async fn write_file(&self, uri: &str, content: &str) -> Result<(), HostError> {
        if self.fail_writes {
            return Err(HostError::Io("disk full".to_string()));
        }
        self.files
            .lock()
            .unwrap()
            .insert(uri.to_string(), content.to_string());
        Ok(())
    }

    fn show_info(&self, _message: &str) {}

    fn show_warning(&self, _message: &str) {}

    fn show_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn on_message(&self) -> Subscription {
        match self.subscription.lock().unwrap().take() {
            Some(subscription) => subscription,
            None => message_channel().1,
        }
    }

    fn get_state(&self, key: &str) -> Option<Value> {
        self.state.lock().unwrap().get(key).cloned()
    }

    fn set_state(&self, key: &str, value: Value) {
        self.state.lock().unwrap().insert(key.to_string(), value);
    }
}

/// A host whose reads never complete.
struct StalledHost;

#[async_trait]
impl Host for StalledHost {
    async fn read_file(&self, _uri: &str) -> Result<String, HostError> {
        std::future::pending().await
    }

    async fn write_file(&self, _uri: &str, _content: &str) -> Result<(), HostError> {
        Ok(())
    }

    fn show_info(&self, _message: &str) {}

    fn show_warning(&self, _message: &str) {}

    fn show_error(&self, _message: &str) {}

    fn on_message(&self) -> Subscription {
        message_channel().1
    }

    fn get_state(&self, _key: &str) -> Option<Value> {
        None
    }

    fn set_state(&self, _key: &str, _value: Value) {}
}

fn title(workspace: &Workspace) -> Option<Value> {
    workspace
        .document()?
        .get(&FieldPath::parse("info.title"))
        .cloned()
}

#[tokio::test]
async fn test_load_builds_outline() {
    let host = MemoryHost::with_file("mem://pets.json", PETSTORE);
    let mut workspace = Workspace::default();
    workspace.load(&host, "mem://pets.json").await.unwrap();

    let ids: Vec<&str> = workspace.outline().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["info", "paths"]);
    assert_eq!(workspace.state().type_name(), Some("OpenAPI 3.0"));
    assert!(!workspace.state().is_dirty());
    assert!(workspace.problems().problems().is_empty());
}

#[tokio::test]
async fn test_load_times_out_on_stalled_host() {
    let config = WorkspaceConfig {
        read_timeout_ms: 20,
        ..WorkspaceConfig::default()
    };
    let mut workspace = Workspace::new(config);

    let err = workspace.load(&StalledHost, "mem://slow.yaml").await.unwrap_err();
    assert!(matches!(err, WorkspaceError::ReadTimeout { timeout_ms: 20, .. }));
    assert!(workspace.document().is_none());
}

#[tokio::test]
async fn test_failed_parse_installs_nothing() {
    let host = MemoryHost::with_file("mem://bad.json", "{\"info\": {}}");
    let mut workspace = Workspace::default();

    let err = workspace.load(&host, "mem://bad.json").await.unwrap_err();
    assert!(matches!(err, WorkspaceError::Parse(_)));
    assert!(workspace.document().is_none());
    assert!(workspace.outline().is_empty());
}

#[tokio::test]
async fn test_missing_file_is_a_host_error() {
    let host = MemoryHost::with_file("mem://other.json", PETSTORE);
    let mut workspace = Workspace::default();
    let err = workspace.load(&host, "mem://missing.json").await.unwrap_err();
    assert!(matches!(err, WorkspaceError::Host(HostError::NotFound(_))));
}

#[tokio::test]
async fn test_edit_undo_and_outline_refresh() {
    let host = MemoryHost::with_file("mem://pets.json", PETSTORE);
    let mut workspace = Workspace::default();
    workspace.load(&host, "mem://pets.json").await.unwrap();

    workspace
        .set_field(FieldPath::parse("info.title"), json!("T2"))
        .unwrap();
    assert_eq!(title(&workspace), Some(json!("T2")));
    assert_eq!(workspace.outline()[0].label, "T2");

    assert!(workspace.undo().unwrap());
    assert_eq!(title(&workspace), Some(json!("T")));
    assert_eq!(workspace.outline()[0].label, "T");

    assert!(workspace.redo().unwrap());
    assert_eq!(title(&workspace), Some(json!("T2")));
}

#[tokio::test]
async fn test_edits_refresh_structural_problems() {
    let host = MemoryHost::with_file("mem://pets.json", PETSTORE);
    let mut workspace = Workspace::default();
    workspace.load(&host, "mem://pets.json").await.unwrap();
    workspace.ingest_problems(vec![
        ValidationProblem::error("lint-1", "external"),
        ValidationProblem::error("structure-legacy", "external, unlucky id"),
    ]);

    let command = Command::remove_field(workspace.document().unwrap(), "info.version", "Remove version");
    workspace.execute(command).unwrap();

    let problems = workspace.problems();
    assert_eq!(problems.warning_count(), 1);
    assert_eq!(problems.error_count(), 2);
    let structural = problems.get("structure-0").unwrap();
    assert_eq!(structural.path.as_deref(), Some("info.version"));
    assert!(structural.structural);

    workspace.undo().unwrap();
    assert!(workspace.problems().get("structure-0").is_none());
    assert!(workspace.problems().get("lint-1").is_some());
    assert!(workspace.problems().get("structure-legacy").is_some());
}

#[tokio::test]
async fn test_save_writes_and_clears_dirty() {
    let host = MemoryHost::with_file("mem://pets.json", PETSTORE);
    let mut workspace = Workspace::default();
    workspace.load(&host, "mem://pets.json").await.unwrap();

    workspace
        .set_field(FieldPath::parse("info.title"), json!("Saved"))
        .unwrap();
    assert!(workspace.state().is_dirty());

    workspace.save(&host).await.unwrap();
    assert!(!workspace.state().is_dirty());
    let written = host.file("mem://pets.json").unwrap();
    assert!(written.contains("\"title\": \"Saved\""));
}

#[tokio::test]
async fn test_failed_save_keeps_dirty_flag() {
    let mut host = MemoryHost::with_file("mem://pets.json", PETSTORE);
    host.fail_writes = true;
    let mut workspace = Workspace::default();
    workspace.load(&host, "mem://pets.json").await.unwrap();
    workspace
        .set_field(FieldPath::parse("info.title"), json!("Unsaved"))
        .unwrap();

    assert!(workspace.save(&host).await.is_err());
    assert!(workspace.state().is_dirty());
}

#[tokio::test]
async fn test_focus_problem_selects_its_location() {
    let host = MemoryHost::with_file("mem://pets.json", PETSTORE);
    let mut workspace = Workspace::default();
    workspace.load(&host, "mem://pets.json").await.unwrap();
    workspace.ingest_problems(vec![ValidationProblem::error("r1", "missing responses")
        .with_path("paths./a.get.responses")]);

    let selection = workspace.focus_problem("r1").unwrap();
    assert_eq!(
        selection,
        Selection::new(NodeKind::Operation)
            .with_path("/a")
            .with_context("method", "get")
    );
    assert_eq!(workspace.selection().current(), &selection);
    assert!(workspace.focus_problem("unknown").is_none());
}

#[tokio::test]
async fn test_serve_dispatches_host_messages() {
    let host = MemoryHost::with_file("mem://pets.json", PETSTORE);
    let mut workspace = Workspace::default();
    workspace.load(&host, "mem://pets.json").await.unwrap();

    let operation = Selection::new(NodeKind::Operation)
        .with_path("/a")
        .with_context("method", "get");
    host.send(HostMessage::SetField {
        path: FieldPath::parse("info.title"),
        value: json!("From panel"),
    });
    host.send(HostMessage::Select {
        selection: Selection::new(NodeKind::Info),
    });
    host.send(HostMessage::Select {
        selection: operation.clone(),
    });
    host.send(HostMessage::GoBack);
    host.send(HostMessage::RenameKey {
        parent: FieldPath::parse("paths"),
        from: "/missing".to_string(),
        to: "/b".to_string(),
    });
    host.send(HostMessage::Save);
    host.close();

    workspace.serve(&host).await;

    assert_eq!(title(&workspace), Some(json!("From panel")));
    assert_eq!(workspace.selection().current().kind, NodeKind::Info);
    assert!(workspace.selection().can_go_forward());
    assert_eq!(
        host.get_state(SELECTION_STATE_KEY),
        Some(json!({"type": "info"}))
    );
    // The failed rename was reported, and serving carried on to the save.
    assert_eq!(host.errors.lock().unwrap().len(), 1);
    assert!(!workspace.state().is_dirty());
}

#[tokio::test]
async fn test_load_restores_persisted_selection() {
    let host = MemoryHost::with_file("mem://pets.json", PETSTORE);
    host.set_state(
        SELECTION_STATE_KEY,
        json!({"type": "path", "path": "/a"}),
    );
    let mut workspace = Workspace::default();
    workspace.load(&host, "mem://pets.json").await.unwrap();
    assert_eq!(
        workspace.selection().current(),
        &Selection::new(NodeKind::Path).with_path("/a")
    );
}

#[test]
fn test_execute_without_document() {
    let mut workspace = Workspace::default();
    let err = workspace
        .set_field(FieldPath::parse("info.title"), json!("x"))
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::NoDocument));
    assert_eq!(workspace.undo().unwrap(), false);
}
