//! # Host collaborator
//!
//! The editor core never touches files, windows or webviews itself. The
//! embedding application implements [`Host`] and forwards user actions from
//! its content panels as [`HostMessage`]s.

use apiforge_outline::Selection;
use apiforge_parser::FieldPath;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for HostError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => HostError::NotFound(err.to_string()),
            _ => HostError::Io(err.to_string()),
        }
    }
}

/// Requests sent by the content panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    Undo,
    Redo,
    Select { selection: Selection },
    SetField { path: FieldPath, value: Value },
    RenameKey { parent: FieldPath, from: String, to: String },
    GoBack,
    GoForward,
    Save,
}

pub type MessageSender = mpsc::UnboundedSender<HostMessage>;

/// Receiving end of a host's message stream. Dropping it (or calling
/// [`Subscription::dispose`]) unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<HostMessage>,
}

impl Subscription {
    pub fn new(receiver: mpsc::UnboundedReceiver<HostMessage>) -> Self {
        Self { receiver }
    }

    /// Next message, or `None` once the host stops sending.
    pub async fn next(&mut self) -> Option<HostMessage> {
        self.receiver.recv().await
    }

    pub fn try_next(&mut self) -> Option<HostMessage> {
        self.receiver.try_recv().ok()
    }

    pub fn dispose(mut self) {
        self.receiver.close();
    }
}

/// A connected sender/subscription pair for [`Host::on_message`]
/// implementations.
pub fn message_channel() -> (MessageSender, Subscription) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, Subscription::new(rx))
}

#[async_trait]
pub trait Host: Send + Sync {
    async fn read_file(&self, uri: &str) -> Result<String, HostError>;

    async fn write_file(&self, uri: &str, content: &str) -> Result<(), HostError>;

    fn show_info(&self, message: &str);

    fn show_warning(&self, message: &str);

    fn show_error(&self, message: &str);

    /// Subscribe to messages from the content panels.
    fn on_message(&self) -> Subscription;

    /// Persisted per-document UI state.
    fn get_state(&self, key: &str) -> Option<Value>;

    fn set_state(&self, key: &str, value: Value);
}
