use apiforge_workspace::{message_channel, Host, HostError, Subscription};
use async_trait::async_trait;
use colored::Colorize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Host backed by the local file system and the terminal. URIs are file
/// paths.
#[derive(Debug, Default)]
pub struct FsHost {
    state: Mutex<HashMap<String, Value>>,
}

impl FsHost {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Host for FsHost {
    async fn read_file(&self, uri: &str) -> Result<String, HostError> {
        Ok(tokio::fs::read_to_string(uri).await?)
    }

    async fn write_file(&self, uri: &str, content: &str) -> Result<(), HostError> {
        tokio::fs::write(uri, content).await?;
        Ok(())
    }

    fn show_info(&self, message: &str) {
        println!("{} {}", "info:".blue().bold(), message);
    }

    fn show_warning(&self, message: &str) {
        eprintln!("{} {}", "warning:".yellow().bold(), message);
    }

    fn show_error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }

    /// The terminal has no content panels; the stream ends immediately.
    fn on_message(&self) -> Subscription {
        message_channel().1
    }

    fn get_state(&self, key: &str) -> Option<Value> {
        self.state.lock().ok()?.get(key).cloned()
    }

    fn set_state(&self, key: &str, value: Value) {
        if let Ok(mut state) = self.state.lock() {
            state.insert(key.to_string(), value);
        }
    }
}
