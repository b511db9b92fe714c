use apiforge_editor::HistoryError;
use apiforge_parser::{ParseError, SerializeError};
use thiserror::Error;

use crate::{ConfigError, HostError};

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Timed out after {timeout_ms}ms reading {uri}")]
    ReadTimeout { uri: String, timeout_ms: u64 },

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Serialize error: {0}")]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("No document is loaded")]
    NoDocument,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
