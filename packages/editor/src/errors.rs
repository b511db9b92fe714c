//! Error types for the editor

use apiforge_parser::{ParseError, PathError};
use thiserror::Error;

/// Failure inside a command's `execute` or `undo`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("No document is loaded")]
    NoDocument,

    #[error("Path error: {0}")]
    Path(#[from] PathError),

    #[error("Snapshot is not a valid document: {0}")]
    Snapshot(#[from] ParseError),
}

/// Failure surfaced by [`crate::CommandHistory`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    #[error("A command is already executing")]
    Reentrant,

    #[error("`{description}` failed: {source}")]
    Command {
        description: String,
        source: CommandError,
    },
}

impl HistoryError {
    pub(crate) fn command(description: &str, source: CommandError) -> Self {
        Self::Command {
            description: description.to_string(),
            source,
        }
    }
}
