//! # apiforge workspace
//!
//! Composition root of the editing engine. A [`Workspace`] owns the live
//! document, its command history, the outline, the selection and the
//! validation problems, and talks to the outside world through a [`Host`].

pub mod config;
pub mod error;
pub mod host;
pub mod path_mapper;
pub mod problems;
pub mod selection;
pub mod workspace;

pub use config::{ConfigError, WorkspaceConfig, DEFAULT_CONFIG_NAME};
pub use error::WorkspaceError;
pub use host::{message_channel, Host, HostError, HostMessage, MessageSender, Subscription};
pub use path_mapper::selection_for_path;
pub use problems::{ProblemStore, Severity, ValidationProblem};
pub use selection::{SelectionStore, DEFAULT_MAX_SELECTION_HISTORY};
pub use workspace::{Workspace, SELECTION_STATE_KEY};

pub use apiforge_outline::{NodeKind, Selection, TreeNode};
