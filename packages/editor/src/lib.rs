//! # apiforge editor
//!
//! Editing engine for API specification documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: JSON/YAML text → Document           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: live document + command history    │
//! │  - DocumentState owns the one live tree     │
//! │  - Commands mutate it reversibly            │
//! │  - CommandHistory records, merges, bounds   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ outline / workspace: derived views          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is the source of truth**: outline and problems are rebuilt
//!    from it after every change
//! 2. **Commands address by path**: a [`FieldPath`] is resolved again on every
//!    execute and undo, so commands never hold references into the tree
//! 3. **Failures leave no trace**: a failing command changes neither the
//!    document nor the history

pub mod commands;
pub mod errors;
pub mod history;
pub mod state;

pub use commands::Command;
pub use errors::{CommandError, HistoryError};
pub use history::{CommandHistory, HistoryStatus, DEFAULT_MAX_HISTORY};
pub use state::DocumentState;

pub use apiforge_parser::{Document, FieldPath, Format};
