//! # Command History
//!
//! Bounded undo/redo over [`Command`]s.
//!
//! ## Design
//!
//! - A command is recorded only after its `execute` succeeded
//! - An edit that merges with the top entry replaces it instead of pushing
//! - Every newly executed command clears the redo stack; undo/redo do not
//! - When the undo stack grows past `max_history_size` the oldest entry is
//!   dropped (0 = unlimited)
//! - A failing execute/undo/redo leaves both stacks as they were
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = CommandHistory::new();
//! let cmd = Command::set_info_field(state.document().unwrap(), "title", "Pets");
//! history.execute(cmd, &mut state)?;
//!
//! history.undo(&mut state)?;
//! history.redo(&mut state)?;
//! ```

use std::collections::VecDeque;

use crate::{Command, DocumentState, HistoryError};

pub const DEFAULT_MAX_HISTORY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStatus {
    Idle,
    Executing,
}

/// Undo/redo engine for document commands
#[derive(Debug)]
pub struct CommandHistory {
    /// Applied commands, most recent at the back
    undo_stack: VecDeque<Command>,

    /// Undone commands, most recent last
    redo_stack: Vec<Command>,

    /// Maximum number of undo levels (0 = unlimited)
    max_history_size: usize,

    status: HistoryStatus,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::with_max_history(DEFAULT_MAX_HISTORY)
    }

    pub fn with_max_history(max_history_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_history_size,
            status: HistoryStatus::Idle,
        }
    }

    pub fn status(&self) -> HistoryStatus {
        self.status
    }

    /// Run `command` and record it for undo.
    pub fn execute(
        &mut self,
        command: Command,
        state: &mut DocumentState,
    ) -> Result<(), HistoryError> {
        self.run(|| command.execute(state), command.description())?;

        match self.undo_stack.pop_back() {
            Some(top) if top.can_merge_with(&command) => {
                tracing::debug!("Merged `{}` into previous entry", command.description());
                self.undo_stack.push_back(top.merge_with(command));
            }
            Some(top) => {
                self.undo_stack.push_back(top);
                self.push(command);
            }
            None => self.push(command),
        }

        self.redo_stack.clear();
        Ok(())
    }

    /// Undo the most recent command. Returns `false` if there was nothing to
    /// undo.
    pub fn undo(&mut self, state: &mut DocumentState) -> Result<bool, HistoryError> {
        self.guard()?;
        let Some(command) = self.undo_stack.pop_back() else {
            return Ok(false);
        };

        match self.run(|| command.undo(state), command.description()) {
            Ok(()) => {
                tracing::debug!("Undid `{}`", command.description());
                self.redo_stack.push(command);
                Ok(true)
            }
            Err(err) => {
                self.undo_stack.push_back(command);
                Err(err)
            }
        }
    }

    /// Re-execute the most recently undone command. Returns `false` if there
    /// was nothing to redo.
    pub fn redo(&mut self, state: &mut DocumentState) -> Result<bool, HistoryError> {
        self.guard()?;
        let Some(command) = self.redo_stack.pop() else {
            return Ok(false);
        };

        match self.run(|| command.execute(state), command.description()) {
            Ok(()) => {
                tracing::debug!("Redid `{}`", command.description());
                self.undo_stack.push_back(command);
                Ok(true)
            }
            Err(err) => {
                self.redo_stack.push(command);
                Err(err)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.status == HistoryStatus::Idle && !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        self.status == HistoryStatus::Idle && !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(Command::description)
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(Command::description)
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_history_size(&self) -> usize {
        self.max_history_size
    }

    /// Change the bound, evicting the oldest entries if needed.
    pub fn set_max_history_size(&mut self, max_history_size: usize) {
        self.max_history_size = max_history_size;
        self.evict();
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn guard(&self) -> Result<(), HistoryError> {
        match self.status {
            HistoryStatus::Idle => Ok(()),
            HistoryStatus::Executing => Err(HistoryError::Reentrant),
        }
    }

    fn run<F>(&mut self, body: F, description: &str) -> Result<(), HistoryError>
    where
        F: FnOnce() -> Result<(), crate::CommandError>,
    {
        self.guard()?;
        self.status = HistoryStatus::Executing;
        let result = body();
        self.status = HistoryStatus::Idle;

        result.map_err(|err| {
            tracing::debug!("`{}` failed: {}", description, err);
            HistoryError::command(description, err)
        })
    }

    fn push(&mut self, command: Command) {
        tracing::debug!("Executed `{}`", command.description());
        self.undo_stack.push_back(command);
        self.evict();
    }

    fn evict(&mut self) {
        if self.max_history_size == 0 {
            return;
        }
        while self.undo_stack.len() > self.max_history_size {
            if let Some(dropped) = self.undo_stack.pop_front() {
                tracing::debug!("Evicted `{}` from history", dropped.description());
            }
        }
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}
