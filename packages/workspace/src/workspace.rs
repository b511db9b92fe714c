//! # Workspace
//!
//! Owns every piece of editor state for one open document and keeps the
//! derived views (outline, structural problems) in step with it.
//!
//! ## Flow
//!
//! ```text
//! load ──► DocumentState ──► outline + structural problems
//!              ▲
//! execute / undo / redo (CommandHistory)
//! ```
//!
//! Every successful change rebuilds the outline. Structural problems are
//! refreshed on load, and after edits when `validateOnChange` is set.

use apiforge_editor::{Command, CommandHistory, DocumentState};
use apiforge_outline::{build_tree, Selection, TreeNode};
use apiforge_parser::{parse, serialize, validate, Document, FieldPath};
use serde_json::Value;

use crate::{
    Host, HostMessage, ProblemStore, SelectionStore, ValidationProblem, WorkspaceConfig,
    WorkspaceError,
};

/// Host state key under which the current selection is persisted.
pub const SELECTION_STATE_KEY: &str = "apiforge.selection";

/// Id prefix of problems produced by the built-in structural check.
const STRUCTURE_PREFIX: &str = "structure-";

#[derive(Debug)]
pub struct Workspace {
    config: WorkspaceConfig,
    state: DocumentState,
    history: CommandHistory,
    selection: SelectionStore,
    problems: ProblemStore,
    outline: Vec<TreeNode>,
}

impl Workspace {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self {
            history: CommandHistory::with_max_history(config.max_history_size),
            selection: SelectionStore::with_max_history(config.max_selection_history),
            state: DocumentState::new(),
            problems: ProblemStore::new(),
            outline: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    pub fn document(&self) -> Option<&Document> {
        self.state.document()
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn problems(&self) -> &ProblemStore {
        &self.problems
    }

    pub fn outline(&self) -> &[TreeNode] {
        &self.outline
    }

    /// Read `uri` through the host and open it. The read is bounded by
    /// `readTimeoutMs` and never retried.
    pub async fn load(&mut self, host: &dyn Host, uri: &str) -> Result<(), WorkspaceError> {
        let content = match tokio::time::timeout(self.config.read_timeout(), host.read_file(uri)).await
        {
            Ok(content) => content?,
            Err(_) => {
                tracing::warn!("Timed out reading {}", uri);
                return Err(WorkspaceError::ReadTimeout {
                    uri: uri.to_string(),
                    timeout_ms: self.config.read_timeout_ms,
                });
            }
        };

        self.open(&content, uri)?;

        if let Some(saved) = host.get_state(SELECTION_STATE_KEY) {
            match serde_json::from_value::<Selection>(saved) {
                Ok(selection) => self.selection.select(selection),
                Err(err) => tracing::debug!("Ignoring stored selection: {}", err),
            }
        }
        Ok(())
    }

    /// Parse `content` and install it as the live document. On a parse
    /// failure the current state is left as it was.
    pub fn open(&mut self, content: &str, uri: &str) -> Result<(), WorkspaceError> {
        let parsed = parse(content).map_err(|err| {
            tracing::warn!("Failed to parse {}: {}", uri, err);
            err
        })?;

        let type_name = parsed.document.type_name();
        tracing::info!("Loaded {} ({})", uri, type_name);

        self.state
            .set_document(parsed.document, parsed.format, uri, type_name);
        self.history.clear();
        self.selection.clear();
        self.problems.clear();
        self.rebuild_outline();
        self.revalidate();
        Ok(())
    }

    pub fn execute(&mut self, command: Command) -> Result<(), WorkspaceError> {
        if !self.state.has_document() {
            return Err(WorkspaceError::NoDocument);
        }
        self.history.execute(command, &mut self.state)?;
        self.after_change();
        Ok(())
    }

    pub fn undo(&mut self) -> Result<bool, WorkspaceError> {
        let undone = self.history.undo(&mut self.state)?;
        if undone {
            self.after_change();
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, WorkspaceError> {
        let redone = self.history.redo(&mut self.state)?;
        if redone {
            self.after_change();
        }
        Ok(redone)
    }

    /// Edit one field of the live document.
    pub fn set_field(&mut self, path: FieldPath, value: Value) -> Result<(), WorkspaceError> {
        let document = self.state.document().ok_or(WorkspaceError::NoDocument)?;
        let description = format!("Edit {}", path);
        let command = Command::set_field(document, path, value, description);
        self.execute(command)
    }

    pub fn rename_key(
        &mut self,
        parent: FieldPath,
        from: &str,
        to: &str,
    ) -> Result<(), WorkspaceError> {
        let description = format!("Rename {} to {}", from, to);
        self.execute(Command::rename_key(parent, from, to, description))
    }

    /// Serialize the live document in its original format.
    pub fn render(&self) -> Result<String, WorkspaceError> {
        let document = self.state.document().ok_or(WorkspaceError::NoDocument)?;
        let format = self.state.format().ok_or(WorkspaceError::NoDocument)?;
        Ok(serialize(document, format)?)
    }

    /// Write the document back through the host. Any failure leaves the
    /// dirty flag set.
    pub async fn save(&mut self, host: &dyn Host) -> Result<(), WorkspaceError> {
        let uri = self
            .state
            .uri()
            .ok_or(WorkspaceError::NoDocument)?
            .to_string();
        let content = self.render()?;
        host.write_file(&uri, &content).await?;
        self.state.mark_saved();
        tracing::info!("Saved {}", uri);
        Ok(())
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection.select(selection);
    }

    /// Add externally reported problems. Returns how many were new.
    pub fn ingest_problems(&mut self, problems: Vec<ValidationProblem>) -> usize {
        self.problems.add_problems(problems)
    }

    /// Select the outline location of problem `id`.
    pub fn focus_problem(&mut self, id: &str) -> Option<Selection> {
        let selection = self.problems.get(id)?.selection();
        self.selection.select(selection.clone());
        Some(selection)
    }

    /// Dispatch one message from the content panels.
    pub async fn handle_message(
        &mut self,
        host: &dyn Host,
        message: HostMessage,
    ) -> Result<(), WorkspaceError> {
        tracing::debug!("Handling {:?}", message);
        match message {
            HostMessage::Undo => {
                self.undo()?;
            }
            HostMessage::Redo => {
                self.redo()?;
            }
            HostMessage::Select { selection } => {
                self.select(selection);
                self.persist_selection(host);
            }
            HostMessage::SetField { path, value } => self.set_field(path, value)?,
            HostMessage::RenameKey { parent, from, to } => self.rename_key(parent, &from, &to)?,
            HostMessage::GoBack => {
                if self.selection.go_back().is_some() {
                    self.persist_selection(host);
                }
            }
            HostMessage::GoForward => {
                if self.selection.go_forward().is_some() {
                    self.persist_selection(host);
                }
            }
            HostMessage::Save => self.save(host).await?,
        }
        Ok(())
    }

    /// Handle host messages until the host closes the stream. Failures are
    /// reported through `show_error` and do not stop the loop.
    pub async fn serve(&mut self, host: &dyn Host) {
        let mut subscription = host.on_message();
        while let Some(message) = subscription.next().await {
            if let Err(err) = self.handle_message(host, message).await {
                tracing::warn!("Message failed: {}", err);
                host.show_error(&err.to_string());
            }
        }
        tracing::debug!("Host message stream closed");
    }

    fn persist_selection(&self, host: &dyn Host) {
        match serde_json::to_value(self.selection.current()) {
            Ok(value) => host.set_state(SELECTION_STATE_KEY, value),
            Err(err) => tracing::debug!("Could not persist selection: {}", err),
        }
    }

    fn after_change(&mut self) {
        self.rebuild_outline();
        if self.config.validate_on_change {
            self.revalidate();
        }
    }

    fn rebuild_outline(&mut self) {
        self.outline = match self.state.document() {
            Some(document) => build_tree(document),
            None => Vec::new(),
        };
    }

    /// Replace the structural problems with a fresh check. Problems from
    /// other sources are kept, whatever their ids.
    fn revalidate(&mut self) {
        self.problems.remove_structural();
        let Some(document) = self.state.document() else {
            return;
        };

        let report = validate(document);
        let problems = report.errors.into_iter().enumerate().map(|(i, error)| {
            ValidationProblem::warning(format!("{}{}", STRUCTURE_PREFIX, i), error.message)
                .with_path(error.path)
                .structural()
        });
        self.problems.add_problems(problems);
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(WorkspaceConfig::default())
    }
}
