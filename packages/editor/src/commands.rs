//! # Commands
//!
//! Reversible units of document mutation.
//!
//! ## Variants
//!
//! - **ReplaceDocument**: whole-tree swap. Before and after snapshots are
//!   taken when the command is built, so later in-place edits of the live
//!   tree cannot leak into them. Costs one tree copy per snapshot.
//! - **SetField**: one value at a [`FieldPath`]; `None` means absent. The
//!   path is resolved again on every execute and undo. A value coming back
//!   into an absent slot is inserted, so array neighbours shift and a map
//!   key returns to the position it was removed from.
//! - **RenameKey**: rename a map key in place (a path, a channel, a schema).
//! - **Batch**: several commands undone and redone as one step.
//!
//! ## Merging
//!
//! Two adjacent `SetField`s on the same path collapse into one history entry
//! (first `old`, last `new`). A `RenameKey` followed by a rename of the key
//! it just produced collapses into a single rename.

use apiforge_parser::{Document, FieldPath, Segment, HTTP_METHODS};
use serde_json::Value;

use crate::{CommandError, DocumentState};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ReplaceDocument {
        description: String,
        before: Value,
        after: Value,
    },

    SetField {
        description: String,
        path: FieldPath,
        old: Option<Value>,
        new: Option<Value>,
        /// Map key position when the command was built
        position: Option<usize>,
    },

    RenameKey {
        description: String,
        parent: FieldPath,
        from: String,
        to: String,
    },

    /// Executed in order, undone in reverse order
    Batch {
        description: String,
        commands: Vec<Command>,
    },
}

impl Command {
    /// Swap the whole document. Both trees are snapshotted now.
    pub fn replace_document(
        before: &Document,
        after: &Document,
        description: impl Into<String>,
    ) -> Self {
        Command::ReplaceDocument {
            description: description.into(),
            before: before.snapshot(),
            after: after.snapshot(),
        }
    }

    /// Write `value` at `path`, capturing the current value for undo.
    pub fn set_field(
        document: &Document,
        path: impl Into<FieldPath>,
        value: impl Into<Value>,
        description: impl Into<String>,
    ) -> Self {
        let path = path.into();
        Command::SetField {
            description: description.into(),
            old: document.get(&path).cloned(),
            new: Some(value.into()),
            position: document.position(&path),
            path,
        }
    }

    /// Delete the value at `path`, capturing it for undo.
    pub fn remove_field(
        document: &Document,
        path: impl Into<FieldPath>,
        description: impl Into<String>,
    ) -> Self {
        let path = path.into();
        Command::SetField {
            description: description.into(),
            old: document.get(&path).cloned(),
            new: None,
            position: document.position(&path),
            path,
        }
    }

    pub fn rename_key(
        parent: impl Into<FieldPath>,
        from: impl Into<String>,
        to: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Command::RenameKey {
            description: description.into(),
            parent: parent.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn batch(description: impl Into<String>, commands: Vec<Command>) -> Self {
        Command::Batch {
            description: description.into(),
            commands,
        }
    }

    /// Edit a scalar field of `info` (`title`, `version`, `description`, ...).
    pub fn set_info_field(document: &Document, field: &str, value: impl Into<Value>) -> Self {
        Self::set_field(
            document,
            FieldPath::root().key("info").key(field),
            value,
            format!("Edit info {}", field),
        )
    }

    /// Edit a server URL. OpenAPI servers are addressed by index, AsyncAPI
    /// servers by name.
    pub fn set_server_url(document: &Document, server: impl Into<Segment>, url: &str) -> Self {
        let mut path = FieldPath::root().key("servers");
        path.push(server);
        Self::set_field(document, path.key("url"), url, "Edit server URL")
    }

    pub fn set_path_summary(document: &Document, path: &str, summary: &str) -> Self {
        Self::set_field(
            document,
            FieldPath::root().key("paths").key(path).key("summary"),
            summary,
            format!("Edit summary of {}", path),
        )
    }

    pub fn rename_path(from: &str, to: &str) -> Self {
        Self::rename_key(
            FieldPath::root().key("paths"),
            from,
            to,
            format!("Rename path {} to {}", from, to),
        )
    }

    /// Rename the tag at `index` and every operation reference to it.
    pub fn rename_tag(document: &Document, index: usize, new_name: &str) -> Self {
        let tag_name = FieldPath::root().key("tags").index(index).key("name");
        let old_name = document
            .get(&tag_name)
            .and_then(Value::as_str)
            .map(str::to_string);

        let mut commands = vec![Self::set_field(
            document,
            tag_name,
            new_name,
            "Rename tag",
        )];

        if let Some(old_name) = &old_name {
            for path in operation_tag_references(document, old_name) {
                commands.push(Self::set_field(document, path, new_name, "Retag operation"));
            }
        }

        let description = match old_name {
            Some(old_name) => format!("Rename tag {} to {}", old_name, new_name),
            None => format!("Rename tag to {}", new_name),
        };
        Self::batch(description, commands)
    }

    /// Label shown for the undo/redo action.
    pub fn description(&self) -> &str {
        match self {
            Command::ReplaceDocument { description, .. }
            | Command::SetField { description, .. }
            | Command::RenameKey { description, .. }
            | Command::Batch { description, .. } => description,
        }
    }

    pub fn execute(&self, state: &mut DocumentState) -> Result<(), CommandError> {
        match self {
            Command::ReplaceDocument { after, .. } => install_snapshot(state, after),
            Command::SetField {
                path,
                old,
                new,
                position,
                ..
            } => write_field(state, path, new.as_ref(), old.is_none(), *position),
            Command::RenameKey {
                parent, from, to, ..
            } => state.edit(|doc| doc.rename_key(parent, from, to)),
            Command::Batch { commands, .. } => execute_all(commands, state),
        }
    }

    pub fn undo(&self, state: &mut DocumentState) -> Result<(), CommandError> {
        match self {
            Command::ReplaceDocument { before, .. } => install_snapshot(state, before),
            Command::SetField {
                path,
                old,
                new,
                position,
                ..
            } => write_field(state, path, old.as_ref(), new.is_none(), *position),
            Command::RenameKey {
                parent, from, to, ..
            } => state.edit(|doc| doc.rename_key(parent, to, from)),
            Command::Batch { commands, .. } => undo_all(commands, state),
        }
    }

    /// Whether `next` (executed right after `self`) can share its history
    /// entry.
    pub fn can_merge_with(&self, next: &Command) -> bool {
        match (self, next) {
            (Command::SetField { path: a, .. }, Command::SetField { path: b, .. }) => a == b,
            (
                Command::RenameKey { parent: a, to, .. },
                Command::RenameKey { parent: b, from, .. },
            ) => a == b && to == from,
            (Command::ReplaceDocument { .. }, _)
            | (Command::SetField { .. }, _)
            | (Command::RenameKey { .. }, _)
            | (Command::Batch { .. }, _) => false,
        }
    }

    /// Combine with the command executed right after this one. Pairs that
    /// [`Command::can_merge_with`] rejects are wrapped in a batch so neither
    /// edit is lost.
    pub fn merge_with(self, next: Command) -> Command {
        match (self, next) {
            (
                Command::SetField {
                    path, old, position, ..
                },
                Command::SetField {
                    path: next_path,
                    new,
                    description,
                    ..
                },
            ) if path == next_path => Command::SetField {
                description,
                path,
                old,
                new,
                position,
            },
            (
                Command::RenameKey {
                    parent, from, to, ..
                },
                Command::RenameKey {
                    parent: next_parent,
                    from: next_from,
                    to: next_to,
                    description,
                },
            ) if parent == next_parent && to == next_from => Command::RenameKey {
                description,
                parent,
                from,
                to: next_to,
            },
            (first, second) => Command::Batch {
                description: second.description().to_string(),
                commands: vec![first, second],
            },
        }
    }
}

fn install_snapshot(state: &mut DocumentState, snapshot: &Value) -> Result<(), CommandError> {
    let document = Document::from_value(snapshot.clone())?;
    state.update_document(document);
    Ok(())
}

/// Bring `path` to `value`. `from_absent` says the slot is currently
/// empty, in which case the value is inserted rather than overwritten.
fn write_field(
    state: &mut DocumentState,
    path: &FieldPath,
    value: Option<&Value>,
    from_absent: bool,
    position: Option<usize>,
) -> Result<(), CommandError> {
    state.edit(|doc| match value {
        Some(value) if from_absent => doc.insert(path, value.clone(), position),
        Some(value) => doc.set(path, value.clone()).map(|_| ()),
        None => doc.remove(path).map(|_| ()),
    })
}

fn execute_all(commands: &[Command], state: &mut DocumentState) -> Result<(), CommandError> {
    for (done, command) in commands.iter().enumerate() {
        if let Err(err) = command.execute(state) {
            for applied in commands[..done].iter().rev() {
                if let Err(rollback) = applied.undo(state) {
                    tracing::error!("Rollback of `{}` failed: {}", applied.description(), rollback);
                }
            }
            return Err(err);
        }
    }
    Ok(())
}

fn undo_all(commands: &[Command], state: &mut DocumentState) -> Result<(), CommandError> {
    for (done, command) in commands.iter().rev().enumerate() {
        if let Err(err) = command.undo(state) {
            let start = commands.len() - done;
            for reverted in &commands[start..] {
                if let Err(rollback) = reverted.execute(state) {
                    tracing::error!("Reapply of `{}` failed: {}", reverted.description(), rollback);
                }
            }
            return Err(err);
        }
    }
    Ok(())
}

/// Paths of every `tags` entry equal to `tag` across all operations.
fn operation_tag_references(document: &Document, tag: &str) -> Vec<FieldPath> {
    let mut references = Vec::new();
    let Some(paths) = document.section("paths").and_then(Value::as_object) else {
        return references;
    };

    for (path, item) in paths {
        for method in HTTP_METHODS {
            let Some(tags) = item
                .get(method)
                .and_then(|op| op.get("tags"))
                .and_then(Value::as_array)
            else {
                continue;
            };
            for (i, entry) in tags.iter().enumerate() {
                if entry.as_str() == Some(tag) {
                    references.push(
                        FieldPath::root()
                            .key("paths")
                            .key(path.as_str())
                            .key(method)
                            .key("tags")
                            .index(i),
                    );
                }
            }
        }
    }
    references
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiforge_parser::parse;
    use serde_json::json;

    fn state_with(source: &str) -> DocumentState {
        let parsed = parse(source).unwrap();
        let mut state = DocumentState::new();
        let name = parsed.document.type_name();
        state.set_document(parsed.document, parsed.format, "mem://test", name);
        state
    }

    fn get<'a>(state: &'a DocumentState, path: &str) -> Option<&'a Value> {
        state.document().unwrap().get(&FieldPath::parse(path))
    }

    const SOURCE: &str = r#"{
        "openapi": "3.0.0",
        "info": {"title": "T", "version": "1"},
        "servers": [{"url": "https://a.example"}],
        "paths": {
            "/pets": {"get": {"tags": ["pets"]}, "post": {"tags": ["admin", "pets"]}},
            "/users": {"get": {"tags": ["users"]}}
        },
        "tags": [{"name": "pets"}, {"name": "users"}]
    }"#;

    #[test]
    fn test_set_field_execute_and_undo() {
        let mut state = state_with(SOURCE);
        let cmd = Command::set_info_field(state.document().unwrap(), "title", "T2");
        assert_eq!(cmd.description(), "Edit info title");

        cmd.execute(&mut state).unwrap();
        assert_eq!(get(&state, "info.title"), Some(&json!("T2")));

        cmd.undo(&mut state).unwrap();
        assert_eq!(get(&state, "info.title"), Some(&json!("T")));
    }

    #[test]
    fn test_set_field_on_absent_value_undoes_to_absent() {
        let mut state = state_with(SOURCE);
        let cmd = Command::set_info_field(state.document().unwrap(), "description", "Pets API");
        cmd.execute(&mut state).unwrap();
        assert_eq!(get(&state, "info.description"), Some(&json!("Pets API")));
        cmd.undo(&mut state).unwrap();
        assert_eq!(get(&state, "info.description"), None);
    }

    #[test]
    fn test_set_field_resolves_path_again_on_undo() {
        let mut state = state_with(SOURCE);
        let cmd = Command::set_path_summary(state.document().unwrap(), "/users", "Users");
        cmd.execute(&mut state).unwrap();

        // Reorder the paths map behind the command's back.
        Command::rename_path("/pets", "/animals").execute(&mut state).unwrap();

        cmd.undo(&mut state).unwrap();
        assert_eq!(get(&state, "paths./users.summary"), None);
        assert!(get(&state, "paths./animals").is_some());
    }

    #[test]
    fn test_remove_array_element_undo_and_redo() {
        let mut state = state_with(SOURCE);
        let cmd = Command::remove_field(state.document().unwrap(), "tags.0", "Remove tag");

        cmd.execute(&mut state).unwrap();
        assert_eq!(get(&state, "tags"), Some(&json!([{"name": "users"}])));

        cmd.undo(&mut state).unwrap();
        assert_eq!(
            get(&state, "tags"),
            Some(&json!([{"name": "pets"}, {"name": "users"}]))
        );

        cmd.execute(&mut state).unwrap();
        assert_eq!(get(&state, "tags"), Some(&json!([{"name": "users"}])));
    }

    #[test]
    fn test_append_array_element_undo_and_redo() {
        let mut state = state_with(SOURCE);
        let cmd = Command::set_field(
            state.document().unwrap(),
            "tags.2",
            json!({"name": "admin"}),
            "Add tag",
        );

        cmd.execute(&mut state).unwrap();
        cmd.undo(&mut state).unwrap();
        assert_eq!(get(&state, "tags.2"), None);
        cmd.execute(&mut state).unwrap();
        assert_eq!(
            get(&state, "tags"),
            Some(&json!([{"name": "pets"}, {"name": "users"}, {"name": "admin"}]))
        );
    }

    #[test]
    fn test_remove_map_key_undo_keeps_position() {
        let mut state = state_with(SOURCE);
        let cmd = Command::remove_field(state.document().unwrap(), "info.title", "Remove title");
        cmd.execute(&mut state).unwrap();
        cmd.undo(&mut state).unwrap();

        let keys: Vec<_> = get(&state, "info")
            .and_then(Value::as_object)
            .map(|info| info.keys().cloned().collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["title", "version"]);
    }

    #[test]
    fn test_leading_zero_schema_name() {
        let mut state = state_with(
            r#"{"openapi": "3.0.0", "components": {"schemas": {"007": {}}}}"#,
        );
        let cmd = Command::set_field(
            state.document().unwrap(),
            "components.schemas.007.type",
            "string",
            "Edit schema type",
        );
        cmd.execute(&mut state).unwrap();
        assert_eq!(
            get(&state, "components.schemas.007"),
            Some(&json!({"type": "string"}))
        );
        assert_eq!(get(&state, "components.schemas.7"), None);
    }

    #[test]
    fn test_server_url() {
        let mut state = state_with(SOURCE);
        let cmd = Command::set_server_url(state.document().unwrap(), 0usize, "https://b.example");
        cmd.execute(&mut state).unwrap();
        assert_eq!(get(&state, "servers.0.url"), Some(&json!("https://b.example")));
    }

    #[test]
    fn test_rename_tag_updates_operation_references() {
        let mut state = state_with(SOURCE);
        let cmd = Command::rename_tag(state.document().unwrap(), 0, "animals");
        assert_eq!(cmd.description(), "Rename tag pets to animals");

        cmd.execute(&mut state).unwrap();
        assert_eq!(get(&state, "tags.0.name"), Some(&json!("animals")));
        assert_eq!(get(&state, "paths[\"/pets\"].get.tags"), Some(&json!(["animals"])));
        assert_eq!(
            get(&state, "paths[\"/pets\"].post.tags"),
            Some(&json!(["admin", "animals"]))
        );
        assert_eq!(get(&state, "paths[\"/users\"].get.tags"), Some(&json!(["users"])));

        cmd.undo(&mut state).unwrap();
        assert_eq!(get(&state, "tags.0.name"), Some(&json!("pets")));
        assert_eq!(
            get(&state, "paths[\"/pets\"].post.tags"),
            Some(&json!(["admin", "pets"]))
        );
    }

    #[test]
    fn test_replace_document_snapshots_at_construction() {
        let mut state = state_with(SOURCE);
        let before = state.document().unwrap().clone();
        let mut after = before.clone();
        after.set(&FieldPath::parse("info.title"), json!("Replaced")).unwrap();
        let cmd = Command::replace_document(&before, &after, "Reformat");

        // Later edits of the source trees must not leak into the command.
        after.set(&FieldPath::parse("info.title"), json!("Mutated later")).unwrap();

        cmd.execute(&mut state).unwrap();
        assert_eq!(get(&state, "info.title"), Some(&json!("Replaced")));
        cmd.undo(&mut state).unwrap();
        assert_eq!(state.document(), Some(&before));
    }

    #[test]
    fn test_replace_document_can_change_dialect() {
        let mut state = state_with(SOURCE);
        let before = state.document().unwrap().clone();
        let after = Document::from_value(json!({"asyncapi": "2.6.0", "channels": {}})).unwrap();
        let cmd = Command::replace_document(&before, &after, "Convert");
        cmd.execute(&mut state).unwrap();
        assert_eq!(state.type_name(), Some("AsyncAPI 2.x"));
        cmd.undo(&mut state).unwrap();
        assert_eq!(state.type_name(), Some("OpenAPI 3.0"));
    }

    #[test]
    fn test_failed_batch_rolls_back() {
        let mut state = state_with(SOURCE);
        let before = state.document().unwrap().clone();
        let cmd = Command::batch(
            "Broken",
            vec![
                Command::set_info_field(state.document().unwrap(), "title", "T2"),
                Command::rename_path("/missing", "/x"),
            ],
        );
        assert!(cmd.execute(&mut state).is_err());
        assert_eq!(state.document(), Some(&before));
    }

    #[test]
    fn test_set_field_merge() {
        let doc = parse(SOURCE).unwrap().document;
        let first = Command::set_info_field(&doc, "title", "T2");
        let second = Command::SetField {
            description: "Edit info title".into(),
            path: FieldPath::parse("info.title"),
            old: Some(json!("T2")),
            new: Some(json!("T23")),
            position: Some(0),
        };
        let other_field = Command::set_info_field(&doc, "version", "2");

        assert!(first.can_merge_with(&second));
        assert!(!first.can_merge_with(&other_field));

        let merged = first.merge_with(second);
        assert_eq!(
            merged,
            Command::SetField {
                description: "Edit info title".into(),
                path: FieldPath::parse("info.title"),
                old: Some(json!("T")),
                new: Some(json!("T23")),
                position: Some(0),
            }
        );
    }

    #[test]
    fn test_rename_chain_merge() {
        let a = Command::rename_path("/a", "/ab");
        let b = Command::rename_path("/ab", "/abc");
        let unrelated = Command::rename_path("/x", "/y");
        assert!(a.can_merge_with(&b));
        assert!(!a.can_merge_with(&unrelated));
        match a.merge_with(b) {
            Command::RenameKey { from, to, .. } => {
                assert_eq!(from, "/a");
                assert_eq!(to, "/abc");
            }
            other => panic!("expected rename, got {:?}", other),
        }
    }

    #[test]
    fn test_unmergeable_pair_becomes_batch() {
        let doc = parse(SOURCE).unwrap().document;
        let a = Command::set_info_field(&doc, "title", "T2");
        let b = Command::rename_path("/pets", "/animals");
        assert!(!a.can_merge_with(&b));
        match a.merge_with(b) {
            Command::Batch { commands, .. } => assert_eq!(commands.len(), 2),
            other => panic!("expected batch, got {:?}", other),
        }
    }
}
