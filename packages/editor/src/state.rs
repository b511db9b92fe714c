//! # Document State Container
//!
//! Single owner of the live [`Document`] plus its format, uri, display name
//! and dirty flag.
//!
//! The container is a notifier, not a mutation authority: it never clones or
//! diffs. Commands either hand it a whole new tree
//! ([`DocumentState::update_document`]) or mutate the live tree in place
//! through [`DocumentState::edit`]. Both bump [`DocumentState::version`],
//! which readers use to know their derived views are stale.
//!
//! ## Lifecycle
//!
//! ```text
//! set_document → edit / update_document (dirty) → mark_saved → clear
//! ```

use apiforge_parser::{Document, Format, PathError};

use crate::CommandError;

#[derive(Debug, Default)]
pub struct DocumentState {
    document: Option<Document>,
    format: Option<Format>,
    uri: Option<String>,
    type_name: Option<String>,
    dirty: bool,

    /// Increments on every replace or edit
    version: u64,
}

impl DocumentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly loaded document. Clears the dirty flag.
    pub fn set_document(
        &mut self,
        document: Document,
        format: Format,
        uri: impl Into<String>,
        type_name: impl Into<String>,
    ) {
        self.document = Some(document);
        self.format = Some(format);
        self.uri = Some(uri.into());
        self.type_name = Some(type_name.into());
        self.dirty = false;
        self.version += 1;
    }

    /// Replace the document reference and mark it dirty.
    pub fn update_document(&mut self, document: Document) {
        self.type_name = Some(document.type_name().to_string());
        self.document = Some(document);
        self.touch();
    }

    /// Mutate the live document in place. The dirty flag and version only
    /// change if `edit` succeeds.
    pub fn edit<T>(
        &mut self,
        edit: impl FnOnce(&mut Document) -> Result<T, PathError>,
    ) -> Result<T, CommandError> {
        let document = self.document.as_mut().ok_or(CommandError::NoDocument)?;
        let result = edit(document)?;
        self.type_name = Some(document.type_name().to_string());
        self.touch();
        Ok(result)
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Drop the document and all metadata.
    pub fn clear(&mut self) {
        *self = Self {
            version: self.version + 1,
            ..Self::default()
        };
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    pub fn format(&self) -> Option<Format> {
        self.format
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.version += 1;
    }
}
