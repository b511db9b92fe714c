//! # Canonical tree → text
//!
//! JSON is pretty-printed with two-space indentation. YAML uses the emitter
//! defaults: two-space indentation and no line wrapping.

use crate::document::{Document, Format};
use crate::error::SerializeError;

/// Render a document in the given format.
pub fn serialize(document: &Document, format: Format) -> Result<String, SerializeError> {
    let mut output = match format {
        Format::Json => serde_json::to_string_pretty(document.root())
            .map_err(|e| SerializeError::Json(e.to_string()))?,
        Format::Yaml => serde_yaml::to_string(document.root())
            .map_err(|e| SerializeError::Yaml(e.to_string()))?,
    };

    if !output.ends_with('\n') {
        output.push('\n');
    }

    tracing::debug!("Serialized {} as {:?} ({} bytes)", document.type_name(), format, output.len());
    Ok(output)
}
