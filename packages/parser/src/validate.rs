//! # Structural checks
//!
//! Minimal required-field checks per dialect. Results are advisory; callers
//! decide whether to surface them and never block editing on them.

use crate::dialect::Dialect;
use crate::document::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One missing or malformed required field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralError {
    /// Dotted location of the problem, e.g. `info.title`.
    pub path: String,
    pub message: String,
}

impl StructuralError {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<StructuralError>,
}

/// Run the dialect's required-field checks.
pub fn validate(document: &Document) -> ValidationReport {
    let mut errors = Vec::new();
    check_info(document, &mut errors);

    match document.dialect() {
        Dialect::OpenApi2 => {
            if !is_object(document.section("paths")) {
                errors.push(StructuralError::new("paths", "`paths` is required"));
            }
        }
        Dialect::OpenApi30 | Dialect::OpenApi31 => {
            if !is_object(document.section("paths")) && !is_object(document.section("webhooks")) {
                errors.push(StructuralError::new(
                    "paths",
                    "At least one of `paths` or `webhooks` is required",
                ));
            }
        }
        Dialect::AsyncApi2 => {
            let has_channel = document
                .section("channels")
                .and_then(Value::as_object)
                .map(|channels| !channels.is_empty())
                .unwrap_or(false);
            if !has_channel {
                errors.push(StructuralError::new(
                    "channels",
                    "At least one channel is required",
                ));
            }
        }
    }

    if !errors.is_empty() {
        tracing::debug!("{} structural problem(s) in {}", errors.len(), document.type_name());
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

fn check_info(document: &Document, errors: &mut Vec<StructuralError>) {
    let info = match document.section("info") {
        Some(Value::Object(info)) => info,
        _ => {
            errors.push(StructuralError::new("info", "`info` object is required"));
            return;
        }
    };

    for field in ["title", "version"] {
        if !is_present_scalar(info.get(field)) {
            errors.push(StructuralError::new(
                format!("info.{}", field),
                format!("`info.{}` is required", field),
            ));
        }
    }
}

fn is_object(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Object(_)))
}

fn is_present_scalar(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    }
}
