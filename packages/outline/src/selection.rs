use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::NodeKind;

/// The outline location the content panels are focused on.
///
/// The default selection is `{type: none}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(rename = "type")]
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

impl Selection {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            path: None,
            context: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_context(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    pub fn is_none(&self) -> bool {
        self.kind == NodeKind::None
    }

    /// Same type and path. Context is ignored.
    pub fn same_target(&self, other: &Selection) -> bool {
        self.kind == other.kind && self.path == other.path
    }

    pub fn context_str(&self, key: &str) -> Option<&str> {
        self.context.as_ref()?.get(key)?.as_str()
    }
}
