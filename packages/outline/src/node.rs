use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Selection;

/// What a tree node (or a selection) points at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Info,
    Servers,
    Server,
    Paths,
    Path,
    Operation,
    Schemas,
    Schema,
    SecuritySchemes,
    SecurityScheme,
    Tags,
    Tag,
    Channels,
    Channel,
    ChannelOperation,
    Messages,
    Message,
    #[default]
    None,
}

/// One node of the navigation outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Deterministic, unique within one build
    pub id: String,

    pub label: String,

    #[serde(rename = "type")]
    pub node_type: NodeKind,

    /// Logical key of the item: path string, schema name, channel name...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

impl TreeNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, node_type: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type,
            path: None,
            children: Vec::new(),
            expanded: None,
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

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn expanded(mut self) -> Self {
        self.expanded = Some(true);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The selection that focusing this node produces.
    pub fn selection(&self) -> Selection {
        Selection {
            kind: self.node_type,
            path: self.path.clone(),
            context: self.context.clone(),
        }
    }
}

/// Depth-first search by id.
pub fn find_node<'a>(tree: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
    tree.iter().find_map(|node| {
        if node.id == id {
            Some(node)
        } else {
            find_node(&node.children, id)
        }
    })
}

/// Every node of the tree in pre-order.
pub fn flatten(tree: &[TreeNode]) -> Vec<&TreeNode> {
    let mut out = Vec::new();
    let mut stack: Vec<&TreeNode> = tree.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(node);
        stack.extend(node.children.iter().rev());
    }
    out
}
