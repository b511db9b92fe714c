//! # Outline builder
//!
//! Pure projection of a [`Document`] into an ordered [`TreeNode`] list.
//!
//! ## Rules
//!
//! - Sections come in a fixed order per dialect family
//! - A section is emitted only if it has at least one child; `paths: {}`
//!   produces no `paths` node
//! - Items inside a section (a path, a channel) are emitted even without
//!   operations
//! - Entries that are not objects are skipped
//! - Ids are deterministic; repeats within one build get a `~{n}` suffix

use apiforge_parser::{Dialect, Document, CHANNEL_OPERATIONS, HTTP_METHODS};
use serde_json::{Map, Value};

use crate::ids::IdAllocator;
use crate::{NodeKind, TreeNode};

/// Build the navigation tree for `document`.
pub fn build_tree(document: &Document) -> Vec<TreeNode> {
    let mut builder = Builder {
        document,
        ids: IdAllocator::default(),
    };

    let tree = match document.dialect() {
        Dialect::OpenApi2 => builder.openapi(Family::Swagger),
        Dialect::OpenApi30 | Dialect::OpenApi31 => builder.openapi(Family::Components),
        Dialect::AsyncApi2 => builder.asyncapi(),
    };

    tracing::debug!(
        "Built outline for {} with {} top-level nodes",
        document.type_name(),
        tree.len()
    );
    tree
}

/// Where an OpenAPI document keeps its reusable definitions.
#[derive(Clone, Copy)]
enum Family {
    /// 2.0: `definitions`, `securityDefinitions`
    Swagger,
    /// 3.x: `components.schemas`, `components.securitySchemes`
    Components,
}

struct Builder<'a> {
    document: &'a Document,
    ids: IdAllocator,
}

impl<'a> Builder<'a> {
    fn openapi(&mut self, family: Family) -> Vec<TreeNode> {
        let mut tree = Vec::new();
        tree.extend(self.info());
        tree.extend(self.indexed_servers());
        tree.extend(self.paths());

        match family {
            Family::Swagger => {
                let definitions = self.lookup("definitions");
                tree.extend(self.schemas(definitions, "definitions", "Definitions", "definition"));
                let security = self.lookup("securityDefinitions");
                tree.extend(self.security(security, "securityDefinitions", "Security Definitions"));
            }
            Family::Components => {
                let schemas = self.component("schemas");
                tree.extend(self.schemas(schemas, "schemas", "Schemas", "schema"));
                let security = self.component("securitySchemes");
                tree.extend(self.security(security, "securitySchemes", "Security Schemes"));
            }
        }

        tree.extend(self.tags());
        tree
    }

    fn asyncapi(&mut self) -> Vec<TreeNode> {
        let mut tree = Vec::new();
        tree.extend(self.info());
        tree.extend(self.named_servers());
        tree.extend(self.channels());
        tree.extend(self.messages());
        let schemas = self.component("schemas");
        tree.extend(self.schemas(schemas, "schemas", "Schemas", "schema"));
        tree
    }

    fn lookup(&self, key: &str) -> Option<&'a Value> {
        let document: &'a Document = self.document;
        document.section(key)
    }

    fn component(&self, name: &str) -> Option<&'a Value> {
        self.lookup("components")?.get(name)
    }

    fn section(
        &mut self,
        id: &str,
        label: &str,
        kind: NodeKind,
        children: Vec<TreeNode>,
    ) -> Option<TreeNode> {
        if children.is_empty() {
            return None;
        }
        let id = self.ids.allocate(id.to_string());
        Some(TreeNode::new(id, label, kind).expanded().with_children(children))
    }

    fn info(&mut self) -> Option<TreeNode> {
        let info = self.lookup("info")?.as_object()?;
        if info.is_empty() {
            return None;
        }
        let label = match info.get("title").and_then(Value::as_str) {
            Some(title) if !title.is_empty() => title,
            _ => "Info",
        };
        let id = self.ids.allocate("info".to_string());
        Some(TreeNode::new(id, label, NodeKind::Info))
    }

    /// OpenAPI `servers`: an array addressed by index.
    fn indexed_servers(&mut self) -> Option<TreeNode> {
        let servers = self.lookup("servers")?.as_array()?;
        let mut children = Vec::new();
        for (i, server) in servers.iter().enumerate() {
            let Some(server) = server.as_object() else {
                continue;
            };
            let label = server
                .get("url")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Server {}", i + 1));
            let id = self.ids.allocate(format!("server-{}", i));
            children.push(TreeNode::new(id, label, NodeKind::Server).with_path(i.to_string()));
        }
        self.section("servers", "Servers", NodeKind::Servers, children)
    }

    /// AsyncAPI `servers`: a map keyed by server name.
    fn named_servers(&mut self) -> Option<TreeNode> {
        let servers = self.lookup("servers")?.as_object()?;
        let children = self.named_items(servers, "server", NodeKind::Server);
        self.section("servers", "Servers", NodeKind::Servers, children)
    }

    fn paths(&mut self) -> Option<TreeNode> {
        let paths = self.lookup("paths")?.as_object()?;
        let mut children = Vec::new();
        for (path, item) in paths {
            let Some(item) = item.as_object() else {
                continue;
            };
            let id = self.ids.allocate(format!("path-{}", path));
            let operations = self.operations(path, item, &HTTP_METHODS, "path", NodeKind::Operation);
            children.push(
                TreeNode::new(id, path.as_str(), NodeKind::Path)
                    .with_path(path.as_str())
                    .with_children(operations),
            );
        }
        self.section("paths", "Paths", NodeKind::Paths, children)
    }

    fn channels(&mut self) -> Option<TreeNode> {
        let channels = self.lookup("channels")?.as_object()?;
        let mut children = Vec::new();
        for (name, item) in channels {
            let Some(item) = item.as_object() else {
                continue;
            };
            let id = self.ids.allocate(format!("channel-{}", name));
            let operations = self.operations(
                name,
                item,
                &CHANNEL_OPERATIONS,
                "channel",
                NodeKind::ChannelOperation,
            );
            children.push(
                TreeNode::new(id, name.as_str(), NodeKind::Channel)
                    .with_path(name.as_str())
                    .with_children(operations),
            );
        }
        self.section("channels", "Channels", NodeKind::Channels, children)
    }

    /// One node per operation key present on a path item or channel, in
    /// `order`.
    fn operations(
        &mut self,
        owner: &str,
        item: &Map<String, Value>,
        order: &[&str],
        prefix: &str,
        kind: NodeKind,
    ) -> Vec<TreeNode> {
        let context_key = match kind {
            NodeKind::ChannelOperation => "operation",
            _ => "method",
        };

        let mut nodes = Vec::new();
        for &op in order {
            let Some(operation) = item.get(op).and_then(Value::as_object) else {
                continue;
            };
            let verb = op.to_uppercase();
            let name = ["operationId", "summary"]
                .iter()
                .find_map(|key| {
                    operation
                        .get(*key)
                        .and_then(Value::as_str)
                        .filter(|name| !name.is_empty())
                })
                .unwrap_or(verb.as_str());
            let label = format!("{}: {}", verb, name);
            let id = self.ids.allocate(format!("{}-{}-{}", prefix, owner, op));
            nodes.push(
                TreeNode::new(id, label, kind)
                    .with_path(owner)
                    .with_context(context_key, op),
            );
        }
        nodes
    }

    fn schemas(
        &mut self,
        schemas: Option<&'a Value>,
        id: &str,
        label: &str,
        prefix: &str,
    ) -> Option<TreeNode> {
        let schemas = schemas?.as_object()?;
        let mut children = Vec::new();
        for (name, schema) in schemas {
            if !schema.is_object() {
                continue;
            }
            let node_id = self.ids.allocate(format!("{}-{}", prefix, name));
            children.push(
                TreeNode::new(node_id, name.as_str(), NodeKind::Schema)
                    .with_path(name.as_str())
                    .with_context("schemaName", name.as_str()),
            );
        }
        self.section(id, label, NodeKind::Schemas, children)
    }

    fn security(&mut self, schemes: Option<&'a Value>, id: &str, label: &str) -> Option<TreeNode> {
        let schemes = schemes?.as_object()?;
        let children = self.named_items(schemes, "security", NodeKind::SecurityScheme);
        self.section(id, label, NodeKind::SecuritySchemes, children)
    }

    fn messages(&mut self) -> Option<TreeNode> {
        let messages = self.component("messages")?.as_object()?;
        let children = self.named_items(messages, "message", NodeKind::Message);
        self.section("messages", "Messages", NodeKind::Messages, children)
    }

    fn tags(&mut self) -> Option<TreeNode> {
        let tags = self.lookup("tags")?.as_array()?;
        let mut children = Vec::new();
        for (i, tag) in tags.iter().enumerate() {
            let Some(tag) = tag.as_object() else {
                continue;
            };
            let node = match tag.get("name").and_then(Value::as_str) {
                Some(name) => {
                    let id = self.ids.allocate(format!("tag-{}", name));
                    TreeNode::new(id, name, NodeKind::Tag).with_path(name)
                }
                None => {
                    let id = self.ids.allocate(format!("tag-{}", i));
                    TreeNode::new(id, format!("Tag {}", i + 1), NodeKind::Tag)
                        .with_path(i.to_string())
                }
            };
            children.push(node);
        }
        self.section("tags", "Tags", NodeKind::Tags, children)
    }

    /// Leaf nodes for the object-valued entries of a name-keyed map.
    fn named_items(
        &mut self,
        entries: &Map<String, Value>,
        prefix: &str,
        kind: NodeKind,
    ) -> Vec<TreeNode> {
        let mut children = Vec::new();
        for (name, value) in entries {
            if !value.is_object() {
                continue;
            }
            let id = self.ids.allocate(format!("{}-{}", prefix, name));
            children.push(TreeNode::new(id, name.as_str(), kind).with_path(name.as_str()));
        }
        children
    }
}
