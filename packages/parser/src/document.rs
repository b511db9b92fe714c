//! # Canonical document
//!
//! A [`Document`] is the decoded specification tree plus the [`Dialect`]
//! derived from it. The tree is a `serde_json::Value` object whose maps keep
//! insertion order, so schema and path order survive a load/save cycle.
//!
//! Every write goes through [`Document::set`], [`Document::remove`] or
//! [`Document::rename_key`]. Writes to a discriminator re-derive the dialect
//! and are rolled back if the result is not a recognized dialect.

use crate::dialect::{version_string, Dialect};
use crate::error::{ParseError, ParseResult, PathError};
use crate::path::{FieldPath, Segment};
use serde_json::{Map, Value};

/// Surface syntax of a specification file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Sniff the format: a leading `{` or `[` means JSON, anything else YAML.
    /// Returns `None` for blank input.
    pub fn detect(content: &str) -> Option<Self> {
        match content.trim_start().chars().next()? {
            '{' | '[' => Some(Format::Json),
            _ => Some(Format::Yaml),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }
}

/// Canonical in-memory specification document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
    dialect: Dialect,
}

impl Document {
    /// Wrap a decoded tree, deriving its dialect.
    pub fn from_value(root: Value) -> ParseResult<Self> {
        let dialect = match &root {
            Value::Object(map) => Dialect::detect(map)?,
            other => {
                return Err(ParseError::NotAnObject {
                    found: kind_name(other),
                })
            }
        };
        Ok(Self { root, dialect })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Deep copy of the tree, detached from later in-place edits.
    pub fn snapshot(&self) -> Value {
        self.root.clone()
    }

    /// `OpenAPI 3.0`, `AsyncAPI 2.x`, ...
    pub fn type_name(&self) -> &'static str {
        self.dialect.type_name()
    }

    pub fn is_openapi(&self) -> bool {
        self.dialect.is_openapi()
    }

    pub fn is_asyncapi(&self) -> bool {
        self.dialect.is_asyncapi()
    }

    /// Raw version string of the discriminator, e.g. `3.0.3`.
    pub fn version(&self) -> String {
        self.section(self.dialect.discriminator())
            .map(version_string)
            .unwrap_or_default()
    }

    /// Top-level value by key.
    pub fn section(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Resolve a path. Index segments address arrays and also match the
    /// decimal key in objects (`responses.200`).
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(&self.root, |value, segment| child(value, segment))
    }

    /// Write `value` at `path`, returning what was there before.
    ///
    /// Every parent must already exist. The last segment may name a new map
    /// key or the slot one past the end of an array (append).
    pub fn set(&mut self, path: &FieldPath, value: Value) -> Result<Option<Value>, PathError> {
        let (parent_path, last) = path.split_last().ok_or(PathError::EmptyPath)?;
        let previous = {
            let parent = self.resolve_mut(&parent_path)?;
            match parent {
                Value::Object(map) => map.insert(last.as_key(), value),
                Value::Array(items) => {
                    let index = array_index(&parent_path, last, items.len())?;
                    if index == items.len() {
                        items.push(value);
                        None
                    } else {
                        Some(std::mem::replace(&mut items[index], value))
                    }
                }
                other => return Err(not_a_container(&parent_path, last, other)),
            }
        };

        self.rederive_dialect(path, |doc| {
            let _ = match previous.clone() {
                Some(old) => doc.set(path, old),
                None => doc.remove(path),
            };
        })?;

        Ok(previous)
    }

    /// Put `value` back into a slot that is currently absent.
    ///
    /// Array slots shift later elements up (`Vec::insert`). Map keys go to
    /// `position` when given, otherwise to the end; a key that already
    /// exists keeps its place and only takes the new value.
    pub fn insert(
        &mut self,
        path: &FieldPath,
        value: Value,
        position: Option<usize>,
    ) -> Result<(), PathError> {
        let (parent_path, last) = path.split_last().ok_or(PathError::EmptyPath)?;
        {
            let parent = self.resolve_mut(&parent_path)?;
            match parent {
                Value::Object(map) => {
                    let key = last.as_key();
                    match position {
                        Some(index) if !map.contains_key(&key) => {
                            let index = index.min(map.len());
                            map.shift_insert(index, key, value);
                        }
                        _ => {
                            map.insert(key, value);
                        }
                    }
                }
                Value::Array(items) => {
                    let index = array_index(&parent_path, last, items.len())?;
                    items.insert(index, value);
                }
                other => return Err(not_a_container(&parent_path, last, other)),
            }
        }

        self.rederive_dialect(path, |doc| {
            let _ = doc.remove(path);
        })
    }

    /// Position of the map key addressed by `path` within its parent, if the
    /// parent is an object holding that key.
    pub fn position(&self, path: &FieldPath) -> Option<usize> {
        let (parent_path, last) = path.split_last()?;
        let key = last.as_key();
        self.get(&parent_path)?
            .as_object()?
            .keys()
            .position(|k| *k == key)
    }

    /// Remove the value at `path`. Removing something absent is a no-op that
    /// returns `None`. Map key order of the remaining entries is kept.
    pub fn remove(&mut self, path: &FieldPath) -> Result<Option<Value>, PathError> {
        let (parent_path, last) = path.split_last().ok_or(PathError::EmptyPath)?;
        let removed = {
            let parent = self.resolve_mut(&parent_path)?;
            match parent {
                Value::Object(map) => {
                    let key = last.as_key();
                    let position = map.keys().position(|k| *k == key);
                    map.shift_remove(&key).map(|old| (old, position))
                }
                Value::Array(items) => match last.as_index() {
                    Some(index) if index < items.len() => Some((items.remove(index), None)),
                    Some(_) => None,
                    None => {
                        return Err(PathError::NotAContainer {
                            path: parent_path.to_string(),
                            segment: last.to_string(),
                            found: "an array",
                        })
                    }
                },
                other => return Err(not_a_container(&parent_path, last, other)),
            }
        };

        let Some((old, position)) = removed else {
            return Ok(None);
        };
        let restore = old.clone();
        self.rederive_dialect(path, |doc| {
            let _ = doc.insert(path, restore, position);
        })?;

        Ok(Some(old))
    }

    /// Rename a map key under `parent`, keeping its position.
    pub fn rename_key(&mut self, parent: &FieldPath, from: &str, to: &str) -> Result<(), PathError> {
        let map = match self.resolve_mut(parent)? {
            Value::Object(map) => map,
            other => {
                return Err(not_a_container(parent, &Segment::Key(from.to_string()), other));
            }
        };

        if !map.contains_key(from) {
            return Err(PathError::NotFound(parent.clone().key(from).to_string()));
        }
        if from == to {
            return Ok(());
        }
        if map.contains_key(to) {
            return Err(PathError::KeyExists {
                path: parent.to_string(),
                key: to.to_string(),
            });
        }

        let entries = std::mem::take(map);
        *map = entries
            .into_iter()
            .map(|(k, v)| if k == from { (to.to_string(), v) } else { (k, v) })
            .collect::<Map<String, Value>>();

        if parent.is_root() && (Dialect::is_discriminator(from) || Dialect::is_discriminator(to)) {
            let touched = FieldPath::root().key(to);
            self.rederive_dialect(&touched, |doc| {
                let _ = doc.rename_key(&FieldPath::root(), to, from);
            })?;
        }

        Ok(())
    }

    fn resolve_mut(&mut self, path: &FieldPath) -> Result<&mut Value, PathError> {
        let mut current = &mut self.root;
        for (depth, segment) in path.segments().iter().enumerate() {
            let here = FieldPath::from_segments(path.segments()[..depth].to_vec());
            current = match current {
                Value::Object(map) => map
                    .get_mut(&segment.as_key())
                    .ok_or_else(|| PathError::NotFound(path.to_string()))?,
                Value::Array(items) => {
                    let index = segment.as_index().ok_or_else(|| PathError::NotAContainer {
                        path: here.to_string(),
                        segment: segment.to_string(),
                        found: "an array",
                    })?;
                    items
                        .get_mut(index)
                        .ok_or_else(|| PathError::NotFound(path.to_string()))?
                }
                other => return Err(not_a_container(&here, segment, other)),
            };
        }
        Ok(current)
    }

    /// Re-derive the dialect after a write under a discriminator key. On
    /// failure `rollback` restores the previous tree before the error is
    /// returned.
    fn rederive_dialect(
        &mut self,
        touched: &FieldPath,
        rollback: impl FnOnce(&mut Document),
    ) -> Result<(), PathError> {
        let affects_dialect = touched.len() == 1
            && touched
                .head_key()
                .map(Dialect::is_discriminator)
                .unwrap_or(false);
        if !affects_dialect {
            return Ok(());
        }

        let detected = match &self.root {
            Value::Object(map) => Dialect::detect(map),
            other => Err(ParseError::NotAnObject {
                found: kind_name(other),
            }),
        };

        match detected {
            Ok(dialect) => {
                self.dialect = dialect;
                Ok(())
            }
            Err(err) => {
                rollback(self);
                Err(PathError::Dialect(err))
            }
        }
    }
}

fn child<'a>(value: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(&segment.as_key()),
        Value::Array(items) => items.get(segment.as_index()?),
        _ => None,
    }
}

fn array_index(parent: &FieldPath, segment: &Segment, len: usize) -> Result<usize, PathError> {
    match segment.as_index() {
        Some(index) if index <= len => Ok(index),
        Some(_) => Err(PathError::NotFound(parent.clone().key(segment.as_key()).to_string())),
        None => Err(PathError::NotAContainer {
            path: parent.to_string(),
            segment: segment.to_string(),
            found: "an array",
        }),
    }
}

fn not_a_container(path: &FieldPath, segment: &Segment, found: &Value) -> PathError {
    PathError::NotAContainer {
        path: path.to_string(),
        segment: segment.to_string(),
        found: kind_name(found),
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
