//! # Field paths
//!
//! A [`FieldPath`] addresses a value inside the canonical tree by key and
//! index, never by reference. Commands store paths and resolve them again on
//! every execute/undo.
//!
//! The dotted form is `servers.0.url`. Keys that contain `.` or `[` are
//! written bracketed: `paths["/v1.0/users"].get`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    /// Parse one unbracketed segment. Canonical decimals become indices;
    /// anything else, including `007`, stays a key so it round-trips.
    fn from_plain(raw: &str) -> Self {
        match canonical_index(raw) {
            Some(index) => Segment::Index(index),
            None => Segment::Key(raw.to_string()),
        }
    }

    /// The segment as a map key. Indices are rendered in decimal, which is
    /// how numeric YAML keys such as `200:` are stored.
    pub fn as_key(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }

    /// The segment as an array index, if it reads as one.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(index) => Some(*index),
            Segment::Key(key) => canonical_index(key),
        }
    }
}

fn canonical_index(raw: &str) -> Option<usize> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: usize = raw.parse().ok()?;
    (index.to_string() == raw).then_some(index)
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Stable address of a value in the document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The empty path (the document root).
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Parse the dotted form. Never fails; unterminated brackets are read as
    /// a literal key.
    pub fn parse(input: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = input;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                match after.find(']') {
                    Some(end) => {
                        let inner = &after[..end];
                        let segment = match inner
                            .strip_prefix('"')
                            .and_then(|s| s.strip_suffix('"'))
                        {
                            Some(quoted) => Segment::Key(quoted.to_string()),
                            None => Segment::from_plain(inner),
                        };
                        segments.push(segment);
                        rest = &after[end + 1..];
                    }
                    None => {
                        segments.push(Segment::Key(rest.to_string()));
                        break;
                    }
                }
            } else {
                let end = rest.find(|c| c == '.' || c == '[').unwrap_or(rest.len());
                if end > 0 {
                    segments.push(Segment::from_plain(&rest[..end]));
                }
                rest = &rest[end..];
            }
            rest = rest.strip_prefix('.').unwrap_or(rest);
        }

        Self { segments }
    }

    /// Append a key segment.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    /// Append an index segment.
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.segments.push(segment.into());
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Split into parent path and last segment.
    pub fn split_last(&self) -> Option<(FieldPath, &Segment)> {
        let (last, parent) = self.segments.split_last()?;
        Some((FieldPath::from_segments(parent.to_vec()), last))
    }

    /// First key of the path, if it is a key.
    pub fn head_key(&self) -> Option<&str> {
        match self.segments.first() {
            Some(Segment::Key(key)) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if key.contains('.') || key.contains('[') || key.is_empty() => {
                    write!(f, "[\"{}\"]", key)?;
                }
                other => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{}", other)?;
                }
            }
        }
        Ok(())
    }
}

impl From<&str> for FieldPath {
    fn from(input: &str) -> Self {
        FieldPath::parse(input)
    }
}

impl From<String> for FieldPath {
    fn from(input: String) -> Self {
        FieldPath::parse(&input)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}
