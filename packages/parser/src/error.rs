use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Failure to turn specification text into a [`crate::Document`].
///
/// A load that fails with any of these never installs a partial document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Document is empty")]
    Empty,

    #[error("Invalid JSON at {line}:{column}: {message}")]
    Json {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Invalid YAML: {message}")]
    Yaml {
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    #[error("Document root must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("Unrecognized document: none of `openapi`, `swagger` or `asyncapi` is present")]
    UnknownDialect,

    #[error("Unsupported `{field}` version: {version}")]
    UnsupportedVersion { field: &'static str, version: String },
}

impl ParseError {
    pub fn yaml(message: impl Into<String>) -> Self {
        Self::Yaml {
            line: None,
            column: None,
            message: message.into(),
        }
    }

    pub fn unsupported_version(field: &'static str, version: impl Into<String>) -> Self {
        Self::UnsupportedVersion {
            field,
            version: version.into(),
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        let location = err.location();
        Self::Yaml {
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
            message: err.to_string(),
        }
    }
}

/// Failure to render a document back to text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SerializeError {
    #[error("Failed to render JSON: {0}")]
    Json(String),

    #[error("Failed to render YAML: {0}")]
    Yaml(String),
}

/// Failure to read or write the tree at a [`crate::FieldPath`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("Cannot address the document root through a field path")]
    EmptyPath,

    #[error("Nothing at `{0}`")]
    NotFound(String),

    #[error("`{path}` is {found}, cannot descend into `{segment}`")]
    NotAContainer {
        path: String,
        segment: String,
        found: &'static str,
    },

    #[error("`{key}` already exists under `{path}`")]
    KeyExists { path: String, key: String },

    #[error("Edit would break the document dialect: {0}")]
    Dialect(ParseError),
}
