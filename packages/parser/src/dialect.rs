//! # Dialect detection
//!
//! A document's dialect is derived once from its discriminator field and
//! matched exhaustively afterwards. Consumers never probe `openapi` /
//! `swagger` / `asyncapi` themselves.

use crate::error::{ParseError, ParseResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Top-level keys that decide the dialect.
pub const DISCRIMINATORS: [&str; 3] = ["openapi", "swagger", "asyncapi"];

/// Operation keys of an OpenAPI path item, in outline order.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Operation keys of an AsyncAPI 2.x channel item, in outline order.
pub const CHANNEL_OPERATIONS: [&str; 2] = ["publish", "subscribe"];

/// Schema family and version of a specification document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dialect {
    OpenApi2,
    OpenApi30,
    OpenApi31,
    AsyncApi2,
}

impl Dialect {
    /// Derive the dialect from a decoded document root.
    pub fn detect(root: &Map<String, Value>) -> ParseResult<Self> {
        if let Some(value) = root.get("openapi") {
            let version = version_string(value);
            return match major_minor(&version) {
                Some((3, 0)) => Ok(Self::OpenApi30),
                Some((3, _)) => Ok(Self::OpenApi31),
                _ => Err(ParseError::unsupported_version("openapi", version)),
            };
        }

        if let Some(value) = root.get("swagger") {
            let version = version_string(value);
            return match major_minor(&version) {
                Some((2, _)) => Ok(Self::OpenApi2),
                _ => Err(ParseError::unsupported_version("swagger", version)),
            };
        }

        if let Some(value) = root.get("asyncapi") {
            let version = version_string(value);
            return match major_minor(&version) {
                Some((2, _)) => Ok(Self::AsyncApi2),
                _ => Err(ParseError::unsupported_version("asyncapi", version)),
            };
        }

        Err(ParseError::UnknownDialect)
    }

    /// The key holding this dialect's version string.
    pub fn discriminator(&self) -> &'static str {
        match self {
            Self::OpenApi2 => "swagger",
            Self::OpenApi30 | Self::OpenApi31 => "openapi",
            Self::AsyncApi2 => "asyncapi",
        }
    }

    /// Human-readable name, e.g. `OpenAPI 3.0`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::OpenApi2 => "OpenAPI 2.0",
            Self::OpenApi30 => "OpenAPI 3.0",
            Self::OpenApi31 => "OpenAPI 3.1",
            Self::AsyncApi2 => "AsyncAPI 2.x",
        }
    }

    pub fn is_openapi(&self) -> bool {
        match self {
            Self::OpenApi2 | Self::OpenApi30 | Self::OpenApi31 => true,
            Self::AsyncApi2 => false,
        }
    }

    pub fn is_asyncapi(&self) -> bool {
        match self {
            Self::AsyncApi2 => true,
            Self::OpenApi2 | Self::OpenApi30 | Self::OpenApi31 => false,
        }
    }

    /// True if editing `key` at the root can change the dialect.
    pub fn is_discriminator(key: &str) -> bool {
        DISCRIMINATORS.contains(&key)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Render a discriminator value as a version string.
///
/// YAML authors often write `swagger: 2.0` unquoted, which decodes as a number.
pub(crate) fn version_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn major_minor(version: &str) -> Option<(u64, u64)> {
    let mut parts = version.split('.');
    let major = parts.next()?.trim().parse().ok()?;
    let minor = match parts.next() {
        Some(minor) => minor.trim().parse().ok()?,
        None => 0,
    };
    Some((major, minor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detect(value: Value) -> ParseResult<Dialect> {
        match value {
            Value::Object(map) => Dialect::detect(&map),
            _ => unreachable!("test fixtures are objects"),
        }
    }

    #[test]
    fn test_detects_each_dialect() {
        assert_eq!(detect(json!({"swagger": "2.0"})), Ok(Dialect::OpenApi2));
        assert_eq!(detect(json!({"openapi": "3.0.3"})), Ok(Dialect::OpenApi30));
        assert_eq!(detect(json!({"openapi": "3.1.0"})), Ok(Dialect::OpenApi31));
        assert_eq!(detect(json!({"asyncapi": "2.6.0"})), Ok(Dialect::AsyncApi2));
    }

    #[test]
    fn test_numeric_swagger_version() {
        assert_eq!(detect(json!({"swagger": 2.0})), Ok(Dialect::OpenApi2));
    }

    #[test]
    fn test_missing_discriminator_is_an_error() {
        assert_eq!(
            detect(json!({"info": {"title": "x"}})),
            Err(ParseError::UnknownDialect)
        );
    }

    #[test]
    fn test_unsupported_versions() {
        assert!(matches!(
            detect(json!({"openapi": "4.0.0"})),
            Err(ParseError::UnsupportedVersion { field: "openapi", .. })
        ));
        assert!(matches!(
            detect(json!({"asyncapi": "3.0.0"})),
            Err(ParseError::UnsupportedVersion { field: "asyncapi", .. })
        ));
        assert!(matches!(
            detect(json!({"swagger": "banana"})),
            Err(ParseError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_family_queries() {
        assert!(Dialect::OpenApi2.is_openapi());
        assert!(!Dialect::OpenApi31.is_asyncapi());
        assert!(Dialect::AsyncApi2.is_asyncapi());
        assert_eq!(Dialect::OpenApi30.to_string(), "OpenAPI 3.0");
    }
}
