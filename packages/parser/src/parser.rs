//! # Text → canonical tree
//!
//! JSON goes straight to a `serde_json::Value`. YAML is decoded into a
//! `serde_yaml::Value` first and converted, because YAML mapping keys need
//! not be strings (`200:` response codes, `true:`) and the canonical tree is
//! string-keyed.

use crate::document::{Document, Format};
use crate::error::{ParseError, ParseResult};
use serde_json::{Map, Number, Value};

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub document: Document,
    pub format: Format,
}

/// Parse specification text, sniffing JSON vs YAML from the first
/// non-whitespace character.
pub fn parse(content: &str) -> ParseResult<Parsed> {
    let format = Format::detect(content).ok_or(ParseError::Empty)?;
    parse_as(content, format)
}

/// Parse specification text in a known format.
pub fn parse_as(content: &str, format: Format) -> ParseResult<Parsed> {
    if content.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let value = match format {
        Format::Json => serde_json::from_str::<Value>(content)?,
        Format::Yaml => decode_yaml(content)?,
    };

    let document = Document::from_value(value).map_err(|err| {
        tracing::warn!("Rejected {:?} document: {}", format, err);
        err
    })?;

    tracing::debug!(
        "Parsed {} document ({:?}, version {})",
        document.type_name(),
        format,
        document.version()
    );

    Ok(Parsed { document, format })
}

fn decode_yaml(content: &str) -> ParseResult<Value> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)?;
    yaml_to_json(raw)
}

fn yaml_to_json(value: serde_yaml::Value) -> ParseResult<Value> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| ParseError::yaml(format!("unrepresentable number `{}`", n)))?
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<ParseResult<Vec<_>>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_key(key: serde_yaml::Value) -> ParseResult<String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => yaml_key(tagged.value),
        Yaml::Sequence(_) | Yaml::Mapping(_) => {
            Err(ParseError::yaml("complex mapping keys are not supported"))
        }
    }
}
