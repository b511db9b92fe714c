//! Map loosely structured problem paths (`paths./v1.0/users.get.responses`)
//! to the outline [`Selection`] that should receive focus.
//!
//! The mapper never fails: anything it cannot place becomes a `none`
//! selection carrying the original string as `rawPath`.

use apiforge_outline::{NodeKind, Selection};
use apiforge_parser::{FieldPath, CHANNEL_OPERATIONS, HTTP_METHODS};

pub fn selection_for_path(path: &str) -> Selection {
    let segments: Vec<String> = FieldPath::parse(path)
        .segments()
        .iter()
        .map(|segment| segment.as_key())
        .collect();

    let mapped = match segments.split_first() {
        Some((head, rest)) => match head.as_str() {
            "info" => Some(info(rest)),
            "paths" => operation(rest),
            "components" => schema(rest),
            "channels" => channel(rest),
            _ => None,
        },
        None => None,
    };

    mapped.unwrap_or_else(|| Selection::none().with_context("rawPath", path))
}

fn info(rest: &[String]) -> Selection {
    let selection = Selection::new(NodeKind::Info);
    if rest.is_empty() {
        selection
    } else {
        selection.with_context("field", rest.join("."))
    }
}

/// The path name runs up to the first HTTP verb, so dotted names like
/// `/v1.0/users` survive the split.
fn operation(rest: &[String]) -> Option<Selection> {
    let (name, method) = split_at_keyword(rest, &HTTP_METHODS)?;
    Some(match method {
        Some(method) => Selection::new(NodeKind::Operation)
            .with_path(name)
            .with_context("method", method),
        None => Selection::new(NodeKind::Path).with_path(name),
    })
}

fn schema(rest: &[String]) -> Option<Selection> {
    match rest {
        [section, name, ..] if section == "schemas" => Some(
            Selection::new(NodeKind::Schema)
                .with_path(name.as_str())
                .with_context("schemaName", name.as_str()),
        ),
        _ => None,
    }
}

fn channel(rest: &[String]) -> Option<Selection> {
    let (name, _) = split_at_keyword(rest, &CHANNEL_OPERATIONS)?;
    Some(Selection::new(NodeKind::Channel).with_path(name))
}

/// Join segments up to the first `keywords` member into a name. Returns the
/// keyword found, if any. A keyword in first position is part of the name.
fn split_at_keyword<'a>(rest: &'a [String], keywords: &[&str]) -> Option<(String, Option<&'a str>)> {
    if rest.is_empty() {
        return None;
    }

    let cut = rest
        .iter()
        .skip(1)
        .position(|segment| keywords.contains(&segment.as_str()))
        .map(|i| i + 1);

    Some(match cut {
        Some(cut) => (rest[..cut].join("."), Some(rest[cut].as_str())),
        None => (rest.join("."), None),
    })
}
