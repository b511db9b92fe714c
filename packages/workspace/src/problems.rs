//! # Validation Problem Store
//!
//! Flat, id-deduplicated list of problems reported against the document,
//! whether by the built-in structural check or by an external validator.

use apiforge_outline::Selection;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::selection_for_path;

/// Severity level of a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationProblem {
    pub id: String,

    pub severity: Severity,

    pub message: String,

    /// Dotted location in the document (`paths./pets.get`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,

    /// Optional hint for fixing the problem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Produced by the built-in structural check. Never set on problems
    /// that arrive over the wire.
    #[serde(skip)]
    pub structural: bool,
}

impl ValidationProblem {
    pub fn new(id: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            path: None,
            line: None,
            column: None,
            suggestion: None,
            structural: false,
        }
    }

    pub fn error(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(id, Severity::Error, message)
    }

    pub fn warning(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(id, Severity::Warning, message)
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub(crate) fn structural(mut self) -> Self {
        self.structural = true;
        self
    }

    /// Where focusing this problem should take the outline.
    pub fn selection(&self) -> Selection {
        match &self.path {
            Some(path) => selection_for_path(path),
            None => Selection::none(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ProblemStore {
    problems: Vec<ValidationProblem>,
}

impl ProblemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append problems whose id is not present yet, including repeats inside
    /// `problems` itself. Returns how many were added.
    pub fn add_problems(&mut self, problems: impl IntoIterator<Item = ValidationProblem>) -> usize {
        let mut seen: HashSet<String> = self.problems.iter().map(|p| p.id.clone()).collect();
        let before = self.problems.len();
        for problem in problems {
            if seen.insert(problem.id.clone()) {
                self.problems.push(problem);
            }
        }
        self.problems.len() - before
    }

    /// Replace every problem.
    pub fn set_problems(&mut self, problems: impl IntoIterator<Item = ValidationProblem>) {
        self.problems.clear();
        self.add_problems(problems);
    }

    /// Drop the problems of the built-in structural check, keeping
    /// externally reported ones.
    pub fn remove_structural(&mut self) {
        self.problems.retain(|problem| !problem.structural);
    }

    pub fn clear(&mut self) {
        self.problems.clear();
    }

    pub fn problems(&self) -> &[ValidationProblem] {
        &self.problems
    }

    pub fn get(&self, id: &str) -> Option<&ValidationProblem> {
        self.problems.iter().find(|problem| problem.id == id)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    /// Problems located at the outline target of `selection`. Operations
    /// also match on method.
    pub fn problems_for(&self, selection: &Selection) -> Vec<&ValidationProblem> {
        self.problems
            .iter()
            .filter(|problem| {
                if problem.path.is_none() {
                    return false;
                }
                let target = problem.selection();
                target.same_target(selection)
                    && target.context_str("method") == selection.context_str("method")
            })
            .collect()
    }

    fn count(&self, severity: Severity) -> usize {
        self.problems
            .iter()
            .filter(|problem| problem.severity == severity)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiforge_outline::NodeKind;
    use serde_json::json;

    #[test]
    fn test_duplicate_ids_are_dropped() {
        let mut store = ProblemStore::new();
        let added = store.add_problems(vec![
            ValidationProblem::error("e1", "first"),
            ValidationProblem::error("e1", "repeat in batch"),
            ValidationProblem::warning("w1", "warn"),
        ]);
        assert_eq!(added, 2);

        let added = store.add_problems(vec![ValidationProblem::error("e1", "again")]);
        assert_eq!(added, 0);
        assert_eq!(store.get("e1").unwrap().message, "first");
    }

    #[test]
    fn test_counts_and_validity() {
        let mut store = ProblemStore::new();
        store.add_problems(vec![
            ValidationProblem::warning("w1", "a"),
            ValidationProblem::new("i1", Severity::Info, "b"),
        ]);
        assert!(store.is_valid());
        assert_eq!(store.warning_count(), 1);
        assert_eq!(store.info_count(), 1);

        store.add_problems(vec![ValidationProblem::error("e1", "c")]);
        assert!(!store.is_valid());
        assert_eq!(store.error_count(), 1);

        store.set_problems(vec![ValidationProblem::warning("w2", "d")]);
        assert_eq!(store.problems().len(), 1);
        assert!(store.is_valid());

        store.clear();
        assert!(store.problems().is_empty());
    }

    #[test]
    fn test_remove_structural_keeps_external_problems() {
        let mut store = ProblemStore::new();
        let external: ValidationProblem = serde_json::from_value(json!({
            "id": "structure-legacy",
            "severity": "error",
            "message": "reported by an external validator"
        }))
        .unwrap();
        store.add_problems(vec![
            ValidationProblem::warning("structure-0", "a").structural(),
            ValidationProblem::warning("structure-1", "b").structural(),
            ValidationProblem::error("lint-0", "c"),
            external,
        ]);
        store.remove_structural();
        let ids: Vec<&str> = store.problems().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["lint-0", "structure-legacy"]);
    }

    #[test]
    fn test_problems_for_selection() {
        let mut store = ProblemStore::new();
        store.add_problems(vec![
            ValidationProblem::error("a", "bad response").with_path("paths./pets.get.responses"),
            ValidationProblem::error("b", "bad summary").with_path("paths./pets.post.summary"),
            ValidationProblem::error("c", "no path"),
        ]);
        let selection = Selection::new(NodeKind::Operation)
            .with_path("/pets")
            .with_context("method", "get");
        let ids: Vec<&str> = store.problems_for(&selection).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);

        let path = Selection::new(NodeKind::Operation)
            .with_path("/pets")
            .with_context("method", "post");
        assert_eq!(store.problems_for(&path).len(), 1);
    }

    #[test]
    fn test_deserializes_external_problem() {
        let problem: ValidationProblem = serde_json::from_value(json!({
            "id": "oas3-schema",
            "severity": "error",
            "message": "`info.version` is required",
            "path": "info.version",
            "line": 3,
            "column": 1,
            "suggestion": "Add a version"
        }))
        .unwrap();
        assert_eq!(problem.severity, Severity::Error);
        assert_eq!(problem.line, Some(3));
        assert_eq!(
            problem.selection(),
            Selection::new(NodeKind::Info).with_context("field", "version")
        );
    }
}
