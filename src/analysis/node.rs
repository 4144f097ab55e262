//! Semantic nodes produced by analysis
//!
//! A node is built at most once per line and never mutated afterwards.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Hierarchical category path (`:work::meetings` ⇒ `["work", "meetings"]`)
///
/// Invariant: a path is a non-empty ordered list of non-empty segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryPath(Vec<String>);

impl CategoryPath {
    /// Builds a path, rejecting empty paths and empty segments
    pub fn new(segments: Vec<String>) -> Option<Self> {
        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0.join("::"))
    }
}

/// A resolved task line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskNode {
    pub title: String,
    pub start: Option<NaiveDateTime>,
    pub duration_min: u32,
    /// Always `start + duration_min`, never assigned independently
    pub end: Option<NaiveDateTime>,
    pub categories: Vec<CategoryPath>,
    /// True when the start time was written on the line, false when it was
    /// inherited from the running cursor
    pub explicit_start: bool,
    /// True when the duration was written on the line, false for the
    /// context default
    pub explicit_duration: bool,
}

impl TaskNode {
    /// Builds a task node, deriving the end from start and duration
    pub fn new(
        title: String,
        start: Option<NaiveDateTime>,
        duration_min: u32,
        categories: Vec<CategoryPath>,
        explicit_start: bool,
        explicit_duration: bool,
    ) -> Self {
        let end = start.map(|s| s + Duration::minutes(i64::from(duration_min)));
        Self {
            title,
            start,
            duration_min,
            end,
            categories,
            explicit_start,
            explicit_duration,
        }
    }
}

/// A validated directive line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectiveNode {
    pub name: String,
    pub args: BTreeMap<String, String>,
}

/// Semantic node attached to a line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Task(TaskNode),
    Directive(DirectiveNode),
}

impl Node {
    pub fn as_task(&self) -> Option<&TaskNode> {
        match self {
            Node::Task(t) => Some(t),
            Node::Directive(_) => None,
        }
    }

    pub fn as_directive(&self) -> Option<&DirectiveNode> {
        match self {
            Node::Directive(d) => Some(d),
            Node::Task(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 26)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn end_is_start_plus_duration() {
        let node = TaskNode::new("Standup".into(), Some(at(9, 0)), 30, vec![], true, true);
        assert_eq!(node.end, Some(at(9, 30)));
    }

    #[test]
    fn no_start_means_no_end() {
        let node = TaskNode::new("Standup".into(), None, 30, vec![], false, true);
        assert_eq!(node.end, None);
    }

    #[test]
    fn category_path_rejects_empty_segments() {
        assert!(CategoryPath::new(vec![]).is_none());
        assert!(CategoryPath::new(vec!["a".into(), "".into()]).is_none());

        let path = CategoryPath::new(vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(path.to_string(), ":a::b");
    }
}
