//! Read access over the recipe and exercise catalogs, plus the filtering
//! primitives the planner composes.

pub mod exercises;
pub mod import;
pub mod recipes;

use serde::Serialize;

/// Outcome of a filter that never returns an empty set while candidates exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "items", rename_all = "snake_case")]
pub enum Selection<T> {
    /// At least one candidate passed the filter.
    Filtered(Vec<T>),
    /// Nothing passed; these are the unfiltered candidates.
    Fallback(Vec<T>),
}

impl<T> Selection<T> {
    /// Keep `matched` when non-empty, otherwise fall back to `all`.
    pub fn or_all(matched: Vec<T>, all: Vec<T>) -> Self {
        if matched.is_empty() {
            Selection::Fallback(all)
        } else {
            Selection::Filtered(matched)
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Selection::Fallback(_))
    }

    pub fn items(&self) -> &[T] {
        match self {
            Selection::Filtered(items) | Selection::Fallback(items) => items,
        }
    }

    pub fn into_inner(self) -> Vec<T> {
        match self {
            Selection::Filtered(items) | Selection::Fallback(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

/// Split a comma-separated label field into trimmed, non-empty entries.
pub fn split_labels(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_all_prefers_matches() {
        let s = Selection::or_all(vec![2], vec![1, 2, 3]);
        assert_eq!(s, Selection::Filtered(vec![2]));
        assert!(!s.is_fallback());
    }

    #[test]
    fn or_all_falls_back_when_nothing_matches() {
        let s: Selection<i32> = Selection::or_all(vec![], vec![1, 2, 3]);
        assert!(s.is_fallback());
        assert_eq!(s.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn split_labels_trims_and_drops_blanks() {
        assert_eq!(
            split_labels(Some(" vegan, gluten-free ,,  ")),
            vec!["vegan".to_string(), "gluten-free".to_string()]
        );
        assert!(split_labels(None).is_empty());
    }
}
