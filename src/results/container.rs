//! Result container for merging the output of concurrent lookups

use super::types::*;
use crate::error::LookupError;
use std::sync::{Arc, PoisonError, RwLock};

/// A lookup source that failed and contributed nothing
#[derive(Debug, Clone)]
pub struct SourceFailure {
    pub source: String,
    pub error: LookupError,
}

/// Container for aggregating entries from the primary and suggestion lookups.
///
/// Concurrent tasks write into separate slots, so the final order is fixed
/// (primary first, then suggestions) no matter which lookup finishes first.
#[derive(Debug, Clone, Default)]
pub struct ResultContainer {
    primary: Arc<RwLock<Vec<ResultEntry>>>,
    suggestions: Arc<RwLock<Vec<ResultEntry>>>,
    failures: Arc<RwLock<Vec<SourceFailure>>>,
    timings: Arc<RwLock<Vec<Timing>>>,
}

impl ResultContainer {
    /// Create a new empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Append primary lookup entries, preserving their order
    pub fn extend_primary(&self, entries: Vec<ResultEntry>) {
        self.primary
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(entries);
    }

    /// Append suggestion entries, preserving their order
    pub fn extend_suggestions(&self, entries: Vec<ResultEntry>) {
        self.suggestions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(entries);
    }

    /// Record a source that failed
    pub fn add_failure(&self, source: impl Into<String>, error: LookupError) {
        self.failures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SourceFailure {
                source: source.into(),
                error,
            });
    }

    /// Record source timing
    pub fn add_timing(&self, timing: Timing) {
        self.timings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(timing);
    }

    /// Primary entries followed by suggestion entries
    pub fn get_ordered_results(&self) -> Vec<ResultEntry> {
        let primary = self.primary.read().unwrap_or_else(PoisonError::into_inner);
        let suggestions = self
            .suggestions
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        primary.iter().chain(suggestions.iter()).cloned().collect()
    }

    /// Get failed sources
    pub fn get_failures(&self) -> Vec<SourceFailure> {
        self.failures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get timings
    pub fn get_timings(&self) -> Vec<Timing> {
        self.timings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Total number of entries
    pub fn result_count(&self) -> usize {
        self.primary.read().unwrap_or_else(PoisonError::into_inner).len()
            + self
                .suggestions
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_precedes_suggestions() {
        let container = ResultContainer::new();

        // Suggestions land first, as when the suggest lookup is faster
        container.extend_suggestions(vec![
            ResultEntry::new("hello world", "suggest"),
            ResultEntry::new("hello kitty", "suggest"),
        ]);
        container.extend_primary(vec![ResultEntry::new("你好", "hello").with_api_name("Youdao")]);

        let results = container.get_ordered_results();
        let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["你好", "hello world", "hello kitty"]);
        assert_eq!(container.result_count(), 3);
    }

    #[test]
    fn test_failures_recorded() {
        let container = ResultContainer::new();
        container.add_failure("suggest", LookupError::Timeout);

        let failures = container.get_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].source, "suggest");
        assert!(container.get_ordered_results().is_empty());
    }
}
