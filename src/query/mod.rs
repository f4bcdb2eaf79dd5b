//! Query classification module
//!
//! Turns the raw text of the query box into a [`NormalizedQuery`]:
//! - empty input selects the clipboard-or-history path
//! - the literal `h` asks for history
//! - anything else is translatable

use serde::{Deserialize, Serialize};

/// The literal token that requests the interaction history
pub const HISTORY_TOKEN: &str = "h";

/// Text exactly as the caller is editing it, with the time it was observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawQuery {
    pub text: String,
    /// Milliseconds on the dispatcher's clock
    pub observed_at: u64,
}

impl RawQuery {
    pub fn new(text: impl Into<String>, observed_at: u64) -> Self {
        Self {
            text: text.into(),
            observed_at,
        }
    }

    pub fn normalize(&self) -> NormalizedQuery {
        NormalizedQuery::new(&self.text)
    }
}

/// Classification of a normalized query
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Empty,
    HistoryRequest,
    Translatable,
}

/// Trimmed query text plus its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub text: String,
    pub kind: QueryKind,
}

impl NormalizedQuery {
    /// Normalize raw query text
    pub fn new(raw: &str) -> Self {
        let text = raw.trim().to_string();
        let kind = if text.is_empty() {
            QueryKind::Empty
        } else if text == HISTORY_TOKEN {
            QueryKind::HistoryRequest
        } else {
            QueryKind::Translatable
        };

        Self { text, kind }
    }

    pub fn is_empty(&self) -> bool {
        self.kind == QueryKind::Empty
    }

    pub fn is_translatable(&self) -> bool {
        self.kind == QueryKind::Translatable
    }
}

/// Whether clipboard text is worth translating: non-empty, not pure
/// whitespace and shorter than `max_chars`.
pub fn looks_translatable(text: Option<&str>, max_chars: usize) -> bool {
    match text {
        Some(text) => !text.trim().is_empty() && text.chars().count() < max_chars,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(NormalizedQuery::new("").kind, QueryKind::Empty);
        assert_eq!(NormalizedQuery::new("   ").kind, QueryKind::Empty);
        assert_eq!(NormalizedQuery::new("h").kind, QueryKind::HistoryRequest);
        assert_eq!(NormalizedQuery::new(" h ").kind, QueryKind::HistoryRequest);
        assert_eq!(NormalizedQuery::new("he").kind, QueryKind::Translatable);
    }

    #[test]
    fn test_trimming() {
        let query = RawQuery::new("  hello world ", 10).normalize();
        assert_eq!(query.text, "hello world");
        assert!(query.is_translatable());
    }

    #[test]
    fn test_looks_translatable() {
        assert!(looks_translatable(Some("bonjour"), 500));
        assert!(!looks_translatable(Some(""), 500));
        assert!(!looks_translatable(Some(" \n\t "), 500));
        assert!(!looks_translatable(None, 500));
        assert!(!looks_translatable(Some(&"a".repeat(500)), 500));
        assert!(looks_translatable(Some(&"a".repeat(499)), 500));
    }
}
