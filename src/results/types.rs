//! Result type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subtitle used on the placeholder shown while input is still settling
pub const PENDING_SUBTITLE: &str = "....";

/// Subtitle of the trailer entry echoing the raw query on the settled path
pub const RAW_QUERY_SUBTITLE: &str = "[query raw]";

/// A single unit of output shown to the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultEntry {
    /// Main text (translation, suggestion, history item)
    pub title: String,
    /// Explanation text
    pub subtitle: String,
    /// Text placed on the clipboard when the entry is chosen
    pub copy_target: Option<String>,
    /// Provider that produced the entry; only primary lookups set it
    pub from_api_name: Option<String>,
    /// Icon hint for the host
    pub icon: Option<String>,
    /// Transform tag, e.g. "clipboard" or "suggest"
    pub trans_type: Option<String>,
    /// How the entry was produced
    #[serde(default)]
    pub kind: EntryKind,
}

impl ResultEntry {
    /// Create a new entry
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            copy_target: None,
            from_api_name: None,
            icon: None,
            trans_type: None,
            kind: EntryKind::Lookup,
        }
    }

    /// Placeholder returned while the lookup backend is initializing
    pub fn initializing() -> Self {
        Self::new("Initializing....", "[Initialize translation components]")
            .with_kind(EntryKind::Placeholder)
    }

    /// Placeholder returned while input is still settling
    pub fn pending(text: impl Into<String>) -> Self {
        Self::new(text, PENDING_SUBTITLE).with_kind(EntryKind::Placeholder)
    }

    /// Trailer echoing the query on the settled path
    pub fn raw_query(text: impl Into<String>) -> Self {
        Self::new(text, RAW_QUERY_SUBTITLE).with_kind(EntryKind::Trailer)
    }

    pub fn with_copy_target(mut self, target: impl Into<String>) -> Self {
        self.copy_target = Some(target.into());
        self
    }

    pub fn with_api_name(mut self, name: impl Into<String>) -> Self {
        self.from_api_name = Some(name.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_trans_type(mut self, tag: impl Into<String>) -> Self {
        self.trans_type = Some(tag.into());
        self
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this entry came from a primary lookup
    pub fn is_primary(&self) -> bool {
        self.from_api_name.is_some()
    }

    /// Whether this entry is synthesized by the engine rather than looked up
    pub fn is_placeholder(&self) -> bool {
        self.kind == EntryKind::Placeholder
    }

    /// Text to copy when the entry is chosen
    pub fn copy_text(&self) -> &str {
        self.copy_target.as_deref().unwrap_or(&self.title)
    }
}

/// Origin of a result entry
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    #[default]
    Lookup,
    Suggestion,
    History,
    Placeholder,
    Trailer,
    Diagnostic,
}

/// A past successful lookup kept by the history store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Translated text
    pub title: String,
    /// Original query
    pub subtitle: String,
    /// When the lookup completed
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            recorded_at: Utc::now(),
        }
    }

    /// Derive a history entry from the first primary entry of a result list
    pub fn from_results(results: &[ResultEntry], query: &str) -> Option<Self> {
        results
            .iter()
            .find(|entry| entry.is_primary())
            .map(|entry| Self::new(entry.title.clone(), query))
    }
}

impl From<HistoryEntry> for ResultEntry {
    fn from(entry: HistoryEntry) -> Self {
        ResultEntry::new(entry.title.clone(), entry.subtitle)
            .with_copy_target(entry.title)
            .with_kind(EntryKind::History)
    }
}

/// Lookup response timing information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timing {
    /// Source name ("translate", "suggest")
    pub source: String,
    /// Response time in milliseconds
    pub time_ms: u64,
    /// Number of entries returned
    pub result_count: usize,
}
