//! Result aggregation
//!
//! Runs the primary (translate) and suggestion lookups for a normalized
//! query and merges their entries into one ordered list. Two modes:
//!
//! - [`Mode::Instant`] awaits only the primary lookup. The suggestion lookup
//!   runs as a detached task whose entries are not returned; it only fills
//!   the lookup cache.
//! - [`Mode::Settled`] awaits both lookups concurrently, then returns primary
//!   entries followed by suggestion entries and records the first primary
//!   entry in the history.
//!
//! A failed lookup contributes nothing. Failures never reach the caller.

use crate::cache::LookupCache;
use crate::config::QuerySettings;
use crate::error::LookupError;
use crate::history::HistoryStore;
use crate::host::ClipboardAccess;
use crate::lookup::RemoteLookup;
use crate::metrics::Metrics;
use crate::query::{looks_translatable, NormalizedQuery, QueryKind};
use crate::results::{HistoryEntry, ResultContainer, ResultEntry, Timing};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Transform tag applied to entries translated from the clipboard
pub const CLIPBOARD_TAG: &str = "clipboard";

const TRANSLATE_SOURCE: &str = "translate";
const SUGGEST_SOURCE: &str = "suggest";

/// Aggregation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Live typing: return as soon as the primary lookup completes
    Instant,
    /// Input settled: wait for every lookup and merge
    Settled,
}

/// Engine options taken from the query settings
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub enable_suggestions: bool,
    pub target_language: String,
    pub clipboard_max_chars: usize,
}

impl EngineOptions {
    pub fn from_settings(settings: &QuerySettings) -> Self {
        Self {
            enable_suggestions: settings.enable_suggestions,
            target_language: settings.default_target_language.clone(),
            clipboard_max_chars: settings.clipboard_max_chars,
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from_settings(&QuerySettings::default())
    }
}

/// Orchestrates concurrent lookups and merges their results
#[derive(Clone)]
pub struct AggregationEngine {
    lookup: Arc<dyn RemoteLookup>,
    history: Arc<HistoryStore>,
    clipboard: Arc<dyn ClipboardAccess>,
    cache: Option<LookupCache>,
    metrics: Arc<Metrics>,
    options: EngineOptions,
}

impl AggregationEngine {
    /// Create an engine with default options, no cache and fresh metrics
    pub fn new(
        lookup: Arc<dyn RemoteLookup>,
        history: Arc<HistoryStore>,
        clipboard: Arc<dyn ClipboardAccess>,
    ) -> Self {
        Self {
            lookup,
            history,
            clipboard,
            cache: None,
            metrics: Arc::new(Metrics::new()),
            options: EngineOptions::default(),
        }
    }

    /// Create an engine configured from query settings
    pub fn from_settings(
        lookup: Arc<dyn RemoteLookup>,
        clipboard: Arc<dyn ClipboardAccess>,
        settings: &QuerySettings,
    ) -> Self {
        let history = Arc::new(HistoryStore::new(settings.history_capacity));
        let mut engine = Self::new(lookup, history, clipboard)
            .with_options(EngineOptions::from_settings(settings));

        if settings.cache_ttl_secs > 0 {
            engine = engine.with_cache(LookupCache::new(
                settings.cache_ttl_secs,
                crate::cache::DEFAULT_MAX_CAPACITY,
            ));
        }
        engine
    }

    pub fn with_cache(mut self, cache: LookupCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn history_store(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Resolve a normalized query into an ordered result list
    pub async fn resolve(&self, query: &NormalizedQuery, mode: Mode) -> Vec<ResultEntry> {
        match query.kind {
            QueryKind::Empty => self.clipboard_or_history().await,
            QueryKind::HistoryRequest => self.history(),
            QueryKind::Translatable => match mode {
                Mode::Instant => self.instant(&query.text).await,
                Mode::Settled => self.settled(&query.text).await,
            },
        }
    }

    /// Translate the clipboard if it looks translatable, else show history
    pub async fn clipboard_or_history(&self) -> Vec<ResultEntry> {
        let clip = self.clipboard.read_text();
        if looks_translatable(clip.as_deref(), self.options.clipboard_max_chars) {
            let query = NormalizedQuery::new(clip.as_deref().unwrap_or_default());
            debug!("Translating clipboard text '{}'", query.text);

            return self
                .instant(&query.text)
                .await
                .into_iter()
                .map(|entry| entry.with_trans_type(CLIPBOARD_TAG))
                .collect();
        }

        self.history()
    }

    /// History entries, most recent first
    pub fn history(&self) -> Vec<ResultEntry> {
        self.history.read().into_iter().map(ResultEntry::from).collect()
    }

    async fn instant(&self, text: &str) -> Vec<ResultEntry> {
        if self.options.enable_suggestions {
            let engine = self.clone();
            let fragment = text.to_string();
            // Entries land in the cache only
            tokio::spawn(async move {
                engine.run_suggest(&fragment, &ResultContainer::new()).await;
            });
        }

        let container = ResultContainer::new();
        self.run_translate(text, &container).await;
        container.get_ordered_results()
    }

    async fn settled(&self, text: &str) -> Vec<ResultEntry> {
        let container = ResultContainer::new();

        let suggest = async {
            if self.options.enable_suggestions {
                self.run_suggest(text, &container).await;
            }
        };
        tokio::join!(self.run_translate(text, &container), suggest);

        for timing in container.get_timings() {
            debug!(
                "Source '{}' returned {} entries in {}ms",
                timing.source, timing.result_count, timing.time_ms
            );
        }
        for failure in container.get_failures() {
            debug!("Source '{}' contributed nothing: {}", failure.source, failure.error);
        }

        let results = container.get_ordered_results();
        if let Some(entry) = HistoryEntry::from_results(&results, text) {
            self.history.push(entry);
        }
        results
    }

    async fn run_translate(&self, text: &str, container: &ResultContainer) {
        let target = self.options.target_language.as_str();

        if let Some(ref cache) = self.cache {
            if let Some(entries) = cache.get_translation(text, target).await {
                self.metrics.inc_cache_hit();
                container.extend_primary(entries);
                return;
            }
        }

        let start = Instant::now();
        match self.lookup.translate(text, Some(target)).await {
            Ok(entries) => {
                let elapsed = start.elapsed().as_millis() as u64;
                self.record_success(container, TRANSLATE_SOURCE, elapsed, entries.len());
                if let Some(ref cache) = self.cache {
                    cache.set_translation(text, target, entries.clone()).await;
                }
                container.extend_primary(entries);
            }
            Err(e) => self.record_failure(container, TRANSLATE_SOURCE, text, e),
        }
    }

    async fn run_suggest(&self, fragment: &str, container: &ResultContainer) {
        if let Some(ref cache) = self.cache {
            if let Some(entries) = cache.get_suggestions(fragment).await {
                self.metrics.inc_cache_hit();
                container.extend_suggestions(entries);
                return;
            }
        }

        let start = Instant::now();
        match self.lookup.suggest(fragment).await {
            Ok(entries) => {
                let elapsed = start.elapsed().as_millis() as u64;
                self.record_success(container, SUGGEST_SOURCE, elapsed, entries.len());
                if let Some(ref cache) = self.cache {
                    cache.set_suggestions(fragment, entries.clone()).await;
                }
                container.extend_suggestions(entries);
            }
            Err(e) => self.record_failure(container, SUGGEST_SOURCE, fragment, e),
        }
    }

    fn record_success(&self, container: &ResultContainer, source: &str, time_ms: u64, count: usize) {
        self.metrics.record_success(source, time_ms);
        container.add_timing(Timing {
            source: source.to_string(),
            time_ms,
            result_count: count,
        });
    }

    fn record_failure(&self, container: &ResultContainer, source: &str, text: &str, error: LookupError) {
        warn!("{} lookup for '{}' failed: {}", source, text, error);
        self.metrics.record_error(source);
        container.add_failure(source, error);
    }
}
