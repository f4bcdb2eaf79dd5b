//! Deterministic in-process lookup provider
//!
//! Produces predictable entries without touching the network. Delays and
//! failures are configurable so callers can exercise ordering and failure
//! handling; call counters record what was asked.

use super::traits::RemoteLookup;
use crate::error::{LookupError, LookupResult};
use crate::locales;
use crate::results::{EntryKind, ResultEntry};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Mock lookup provider
#[derive(Debug, Default)]
pub struct MockLookup {
    name: String,
    translate_delay: Duration,
    suggest_delay: Duration,
    init_delay: Duration,
    translate_error: Option<LookupError>,
    suggest_error: Option<LookupError>,
    init_failures: AtomicUsize,
    translate_calls: AtomicUsize,
    suggest_calls: AtomicUsize,
    init_calls: AtomicUsize,
    translated: Mutex<Vec<String>>,
}

impl MockLookup {
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_translate_delay(mut self, delay: Duration) -> Self {
        self.translate_delay = delay;
        self
    }

    pub fn with_suggest_delay(mut self, delay: Duration) -> Self {
        self.suggest_delay = delay;
        self
    }

    pub fn with_init_delay(mut self, delay: Duration) -> Self {
        self.init_delay = delay;
        self
    }

    /// Make every translate call fail
    pub fn failing_translate(mut self, error: LookupError) -> Self {
        self.translate_error = Some(error);
        self
    }

    /// Make every suggest call fail
    pub fn failing_suggest(mut self, error: LookupError) -> Self {
        self.suggest_error = Some(error);
        self
    }

    /// Make the first `times` init calls fail
    pub fn failing_init(self, times: usize) -> Self {
        self.init_failures.store(times, Ordering::SeqCst);
        self
    }

    pub fn translate_calls(&self) -> usize {
        self.translate_calls.load(Ordering::SeqCst)
    }

    pub fn suggest_calls(&self) -> usize {
        self.suggest_calls.load(Ordering::SeqCst)
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    /// Texts passed to translate, in call order
    pub fn translated_texts(&self) -> Vec<String> {
        self.translated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn api_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl RemoteLookup for MockLookup {
    fn name(&self) -> &str {
        &self.name
    }

    async fn init(&self) -> LookupResult<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        pause(self.init_delay).await;

        let remaining = self.init_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.init_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(LookupError::Uninitialized("mock init failure".to_string()));
        }
        Ok(())
    }

    async fn translate(&self, text: &str, target: Option<&str>) -> LookupResult<Vec<ResultEntry>> {
        self.translate_calls.fetch_add(1, Ordering::SeqCst);
        self.translated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        pause(self.translate_delay).await;

        if let Some(ref err) = self.translate_error {
            return Err(err.clone());
        }

        let target = locales::resolve_target(target.unwrap_or(locales::AUTO), text);
        let api = self.api_name();
        Ok(vec![
            ResultEntry::new(format!("[{}] {}", target, text), text)
                .with_copy_target(format!("[{}] {}", target, text))
                .with_api_name(api.clone()),
            ResultEntry::new(format!("[{}] {} (alt)", target, text), "alternative")
                .with_api_name(api),
        ])
    }

    async fn suggest(&self, fragment: &str) -> LookupResult<Vec<ResultEntry>> {
        self.suggest_calls.fetch_add(1, Ordering::SeqCst);
        pause(self.suggest_delay).await;

        if let Some(ref err) = self.suggest_error {
            return Err(err.clone());
        }

        Ok((1..=2)
            .map(|i| {
                ResultEntry::new(format!("{} suggestion {}", fragment, i), "suggest")
                    .with_trans_type("suggest")
                    .with_kind(EntryKind::Suggestion)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_translate_entries_are_primary() {
        let mock = MockLookup::new();
        let entries = mock.translate("hello", Some("fr")).await.unwrap();

        assert_eq!(entries[0].title, "[fr] hello");
        assert!(entries.iter().all(|e| e.from_api_name.as_deref() == Some("Mock")));
        assert_eq!(mock.translated_texts(), vec!["hello"]);
    }

    #[tokio::test]
    async fn test_suggestions_are_not_primary() {
        let mock = MockLookup::new();
        let entries = mock.suggest("hel").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| !e.is_primary()));
    }

    #[tokio::test]
    async fn test_configured_failure() {
        let mock = MockLookup::new().failing_suggest(LookupError::Timeout);
        assert_eq!(mock.suggest("hel").await, Err(LookupError::Timeout));
        assert_eq!(mock.suggest_calls(), 1);
    }
}
