//! Metrics collection module
//!
//! Tracks lookup counts, failures and response times per source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Number of response times kept per source
const RESPONSE_WINDOW: usize = 100;

/// Lookup metrics collector
#[derive(Debug, Default)]
pub struct Metrics {
    /// Lookups fired by the debounce controller or the settled path
    pub fired_lookups: AtomicU64,
    /// Requests served from the lookup cache
    pub cache_hits: AtomicU64,
    response_times: RwLock<HashMap<String, Vec<u64>>>,
    errors: RwLock<HashMap<String, u64>>,
    successes: RwLock<HashMap<String, u64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_fired(&self) {
        self.fired_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful lookup and its response time
    pub fn record_success(&self, source: &str, time_ms: u64) {
        {
            let mut successes = self.successes.write().unwrap_or_else(PoisonError::into_inner);
            *successes.entry(source.to_string()).or_insert(0) += 1;
        }

        let mut times = self
            .response_times
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = times.entry(source.to_string()).or_default();
        if entry.len() >= RESPONSE_WINDOW {
            entry.remove(0);
        }
        entry.push(time_ms);
    }

    /// Record a failed lookup
    pub fn record_error(&self, source: &str) {
        let mut errors = self.errors.write().unwrap_or_else(PoisonError::into_inner);
        *errors.entry(source.to_string()).or_insert(0) += 1;
    }

    pub fn get_fired(&self) -> u64 {
        self.fired_lookups.load(Ordering::Relaxed)
    }

    pub fn get_cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn get_errors(&self, source: &str) -> u64 {
        *self
            .errors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
            .unwrap_or(&0)
    }

    pub fn get_successes(&self, source: &str) -> u64 {
        *self
            .successes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
            .unwrap_or(&0)
    }

    /// Get average response time for a source
    pub fn get_avg_response_time(&self, source: &str) -> Option<u64> {
        let times = self
            .response_times
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        times.get(source).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(t.iter().sum::<u64>() / t.len() as u64)
            }
        })
    }

    /// Get reliability percentage for a source
    pub fn get_reliability(&self, source: &str) -> f64 {
        let error_count = self.get_errors(source);
        let success_count = self.get_successes(source);

        let total = error_count + success_count;
        if total == 0 {
            100.0
        } else {
            (success_count as f64 / total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.inc_fired();
        metrics.record_success("translate", 100);
        metrics.record_success("translate", 300);
        metrics.record_error("suggest");

        assert_eq!(metrics.get_fired(), 1);
        assert_eq!(metrics.get_avg_response_time("translate"), Some(200));
        assert_eq!(metrics.get_reliability("translate"), 100.0);
        assert_eq!(metrics.get_reliability("suggest"), 0.0);
        assert_eq!(metrics.get_avg_response_time("suggest"), None);
    }

    #[test]
    fn test_response_window() {
        let metrics = Metrics::new();
        for i in 0..150 {
            metrics.record_success("translate", i);
        }
        // Only the last 100 samples (50..150) are kept
        assert_eq!(metrics.get_avg_response_time("translate"), Some(99));
    }
}
