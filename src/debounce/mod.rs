//! Debounce state machine for live query input
//!
//! Every keystroke is observed with a timestamp. Text that stays unchanged
//! for the settle interval fires a lookup; changed text arms a delayed
//! recheck that asks the host to re-issue the query, unless newer input
//! supersedes it first.
//!
//! ```text
//! IDLE --observe--> PENDING --settled, same text--> FIRED --> IDLE
//!                   PENDING --text changes--> PENDING (baseline reset, old timer cancelled)
//!                   PENDING --stale timer--> IDLE (suppressed)
//! ```

use crate::query::{QueryKind, RawQuery};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default time text must stay unchanged before it counts as settled
pub const DEFAULT_SETTLE_INTERVAL: Duration = Duration::from_millis(300);

/// Default delay before a pending query is rechecked
pub const DEFAULT_REQUERY_DELAY: Duration = Duration::from_millis(500);

/// Outcome of observing one raw query
#[derive(Debug, Clone)]
pub enum Decision {
    /// Input settled: run the lookup now
    Fire,
    /// Input changed: show a placeholder and recheck after a delay
    Delay(PendingCheck),
    /// Out-of-order observation; do nothing
    Suppress,
    /// Empty input: translate the clipboard or show history
    ClipboardOrHistory,
    /// Explicit history request
    HistoryRequest,
}

/// A delayed recheck armed by a [`Decision::Delay`]
#[derive(Debug, Clone)]
pub struct PendingCheck {
    /// Raw text to re-issue
    pub text: String,
    /// When the baseline was captured
    pub observed_at: u64,
    /// How long to wait before rechecking
    pub delay: Duration,
    /// Cancelled as soon as newer input supersedes this check
    pub token: CancellationToken,
}

/// Result of a delayed recheck
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recheck {
    /// Baseline still current: ask the host to re-issue this text
    Requery(String),
    /// Superseded by newer input or an already fired lookup
    Suppress,
}

/// Shared debounce bookkeeping, only touched under the controller's lock
#[derive(Debug, Default)]
pub struct DebounceState {
    pub last_raw_query: String,
    pub last_observed_at: u64,
    /// Only moves forward
    pub last_fired_at: Option<u64>,
    pending: Option<CancellationToken>,
}

impl DebounceState {
    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    fn record_fire(&mut self, at: u64) {
        self.last_fired_at = Some(self.last_fired_at.map_or(at, |prev| prev.max(at)));
        self.last_observed_at = self.last_observed_at.max(at);
        self.cancel_pending();
    }
}

/// Decides, per observed raw query, whether to fire, delay or suppress
#[derive(Debug)]
pub struct DebounceController {
    state: Mutex<DebounceState>,
    settle_interval: Duration,
    requery_delay: Duration,
}

impl DebounceController {
    pub fn new(settle_interval: Duration, requery_delay: Duration) -> Self {
        Self {
            state: Mutex::new(DebounceState::default()),
            settle_interval,
            requery_delay,
        }
    }

    fn lock(&self) -> MutexGuard<'_, DebounceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Observe one raw query and decide what to do with it
    pub fn observe(&self, raw: &RawQuery) -> Decision {
        let kind = raw.normalize().kind;
        let mut state = self.lock();

        if raw.observed_at < state.last_observed_at {
            debug!(
                "Suppressing out-of-order query '{}' ({} < {})",
                raw.text, raw.observed_at, state.last_observed_at
            );
            return Decision::Suppress;
        }

        match kind {
            QueryKind::Empty | QueryKind::HistoryRequest => {
                // Newer input: a pending requery for older text must not fire
                state.cancel_pending();
                state.last_raw_query = raw.text.clone();
                state.last_observed_at = raw.observed_at;
                return if kind == QueryKind::Empty {
                    Decision::ClipboardOrHistory
                } else {
                    Decision::HistoryRequest
                };
            }
            QueryKind::Translatable => {}
        }

        let settle_ms = self.settle_interval.as_millis() as u64;
        if state.last_raw_query == raw.text
            && raw.observed_at - state.last_observed_at >= settle_ms
        {
            state.record_fire(raw.observed_at);
            debug!("Firing lookup for '{}' at {}", raw.text, raw.observed_at);
            return Decision::Fire;
        }

        state.cancel_pending();
        let token = CancellationToken::new();
        state.pending = Some(token.clone());
        state.last_raw_query = raw.text.clone();
        state.last_observed_at = raw.observed_at;

        debug!("Delaying query '{}' observed at {}", raw.text, raw.observed_at);
        Decision::Delay(PendingCheck {
            text: raw.text.clone(),
            observed_at: raw.observed_at,
            delay: self.requery_delay,
            token,
        })
    }

    /// Recheck a pending query once its delay has elapsed
    pub fn recheck(&self, pending: &PendingCheck) -> Recheck {
        if pending.token.is_cancelled() {
            return Recheck::Suppress;
        }

        let state = self.lock();
        let fired_since = state
            .last_fired_at
            .is_some_and(|fired| fired >= pending.observed_at);

        if state.last_raw_query == pending.text && !fired_since {
            Recheck::Requery(pending.text.clone())
        } else {
            debug!("Suppressing superseded requery for '{}'", pending.text);
            Recheck::Suppress
        }
    }

    /// Record a lookup fired outside [`observe`](Self::observe), such as the
    /// host's settled path
    pub fn mark_fired(&self, raw: &RawQuery) {
        let mut state = self.lock();
        state.last_raw_query = raw.text.clone();
        state.record_fire(raw.observed_at);
    }

    pub fn last_fired_at(&self) -> Option<u64> {
        self.lock().last_fired_at
    }

    /// Current baseline text
    pub fn baseline(&self) -> String {
        self.lock().last_raw_query.clone()
    }

    pub fn settle_interval(&self) -> Duration {
        self.settle_interval
    }
}

impl Default for DebounceController {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_INTERVAL, DEFAULT_REQUERY_DELAY)
    }
}
