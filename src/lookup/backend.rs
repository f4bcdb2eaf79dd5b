//! Lazily initialized lookup backend

use super::traits::RemoteLookup;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

const UNINITIALIZED: u8 = 0;
const INITIALIZING: u8 = 1;
const READY: u8 = 2;

/// Wraps a [`RemoteLookup`] whose initialization runs once in the background
#[derive(Clone)]
pub struct LookupBackend {
    lookup: Arc<dyn RemoteLookup>,
    state: Arc<AtomicU8>,
}

impl LookupBackend {
    pub fn new(lookup: Arc<dyn RemoteLookup>) -> Self {
        Self {
            lookup,
            state: Arc::new(AtomicU8::new(UNINITIALIZED)),
        }
    }

    /// The wrapped lookup
    pub fn lookup(&self) -> Arc<dyn RemoteLookup> {
        self.lookup.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.state.load(Ordering::Acquire) == READY
    }

    /// Returns true once the backend is ready.
    ///
    /// The first call on an uninitialized backend spawns initialization;
    /// calls made while it is running do not spawn it again. A failed
    /// initialization is retried by the next call.
    pub fn ensure_ready(&self) -> bool {
        match self.state.load(Ordering::Acquire) {
            READY => true,
            INITIALIZING => false,
            _ => {
                if self
                    .state
                    .compare_exchange(UNINITIALIZED, INITIALIZING, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    self.spawn_init();
                }
                false
            }
        }
    }

    fn spawn_init(&self) {
        let lookup = self.lookup.clone();
        let state = self.state.clone();

        tokio::spawn(async move {
            match lookup.init().await {
                Ok(()) => {
                    info!("Lookup backend '{}' initialized", lookup.name());
                    state.store(READY, Ordering::Release);
                }
                Err(e) => {
                    warn!("Failed to initialize lookup backend '{}': {}", lookup.name(), e);
                    state.store(UNINITIALIZED, Ordering::Release);
                }
            }
        });
    }
}
