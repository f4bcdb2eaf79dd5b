//! Translator-RS: a debounced, multi-source translation lookup engine
//!
//! Receives the text of a launcher-style query box keystroke by keystroke,
//! decides when input has settled enough to hit the remote providers, and
//! merges translation and suggestion results into one ordered list backed
//! by a small in-memory history.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod debounce;
pub mod dispatch;
pub mod error;
pub mod history;
pub mod host;
pub mod locales;
pub mod lookup;
pub mod metrics;
pub mod network;
pub mod query;
pub mod results;

pub use aggregate::{AggregationEngine, Mode};
pub use config::Settings;
pub use debounce::{Decision, DebounceController};
pub use dispatch::{ContextAction, QueryDispatcher};
pub use error::{LookupError, LookupResult};
pub use history::HistoryStore;
pub use lookup::{LookupBackend, RemoteLookup};
pub use query::{NormalizedQuery, QueryKind, RawQuery};
pub use results::{EntryKind, HistoryEntry, ResultContainer, ResultEntry};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
