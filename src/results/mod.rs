//! Result types and container for lookup results
//!
//! This module defines the entries shown to the caller and the container that
//! merges the output of concurrent lookups in a fixed source order.

mod container;
mod types;

pub use container::{ResultContainer, SourceFailure};
pub use types::*;
