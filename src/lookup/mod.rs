//! Remote lookup providers
//!
//! Defines the [`RemoteLookup`] trait, the lazily initialized backend that
//! wraps it, and the concrete providers.

mod backend;
mod registry;
mod traits;

pub mod google;
pub mod mock;
pub mod youdao;

pub use backend::LookupBackend;
pub use registry::{build, get_provider, list_providers};
pub use traits::*;
