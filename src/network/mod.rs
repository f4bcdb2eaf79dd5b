//! HTTP networking module
//!
//! Provides the HTTP client used by the remote lookup providers.

mod client;
mod user_agent;

pub use client::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use user_agent::generate_user_agent;
