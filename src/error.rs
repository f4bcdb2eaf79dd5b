//! Error types for remote lookups

use thiserror::Error;

/// Failure reported by a remote lookup provider.
///
/// None of these escape the query paths: the aggregation engine logs them
/// and drops the failing source's contribution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Status(u16),

    #[error("{provider} returned error code {code}")]
    Provider { provider: String, code: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("request timed out")]
    Timeout,

    #[error("rate limited by provider")]
    RateLimited,

    #[error("backend not initialized: {0}")]
    Uninitialized(String),
}

impl LookupError {
    /// Map a non-2xx status to the matching variant
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            408 | 504 => Self::Timeout,
            _ => Self::Status(status),
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<anyhow::Error> for LookupError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(req) = err.downcast_ref::<reqwest::Error>() {
            if req.is_timeout() {
                return Self::Timeout;
            }
        }
        Self::Network(format!("{:#}", err))
    }
}

/// Convenience alias for lookup results
pub type LookupResult<T> = std::result::Result<T, LookupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert_eq!(LookupError::from_status(429), LookupError::RateLimited);
        assert_eq!(LookupError::from_status(504), LookupError::Timeout);
        assert_eq!(LookupError::from_status(500), LookupError::Status(500));
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: LookupError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, LookupError::Parse(_)));
    }

    #[test]
    fn test_display() {
        let err = LookupError::Provider {
            provider: "youdao".to_string(),
            code: "108".to_string(),
        };
        assert_eq!(err.to_string(), "youdao returned error code 108");
    }
}
