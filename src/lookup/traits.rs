//! Remote lookup traits and shared helpers

use crate::error::LookupResult;
use crate::results::ResultEntry;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// A remote translation and suggestion provider.
///
/// Calls may be slow and may fail. Providers enforce their own timeouts and
/// rate limits; callers add neither.
#[async_trait]
pub trait RemoteLookup: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// One-time initialization, run in the background before first use
    async fn init(&self) -> LookupResult<()> {
        Ok(())
    }

    /// Translate normalized text. `target` is a code from
    /// [`crate::locales::TARGET_LANGUAGES`]; `None` lets the provider choose.
    async fn translate(&self, text: &str, target: Option<&str>) -> LookupResult<Vec<ResultEntry>>;

    /// Fetch completions for a raw fragment
    async fn suggest(&self, fragment: &str) -> LookupResult<Vec<ResultEntry>>;
}

/// Build a per-provider rate limiter allowing `per_second` requests
pub fn rate_limiter(per_second: u32) -> Arc<DefaultDirectRateLimiter> {
    let quota = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(Quota::per_second(quota)))
}

/// Routes translations and suggestions to different providers
pub struct SplitLookup {
    translator: Arc<dyn RemoteLookup>,
    suggester: Arc<dyn RemoteLookup>,
    name: String,
}

impl SplitLookup {
    pub fn new(translator: Arc<dyn RemoteLookup>, suggester: Arc<dyn RemoteLookup>) -> Self {
        let name = format!("{}+{}", translator.name(), suggester.name());
        Self {
            translator,
            suggester,
            name,
        }
    }
}

#[async_trait]
impl RemoteLookup for SplitLookup {
    fn name(&self) -> &str {
        &self.name
    }

    async fn init(&self) -> LookupResult<()> {
        futures::try_join!(self.translator.init(), self.suggester.init())?;
        Ok(())
    }

    async fn translate(&self, text: &str, target: Option<&str>) -> LookupResult<Vec<ResultEntry>> {
        self.translator.translate(text, target).await
    }

    async fn suggest(&self, fragment: &str) -> LookupResult<Vec<ResultEntry>> {
        self.suggester.suggest(fragment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::mock::MockLookup;

    #[tokio::test]
    async fn test_split_routes_by_operation() {
        let translator = Arc::new(MockLookup::new().named("a"));
        let suggester = Arc::new(MockLookup::new().named("b"));
        let split = SplitLookup::new(translator.clone(), suggester.clone());

        assert_eq!(split.name(), "a+b");
        split.init().await.unwrap();
        split.translate("hello", Some("fr")).await.unwrap();
        split.suggest("hel").await.unwrap();

        assert_eq!(translator.translate_calls(), 1);
        assert_eq!(translator.suggest_calls(), 0);
        assert_eq!(suggester.suggest_calls(), 1);
        assert_eq!(translator.init_calls(), 1);
        assert_eq!(suggester.init_calls(), 1);
    }

    #[tokio::test]
    async fn test_rate_limiter_allows_burst() {
        let limiter = rate_limiter(3);
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }
}
