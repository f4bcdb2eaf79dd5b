//! Settings structures for Translator-RS configuration

use crate::locales;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub query: QuerySettings,
    pub provider: ProviderSettings,
    pub outgoing: OutgoingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (TRANSLATOR_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("TRANSLATOR_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("TRANSLATOR_ENABLE_SUGGESTIONS") {
            if let Ok(enabled) = val.parse() {
                self.query.enable_suggestions = enabled;
            }
        }
        if let Ok(val) = std::env::var("TRANSLATOR_ENABLE_AUTO_READ") {
            if let Ok(enabled) = val.parse() {
                self.query.enable_auto_read = enabled;
            }
        }
        if let Ok(val) = std::env::var("TRANSLATOR_TARGET_LANGUAGE") {
            self.query.default_target_language = val;
        }
        if let Ok(val) = std::env::var("TRANSLATOR_PROVIDER") {
            self.provider.translator = val.clone();
            self.provider.suggester = val;
        }
        if let Ok(val) = std::env::var("TRANSLATOR_YOUDAO_APP_KEY") {
            self.provider.youdao.app_key = Some(val);
        }
        if let Ok(val) = std::env::var("TRANSLATOR_YOUDAO_APP_SECRET") {
            self.provider.youdao.app_secret = Some(val);
        }
    }

    /// Replace out-of-range values with their defaults
    pub fn validate(&mut self) {
        if !locales::is_supported(&self.query.default_target_language) {
            warn!(
                "Unsupported target language '{}', falling back to auto",
                self.query.default_target_language
            );
            self.query.default_target_language = locales::AUTO.to_string();
        }
        if self.query.history_capacity == 0 {
            warn!("history_capacity must be positive, using default");
            self.query.history_capacity = QuerySettings::default().history_capacity;
        }
        if self.provider.requests_per_second == 0 {
            self.provider.requests_per_second = ProviderSettings::default().requests_per_second;
        }
    }

    /// Select the target language by the host's combo-box index
    pub fn set_target_by_index(&mut self, index: usize) {
        self.query.default_target_language = locales::target_by_index(index).to_string();
    }
}

/// General settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Append diagnostic entries to results
    pub debug: bool,
}

/// Query handling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Run suggestion lookups alongside translations
    pub enable_suggestions: bool,
    /// Read the first result aloud on the settled path
    pub enable_auto_read: bool,
    /// Target language code ("auto" picks per query)
    pub default_target_language: String,
    /// Minimum time text must stay unchanged before it counts as settled
    pub settle_interval_ms: u64,
    /// Delay before asking the host to re-issue a pending query
    pub requery_delay_ms: u64,
    /// Maximum number of history entries kept
    pub history_capacity: usize,
    /// Clipboard text longer than this is not translated
    pub clipboard_max_chars: usize,
    /// Lookup cache TTL in seconds (0 disables the cache)
    pub cache_ttl_secs: u64,
}

impl QuerySettings {
    pub fn settle_interval(&self) -> Duration {
        Duration::from_millis(self.settle_interval_ms)
    }

    pub fn requery_delay(&self) -> Duration {
        Duration::from_millis(self.requery_delay_ms)
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            enable_suggestions: true,
            enable_auto_read: false,
            default_target_language: locales::AUTO.to_string(),
            settle_interval_ms: 300,
            requery_delay_ms: 500,
            history_capacity: 20,
            clipboard_max_chars: 500,
            cache_ttl_secs: 300,
        }
    }
}

/// Lookup provider selection and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Provider used for translations
    pub translator: String,
    /// Provider used for suggestions
    pub suggester: String,
    /// Per-provider request budget
    pub requests_per_second: u32,
    pub youdao: YoudaoSettings,
    pub google: GoogleSettings,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            translator: "google".to_string(),
            suggester: "youdao".to_string(),
            requests_per_second: 5,
            youdao: YoudaoSettings::default(),
            google: GoogleSettings::default(),
        }
    }
}

/// Youdao OpenAPI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoudaoSettings {
    pub app_key: Option<String>,
    pub app_secret: Option<String>,
    pub api_url: String,
    pub suggest_url: String,
}

impl Default for YoudaoSettings {
    fn default() -> Self {
        Self {
            app_key: None,
            app_secret: None,
            api_url: "https://openapi.youdao.com/api".to_string(),
            suggest_url: "https://dict.youdao.com/suggest".to_string(),
        }
    }
}

/// Google endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    pub translate_url: String,
    pub suggest_url: String,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            translate_url: "https://translate.googleapis.com/translate_a/single".to_string(),
            suggest_url: "https://www.google.com/complete/search".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 3.0,
            pool_maxsize: 10,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.query.enable_suggestions);
        assert!(!settings.query.enable_auto_read);
        assert_eq!(settings.query.default_target_language, "auto");
        assert_eq!(settings.query.settle_interval(), Duration::from_millis(300));
        assert_eq!(settings.query.requery_delay(), Duration::from_millis(500));
        assert_eq!(settings.query.history_capacity, 20);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
query:
  enable_suggestions: false
  default_target_language: ja
provider:
  translator: google
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert!(!settings.query.enable_suggestions);
        assert_eq!(settings.query.default_target_language, "ja");
        assert_eq!(settings.query.settle_interval_ms, 300);
        assert_eq!(settings.provider.translator, "google");
        assert_eq!(settings.provider.suggester, "youdao");
    }

    #[test]
    fn test_validate_unsupported_language() {
        let mut settings = Settings::default();
        settings.query.default_target_language = "klingon".to_string();
        settings.query.history_capacity = 0;
        settings.validate();

        assert_eq!(settings.query.default_target_language, "auto");
        assert_eq!(settings.query.history_capacity, 20);
    }

    #[test]
    fn test_target_by_index() {
        let mut settings = Settings::default();
        settings.set_target_by_index(3);
        assert_eq!(settings.query.default_target_language, "en");

        settings.set_target_by_index(99);
        assert_eq!(settings.query.default_target_language, "auto");
    }
}
