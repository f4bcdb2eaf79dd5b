//! Provider registry

use super::google::Google;
use super::mock::MockLookup;
use super::traits::{RemoteLookup, SplitLookup};
use super::youdao::Youdao;
use crate::config::Settings;
use crate::network::HttpClient;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Get a provider by name
pub fn get_provider(
    name: &str,
    settings: &Settings,
    client: &HttpClient,
) -> Option<Arc<dyn RemoteLookup>> {
    let rps = settings.provider.requests_per_second;
    match name.to_lowercase().as_str() {
        "youdao" => Some(Arc::new(Youdao::new(client.clone(), &settings.provider.youdao, rps))),
        "google" => Some(Arc::new(Google::new(client.clone(), &settings.provider.google, rps))),
        "mock" => Some(Arc::new(MockLookup::new())),
        _ => None,
    }
}

/// List available providers
pub fn list_providers() -> Vec<&'static str> {
    vec!["youdao", "google", "mock"]
}

/// Build the lookup configured by `settings.provider`.
///
/// When translator and suggester name the same provider a single instance
/// serves both operations.
pub fn build(settings: &Settings, client: &HttpClient) -> Result<Arc<dyn RemoteLookup>> {
    let translator_name = &settings.provider.translator;
    let suggester_name = &settings.provider.suggester;

    let translator = get_provider(translator_name, settings, client)
        .ok_or_else(|| anyhow::anyhow!("Unknown lookup provider: {}", translator_name))?;

    if translator_name.eq_ignore_ascii_case(suggester_name) {
        info!("Using provider '{}' for translate and suggest", translator.name());
        return Ok(translator);
    }

    let suggester = get_provider(suggester_name, settings, client)
        .ok_or_else(|| anyhow::anyhow!("Unknown lookup provider: {}", suggester_name))?;

    let lookup = SplitLookup::new(translator, suggester);
    info!("Using providers '{}'", lookup.name());
    Ok(Arc::new(lookup))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(translator: &str, suggester: &str) -> Settings {
        let mut settings = Settings::default();
        settings.provider.translator = translator.to_string();
        settings.provider.suggester = suggester.to_string();
        settings
    }

    #[test]
    fn test_get_provider() {
        let client = HttpClient::new().unwrap();
        let settings = Settings::default();

        for name in list_providers() {
            let provider = get_provider(name, &settings, &client).unwrap();
            assert_eq!(provider.name(), name);
        }
        assert!(get_provider("GOOGLE", &settings, &client).is_some());
        assert!(get_provider("bing", &settings, &client).is_none());
    }

    #[test]
    fn test_build_single_provider() {
        let client = HttpClient::new().unwrap();
        let lookup = build(&settings("mock", "mock"), &client).unwrap();
        assert_eq!(lookup.name(), "mock");
    }

    #[test]
    fn test_build_split_provider() {
        let client = HttpClient::new().unwrap();
        let lookup = build(&settings("google", "youdao"), &client).unwrap();
        assert_eq!(lookup.name(), "google+youdao");
    }

    #[test]
    fn test_build_unknown_provider() {
        let client = HttpClient::new().unwrap();
        assert!(build(&settings("nope", "mock"), &client).is_err());
        assert!(build(&settings("mock", "nope"), &client).is_err());
    }
}
