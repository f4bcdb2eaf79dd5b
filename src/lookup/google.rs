//! Google lookup provider
//!
//! Uses the public translate endpoint (translation plus dictionary senses)
//! and the complete/search suggestion endpoint.

use super::traits::{rate_limiter, RemoteLookup};
use crate::config::GoogleSettings;
use crate::error::{LookupError, LookupResult};
use crate::locales;
use crate::network::{HttpClient, HttpRequest};
use crate::results::{EntryKind, ResultEntry};
use async_trait::async_trait;
use governor::DefaultDirectRateLimiter;
use serde_json::Value;
use std::sync::Arc;

const API_NAME: &str = "Google";

/// Google translate and suggest provider
pub struct Google {
    client: HttpClient,
    translate_url: String,
    suggest_url: String,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl Google {
    pub fn new(client: HttpClient, settings: &GoogleSettings, requests_per_second: u32) -> Self {
        Self {
            client,
            translate_url: settings.translate_url.clone(),
            suggest_url: settings.suggest_url.clone(),
            limiter: rate_limiter(requests_per_second),
        }
    }
}

/// Parse the nested-array translate response.
///
/// `[0]` holds translated segments `[translated, original, ...]`,
/// `[1]` holds dictionary senses `[part_of_speech, [terms...], ...]`.
fn parse_translation(text: &str, json: &Value) -> LookupResult<Vec<ResultEntry>> {
    let segments = json
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| LookupError::Parse("missing translation segments".to_string()))?;

    let translation: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(|v| v.as_str()))
        .collect();

    let mut entries = Vec::new();
    if !translation.is_empty() {
        let source = json.get(2).and_then(|v| v.as_str()).unwrap_or("auto");
        entries.push(
            ResultEntry::new(translation.clone(), text)
                .with_copy_target(translation)
                .with_api_name(API_NAME)
                .with_trans_type(source),
        );
    }

    if let Some(senses) = json.get(1).and_then(|v| v.as_array()) {
        for sense in senses {
            let pos = sense.get(0).and_then(|v| v.as_str()).unwrap_or_default();
            let terms: Vec<&str> = sense
                .get(1)
                .and_then(|v| v.as_array())
                .map(|arr| arr.iter().filter_map(|t| t.as_str()).collect())
                .unwrap_or_default();
            if terms.is_empty() {
                continue;
            }
            entries.push(
                ResultEntry::new(terms.join(", "), format!("{} [{}]", text, pos))
                    .with_api_name(API_NAME),
            );
        }
    }

    Ok(entries)
}

#[async_trait]
impl RemoteLookup for Google {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(&self, text: &str, target: Option<&str>) -> LookupResult<Vec<ResultEntry>> {
        let target = locales::resolve_target(target.unwrap_or(locales::AUTO), text);
        let request = HttpRequest::get(&self.translate_url)
            .param("client", "gtx")
            .param("sl", "auto")
            .param("tl", locales::google_code(target))
            .param("dt", "t")
            .param("dt", "bd")
            .param("q", text);

        self.limiter.until_ready().await;
        let response = self.client.execute(request).await?;

        if !response.is_success() {
            return Err(LookupError::from_status(response.status));
        }

        let json: Value = response.json()?;
        parse_translation(text, &json)
    }

    async fn suggest(&self, fragment: &str) -> LookupResult<Vec<ResultEntry>> {
        let request = HttpRequest::get(&self.suggest_url)
            .param("q", fragment)
            .param("client", "firefox");

        self.limiter.until_ready().await;
        let response = self.client.execute(request).await?;

        if !response.is_success() {
            return Err(LookupError::from_status(response.status));
        }

        // Google returns: [query, [suggestions...]]
        let json: Value = response.json()?;

        Ok(json
            .as_array()
            .and_then(|arr| arr.get(1))
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        ResultEntry::new(s, format!("{} [suggest]", fragment))
                            .with_trans_type("suggest")
                            .with_kind(EntryKind::Suggestion)
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn google(server: &MockServer) -> Google {
        let settings = GoogleSettings {
            translate_url: format!("{}/translate_a/single", server.uri()),
            suggest_url: format!("{}/complete/search", server.uri()),
        };
        Google::new(HttpClient::new().unwrap(), &settings, 50)
    }

    #[test]
    fn test_parse_translation() {
        let json = json!([
            [["Hello ", "Bonjour ", null, null, 10], ["world", "monde", null, null, 10]],
            [["interjection", ["hello", "hi"]]],
            "fr"
        ]);

        let entries = parse_translation("Bonjour monde", &json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Hello world");
        assert_eq!(entries[0].trans_type.as_deref(), Some("fr"));
        assert_eq!(entries[1].title, "hello, hi");
        assert_eq!(entries[1].subtitle, "Bonjour monde [interjection]");
    }

    #[test]
    fn test_parse_translation_rejects_garbage() {
        assert!(parse_translation("x", &json!({"error": true})).is_err());
    }

    #[tokio::test]
    async fn test_translate_maps_target_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("tl", "zh-CN"))
            .and(query_param("q", "hello"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([[["你好", "hello", null, null, 10]], null, "en"])),
            )
            .mount(&server)
            .await;

        let entries = google(&server).translate("hello", Some("zh-CHS")).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "你好");
        assert_eq!(entries[0].from_api_name.as_deref(), Some("Google"));
    }

    #[tokio::test]
    async fn test_suggest() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/complete/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!(["hel", ["hello", "help", "helsinki"]])),
            )
            .mount(&server)
            .await;

        let entries = google(&server).suggest("hel").await.unwrap();
        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["hello", "help", "helsinki"]);
        assert!(entries.iter().all(|e| e.kind == EntryKind::Suggestion));
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = google(&server).translate("hello", None).await.unwrap_err();
        assert_eq!(err, LookupError::Status(503));
    }
}
