//! Youdao lookup provider
//!
//! Translations use the signed OpenAPI (v3 signature); suggestions use the
//! public dictionary suggest endpoint, which needs no credentials.

use super::traits::{rate_limiter, RemoteLookup};
use crate::config::YoudaoSettings;
use crate::error::{LookupError, LookupResult};
use crate::locales;
use crate::network::{HttpClient, HttpRequest};
use crate::results::{EntryKind, ResultEntry};
use async_trait::async_trait;
use governor::DefaultDirectRateLimiter;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::debug;

const API_NAME: &str = "Youdao";

#[derive(Debug, Clone)]
struct Credentials {
    app_key: String,
    app_secret: String,
}

/// Youdao translate and suggest provider
pub struct Youdao {
    client: HttpClient,
    credentials: Option<Credentials>,
    api_url: String,
    suggest_url: String,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl Youdao {
    pub fn new(client: HttpClient, settings: &YoudaoSettings, requests_per_second: u32) -> Self {
        let credentials = match (&settings.app_key, &settings.app_secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => Some(Credentials {
                app_key: key.clone(),
                app_secret: secret.clone(),
            }),
            _ => None,
        };

        Self {
            client,
            credentials,
            api_url: settings.api_url.clone(),
            suggest_url: settings.suggest_url.clone(),
            limiter: rate_limiter(requests_per_second),
        }
    }

    fn credentials(&self) -> LookupResult<&Credentials> {
        self.credentials.as_ref().ok_or_else(|| {
            LookupError::Uninitialized("Youdao app_key and app_secret are not configured".to_string())
        })
    }
}

/// Text fed into the v3 signature: short input verbatim, long input as
/// first 10 chars + char count + last 10 chars.
fn sign_input(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= 20 {
        return text.to_string();
    }
    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 10..].iter().collect();
    format!("{}{}{}", head, chars.len(), tail)
}

/// v3 request signature: sha256(appKey + input + salt + curtime + appSecret)
fn sign(credentials: &Credentials, text: &str, salt: &str, curtime: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(credentials.app_key.as_bytes());
    hasher.update(sign_input(text).as_bytes());
    hasher.update(salt.as_bytes());
    hasher.update(curtime.as_bytes());
    hasher.update(credentials.app_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    error_code: String,
    #[serde(default)]
    translation: Vec<String>,
    basic: Option<Basic>,
    #[serde(default)]
    web: Vec<WebPhrase>,
    l: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Basic {
    phonetic: Option<String>,
    #[serde(default)]
    explains: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WebPhrase {
    key: String,
    #[serde(default)]
    value: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    result: SuggestStatus,
    data: Option<SuggestData>,
}

#[derive(Debug, Deserialize)]
struct SuggestStatus {
    code: i64,
}

#[derive(Debug, Deserialize)]
struct SuggestData {
    #[serde(default)]
    entries: Vec<SuggestEntry>,
}

#[derive(Debug, Deserialize)]
struct SuggestEntry {
    entry: String,
    #[serde(default)]
    explain: String,
}

fn translate_entries(text: &str, response: TranslateResponse) -> Vec<ResultEntry> {
    let mut entries = Vec::new();

    let translation = response.translation.join("; ");
    if !translation.is_empty() {
        let phonetic = response
            .basic
            .as_ref()
            .and_then(|b| b.phonetic.as_deref())
            .filter(|p| !p.is_empty());
        let subtitle = match phonetic {
            Some(p) => format!("{} [{}]", text, p),
            None => text.to_string(),
        };

        let mut entry = ResultEntry::new(translation.clone(), subtitle)
            .with_copy_target(translation)
            .with_api_name(API_NAME);
        if let Some(direction) = response.l {
            entry = entry.with_trans_type(direction);
        }
        entries.push(entry);
    }

    if let Some(basic) = response.basic {
        for explain in basic.explains.into_iter().filter(|e| !e.is_empty()) {
            entries.push(
                ResultEntry::new(explain, format!("{} [basic]", text)).with_api_name(API_NAME),
            );
        }
    }

    for phrase in response.web {
        let value = phrase.value.join("; ");
        if value.is_empty() {
            continue;
        }
        entries.push(
            ResultEntry::new(value, format!("{} [web]", phrase.key)).with_api_name(API_NAME),
        );
    }

    entries
}

#[async_trait]
impl RemoteLookup for Youdao {
    fn name(&self) -> &str {
        "youdao"
    }

    async fn translate(&self, text: &str, target: Option<&str>) -> LookupResult<Vec<ResultEntry>> {
        let credentials = self.credentials()?;
        let target = locales::resolve_target(target.unwrap_or(locales::AUTO), text);
        let salt = uuid::Uuid::new_v4().to_string();
        let curtime = chrono::Utc::now().timestamp().to_string();
        let signature = sign(credentials, text, &salt, &curtime);

        let form = vec![
            ("q".to_string(), text.to_string()),
            ("from".to_string(), "auto".to_string()),
            ("to".to_string(), target.to_string()),
            ("appKey".to_string(), credentials.app_key.clone()),
            ("salt".to_string(), salt),
            ("sign".to_string(), signature),
            ("signType".to_string(), "v3".to_string()),
            ("curtime".to_string(), curtime),
        ];

        self.limiter.until_ready().await;
        let response = self
            .client
            .execute(HttpRequest::post(&self.api_url).form(form))
            .await?;

        if !response.is_success() {
            return Err(LookupError::from_status(response.status));
        }

        let parsed: TranslateResponse = response.json()?;
        if parsed.error_code != "0" {
            return Err(LookupError::Provider {
                provider: self.name().to_string(),
                code: parsed.error_code,
            });
        }

        let entries = translate_entries(text, parsed);
        debug!("Youdao returned {} entries for '{}'", entries.len(), text);
        Ok(entries)
    }

    async fn suggest(&self, fragment: &str) -> LookupResult<Vec<ResultEntry>> {
        let request = HttpRequest::get(&self.suggest_url)
            .param("num", "5")
            .param("ver", "3.0")
            .param("doctype", "json")
            .param("cache", "false")
            .param("le", "en")
            .param("q", fragment);

        self.limiter.until_ready().await;
        let response = self.client.execute(request).await?;

        if !response.is_success() {
            return Err(LookupError::from_status(response.status));
        }

        let parsed: SuggestResponse = response.json()?;
        if parsed.result.code != 200 {
            return Err(LookupError::Provider {
                provider: self.name().to_string(),
                code: parsed.result.code.to_string(),
            });
        }

        Ok(parsed
            .data
            .map(|d| d.entries)
            .unwrap_or_default()
            .into_iter()
            .filter(|e| !e.entry.trim().is_empty())
            .map(|e| {
                ResultEntry::new(e.entry.clone(), e.explain)
                    .with_copy_target(e.entry)
                    .with_trans_type("suggest")
                    .with_kind(EntryKind::Suggestion)
            })
            .collect())
    }
}
