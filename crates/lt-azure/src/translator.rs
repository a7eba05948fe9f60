//! Azure Translator client
//!
//! Translation into the four pipeline targets and transliteration into
//! Latin script, over the Translator v3 REST API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use lt_core::{Language, TranslationContext, TranslatorConfig};

use crate::error::{AzureError, Result};

const API_VERSION: &str = "3.0";

/// Source script for transliteration into Latin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Traditional Chinese
    Hant,
    /// Japanese
    Jpan,
    /// Korean
    Kore,
}

impl Script {
    /// Script code as the API expects it
    pub fn code(&self) -> &'static str {
        match self {
            Self::Hant => "Hant",
            Self::Jpan => "Jpan",
            Self::Kore => "Kore",
        }
    }

    /// Language the script is transliterated from
    pub fn language(&self) -> Language {
        match self {
            Self::Hant => Language::TraditionalChinese,
            Self::Jpan => Language::Japanese,
            Self::Kore => Language::Korean,
        }
    }
}

#[derive(Serialize)]
struct InputText<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateItem {
    detected_language: Option<DetectedLanguage>,
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct DetectedLanguage {
    language: Language,
    #[serde(default)]
    score: f32,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
    to: Language,
}

#[derive(Debug, Deserialize)]
struct TransliterateItem {
    text: String,
}

/// Azure Translator client
#[derive(Clone)]
pub struct TranslatorClient {
    client: Client,
    key: String,
    region: String,
    endpoint: String,
}

impl TranslatorClient {
    /// Create a new translator client
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AzureError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            key: config.key.clone(),
            region: config.region.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn post(&self, operation: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.endpoint, operation);
        self.client
            .post(url)
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header("Ocp-Apim-Subscription-Region", &self.region)
            .header("X-ClientTraceId", uuid::Uuid::new_v4().to_string())
    }

    /// Translate `text` into every target language.
    ///
    /// The returned context only keeps the targets relevant to the detected
    /// source language.
    pub async fn translate(&self, text: &str) -> Result<TranslationContext> {
        let targets = Language::TARGETS;
        let mut query: Vec<(&str, &str)> = vec![("api-version", API_VERSION)];
        for target in &targets {
            query.push(("to", target.code()));
        }

        debug!("Translating {} chars", text.chars().count());

        let response = self
            .post("translate")
            .query(&query)
            .json(&[InputText { text }])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AzureError::from_response(response).await);
        }

        let items: Vec<TranslateItem> = response
            .json()
            .await
            .map_err(|e| AzureError::ParseError(e.to_string()))?;

        let item = items
            .into_iter()
            .next()
            .ok_or_else(|| AzureError::ParseError("empty translation response".to_string()))?;
        let detected = item
            .detected_language
            .ok_or_else(|| AzureError::ParseError("missing detected language".to_string()))?;

        info!(
            "Detected language {} (score {:.2}), {} translations",
            detected.language,
            detected.score,
            item.translations.len()
        );

        Ok(TranslationContext::from_response(
            detected.language,
            item.translations.into_iter().map(|t| (t.to, t.text)),
        ))
    }

    /// Transliterate `text` from `script` into Latin script.
    ///
    /// Returns `None` when the service answers with no result.
    pub async fn transliterate(&self, text: &str, script: Script) -> Result<Option<String>> {
        let language = script.language();
        let query = [
            ("api-version", API_VERSION),
            ("language", language.code()),
            ("fromScript", script.code()),
            ("toScript", "Latn"),
        ];

        debug!("Transliterating {} from {}", language, script.code());

        let response = self
            .post("transliterate")
            .query(&query)
            .json(&[InputText { text }])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AzureError::from_response(response).await);
        }

        let items: Vec<TransliterateItem> = response
            .json()
            .await
            .map_err(|e| AzureError::ParseError(e.to_string()))?;

        Ok(items.into_iter().next().map(|item| item.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TranslatorClient {
        TranslatorClient::new(&TranslatorConfig {
            key: "test-key".to_string(),
            region: "eastasia".to_string(),
            endpoint: server.uri(),
        })
        .unwrap()
    }

    #[test]
    fn test_script_languages() {
        assert_eq!(Script::Hant.language(), Language::TraditionalChinese);
        assert_eq!(Script::Jpan.code(), "Jpan");
        assert_eq!(Script::Kore.language().code(), "ko");
    }

    #[tokio::test]
    async fn test_translate_english_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(query_param("api-version", "3.0"))
            .and(query_param("to", "zh-Hant"))
            .and(header("Ocp-Apim-Subscription-Key", "test-key"))
            .and(header("Ocp-Apim-Subscription-Region", "eastasia"))
            .and(body_json(json!([{ "Text": "Good morning" }])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "detectedLanguage": { "language": "en", "score": 1.0 },
                "translations": [
                    { "text": "Good morning", "to": "en" },
                    { "text": "早安", "to": "zh-Hant" },
                    { "text": "おはよう", "to": "ja" },
                    { "text": "좋은 아침", "to": "ko" }
                ]
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = client_for(&server).translate("Good morning").await.unwrap();
        assert_eq!(ctx.detected, Language::English);
        assert_eq!(ctx.zh_hant.as_deref(), Some("早安"));
        assert_eq!(ctx.ko.as_deref(), Some("좋은 아침"));
        assert_eq!(ctx.summary(), "早安\nおはよう\n좋은 아침");
    }

    #[tokio::test]
    async fn test_translate_chinese_input_leaves_chinese_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "detectedLanguage": { "language": "zh-Hant", "score": 0.98 },
                "translations": [
                    { "text": "Hello", "to": "en" },
                    { "text": "你好", "to": "zh-Hant" },
                    { "text": "こんにちは", "to": "ja" },
                    { "text": "안녕하세요", "to": "ko" }
                ]
            }])))
            .mount(&server)
            .await;

        let ctx = client_for(&server).translate("你好").await.unwrap();
        assert_eq!(ctx.detected, Language::TraditionalChinese);
        assert!(ctx.zh_hant.is_none());
        assert_eq!(ctx.en.as_deref(), Some("Hello"));
    }

    #[tokio::test]
    async fn test_translate_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = client_for(&server).translate("hi").await.unwrap_err();
        match err {
            AzureError::ApiError { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "bad key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_translate_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let err = client_for(&server).translate("hi").await.unwrap_err();
        assert!(matches!(err, AzureError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_transliterate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transliterate"))
            .and(query_param("language", "zh-Hant"))
            .and(query_param("fromScript", "Hant"))
            .and(query_param("toScript", "Latn"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "text": "zǎo ān", "script": "Latn" }
            ])))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .transliterate("早安", Script::Hant)
            .await
            .unwrap();
        assert_eq!(result.as_deref(), Some("zǎo ān"));
    }

    #[tokio::test]
    async fn test_transliterate_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transliterate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .transliterate("おはよう", Script::Jpan)
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
