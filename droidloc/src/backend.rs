//! Translation backends.
//!
//! The pipeline only needs "text in, text out, given two language codes";
//! [`TranslationBackend`] is that capability. [`GoogleTranslateBackend`] talks
//! to the public Google Translate endpoint.

use std::time::Duration;

use serde_json::Value;

use crate::error::Error;

pub const DEFAULT_GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// A remote (or stub) translation service.
#[async_trait::async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate `text` from `source` to `target`. Language codes are already
    /// mapped to what the backend expects.
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, Error>;

    /// Short name used in log output.
    fn name(&self) -> &str;
}

/// Google Translate through the keyless `translate_a/single` endpoint.
#[derive(Clone)]
pub struct GoogleTranslateBackend {
    endpoint: String,
    client: reqwest::Client,
}

impl GoogleTranslateBackend {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        Self::with_endpoint(DEFAULT_GOOGLE_ENDPOINT, timeout)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl TranslationBackend for GoogleTranslateBackend {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, Error> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let body: Value = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_google_response(&body)
    }

    fn name(&self) -> &str {
        "google"
    }
}

/// Concatenates the translated chunks of a `translate_a/single` response:
/// `body[0]` is a list of `[translated, original, ...]` sentence chunks.
pub fn parse_google_response(body: &Value) -> Result<String, Error> {
    let chunks = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::translation_error("response has no sentence list", None))?;

    let mut translated = String::new();
    for chunk in chunks {
        if let Some(part) = chunk.get(0).and_then(Value::as_str) {
            translated.push_str(part);
        }
    }
    Ok(translated)
}
