//! Image-synthesis client.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::storage::data_url;

use super::completion::truncate;
use super::error::GenAiError;

/// Provider-side knobs for one synthesis call.
#[derive(Debug, Clone)]
pub struct ImageOptions {
    /// Let the provider rewrite the prompt before rendering.
    pub enhance_prompt: bool,
    /// Allow a degraded substitute result instead of a hard failure.
    pub fallback_enabled: bool,
    /// Attempts before giving up (1 = no retry).
    pub retry_count: u32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            enhance_prompt: true,
            fallback_enabled: true,
            retry_count: 2,
        }
    }
}

/// A synthesized image: the provider's locator plus the materialized bytes.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub url: String,
    pub data: Vec<u8>,
}

/// Seam for the image-synthesis provider.
#[async_trait]
pub trait ImageClient: Send + Sync {
    /// Renders `prompt` conditioned on the reference image.
    async fn generate(
        &self,
        prompt: &str,
        reference_url: &str,
        opts: &ImageOptions,
    ) -> Result<GeneratedImage, GenAiError>;
}

/// HTTP image-synthesis endpoint over reqwest. Providers answer with a
/// locator that is either a data URL (decoded locally) or a fetchable URL.
pub struct HttpImageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

#[derive(Deserialize)]
struct SynthesisResponse {
    url: String,
}

impl HttpImageClient {
    pub fn new(base_url: &str, api_key: SecretString) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn attempt(
        &self,
        prompt: &str,
        reference_url: &str,
        opts: &ImageOptions,
    ) -> Result<GeneratedImage, GenAiError> {
        let body = serde_json::json!({
            "prompt": prompt,
            "reference_image": reference_url,
            "options": {
                "enhance_prompt": opts.enhance_prompt,
                "fallback_enabled": opts.fallback_enabled,
            },
        });

        let response = self
            .http
            .post(format!("{}/images/generate", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenAiError::Status {
                status: status.as_u16(),
                body: truncate(&body, 500),
            });
        }

        let parsed: SynthesisResponse = response.json().await?;
        let data = self.materialize(&parsed.url).await?;
        if data.is_empty() {
            return Err(GenAiError::Payload("provider returned zero bytes".to_string()));
        }

        Ok(GeneratedImage {
            url: parsed.url,
            data,
        })
    }

    /// Decodes inline data URLs locally; fetches anything else.
    async fn materialize(&self, url: &str) -> Result<Vec<u8>, GenAiError> {
        if let Some(bytes) = data_url::decode(url).map_err(|e| GenAiError::Payload(e.to_string()))? {
            return Ok(bytes);
        }

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenAiError::Status {
                status: status.as_u16(),
                body: format!("fetching generated image from {}", url),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ImageClient for HttpImageClient {
    async fn generate(
        &self,
        prompt: &str,
        reference_url: &str,
        opts: &ImageOptions,
    ) -> Result<GeneratedImage, GenAiError> {
        let attempts = opts.retry_count.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.attempt(prompt, reference_url, opts).await {
                Ok(image) => return Ok(image),
                Err(e) => {
                    log::warn!(
                        "Image synthesis attempt {}/{} failed: {}",
                        attempt,
                        attempts,
                        e
                    );
                    last_error = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(std::time::Duration::from_millis(
                            250 * u64::from(attempt),
                        ))
                        .await;
                    }
                }
            }
        }

        Err(GenAiError::Exhausted {
            attempts,
            last: last_error,
        })
    }
}
