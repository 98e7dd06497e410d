//! Chat-completion client (text and vision).

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

use super::error::GenAiError;

/// One message in a completion request. Image parts make the request a
/// vision call; providers that cannot see images reject it upstream.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: &'static str,
    pub text: String,
    pub image_urls: Vec<String>,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system",
            text: text.into(),
            image_urls: Vec::new(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user",
            text: text.into(),
            image_urls: Vec::new(),
        }
    }

    pub fn user_with_images(text: impl Into<String>, image_urls: Vec<String>) -> Self {
        Self {
            role: "user",
            text: text.into(),
            image_urls,
        }
    }
}

/// Request configuration for one completion call.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Fixed sampling seed for reproducible output.
    pub seed: Option<u64>,
    /// Constrain the response to a single JSON object.
    pub json_response: bool,
}

/// Seam for the chat-completion provider.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[Message],
        opts: &CompletionOptions,
    ) -> Result<String, GenAiError>;
}

/// OpenAI-compatible chat-completions endpoint over reqwest.
pub struct HttpCompletionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

#[derive(Serialize)]
struct WirePart<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<WireImageUrl<'a>>,
}

#[derive(Serialize)]
struct WireImageUrl<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: Vec<WirePart<'a>>,
}

impl HttpCompletionClient {
    pub fn new(base_url: &str, api_key: SecretString) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn wire_messages<'a>(messages: &'a [Message]) -> Vec<WireMessage<'a>> {
        messages
            .iter()
            .map(|m| {
                let mut content = vec![WirePart {
                    kind: "text",
                    text: Some(&m.text),
                    image_url: None,
                }];
                content.extend(m.image_urls.iter().map(|url| WirePart {
                    kind: "image_url",
                    text: None,
                    image_url: Some(WireImageUrl { url }),
                }));
                WireMessage {
                    role: m.role,
                    content,
                }
            })
            .collect()
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        messages: &[Message],
        opts: &CompletionOptions,
    ) -> Result<String, GenAiError> {
        let mut body = serde_json::json!({
            "model": opts.model,
            "messages": Self::wire_messages(messages),
            "max_tokens": opts.max_tokens,
            "temperature": opts.temperature,
        });
        if let Some(seed) = opts.seed {
            body["seed"] = seed.into();
        }
        if opts.json_response {
            body["response_format"] = serde_json::json!({"type": "json_object"});
        }

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
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

        let parsed: Value = response.json().await?;
        let content = parsed
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| GenAiError::InvalidResponse("missing choices[0].message.content".to_string()))?;

        if content.trim().is_empty() {
            return Err(GenAiError::EmptyCompletion);
        }

        Ok(content.to_string())
    }
}

/// Truncates provider error bodies before they reach logs.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.len() > max {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated)", &s[..end])
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_messages_carry_images() {
        let messages = vec![
            Message::system("You inspect product artwork."),
            Message::user_with_images(
                "Describe the change",
                vec!["https://cdn.test/front.png".to_string()],
            ),
        ];
        let wire = HttpCompletionClient::wire_messages(&messages);
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json[0]["role"], "system");
        assert_eq!(json[0]["content"].as_array().unwrap().len(), 1);
        assert_eq!(json[1]["content"][1]["type"], "image_url");
        assert_eq!(
            json[1]["content"][1]["image_url"]["url"],
            "https://cdn.test/front.png"
        );
    }

    #[test]
    fn test_truncate_bounds_and_char_safety() {
        assert_eq!(truncate("short", 10), "short");
        let long = "a".repeat(600);
        let out = truncate(&long, 500);
        assert!(out.len() < 600);
        assert!(out.ends_with("(truncated)"));
        // Multi-byte boundary must not panic.
        let multi = "é".repeat(300);
        truncate(&multi, 401);
    }
}
