//! 3D-model task provider client.
//!
//! Webhook payloads from the provider are advisory only; the result data
//! a webhook carries is never trusted. This client re-fetches the
//! authoritative task state before anything is stored.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::completion::truncate;
use super::error::GenAiError;

/// Provider task lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Succeeded,
    Failed,
    Expired,
}

impl TaskStatus {
    /// Storage representation for the job record.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Succeeded => "succeeded",
            TaskStatus::Failed => "failed",
            TaskStatus::Expired => "expired",
        }
    }
}

/// Authoritative task state fetched from the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskResult {
    pub task_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub model_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Seam for the 3D-task provider.
#[async_trait]
pub trait TaskClient: Send + Sync {
    async fn fetch_task(&self, task_id: &str) -> Result<TaskResult, GenAiError>;
}

/// HTTP task endpoint over reqwest.
pub struct HttpTaskClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl HttpTaskClient {
    pub fn new(base_url: &str, api_key: SecretString) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl TaskClient for HttpTaskClient {
    async fn fetch_task(&self, task_id: &str) -> Result<TaskResult, GenAiError> {
        let response = self
            .http
            .get(format!("{}/tasks/{}", self.base_url, task_id))
            .bearer_auth(self.api_key.expose_secret())
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

        Ok(response.json().await?)
    }
}
