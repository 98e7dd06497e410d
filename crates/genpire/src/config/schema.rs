//! Configuration types.

use std::path::PathBuf;

use secrecy::SecretString;
use serde::Deserialize;

use crate::secrets::{resolve_secret, SecretError};

fn default_vision_model() -> String {
    "gpt-4o".to_string()
}

fn default_text_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_estimate_model() -> String {
    "gpt-4o-mini".to_string()
}

/// One remote provider endpoint with a three-source API key: direct
/// value, file path, or env var name, resolved in that order.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEndpoint {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_file: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl ProviderEndpoint {
    pub fn resolve_api_key(&self) -> Result<SecretString, SecretError> {
        resolve_secret(
            self.api_key.as_deref(),
            self.api_key_file.as_deref(),
            self.api_key_env.as_deref(),
        )
    }
}

/// Completion provider endpoint plus model selection.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    #[serde(flatten)]
    pub endpoint: ProviderEndpoint,
    #[serde(default = "default_vision_model")]
    pub vision_model: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_estimate_model")]
    pub estimate_model: String,
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Root directory of the filesystem object store.
    pub artifact_directory: String,
    /// Public URL prefix returned for stored artifacts.
    pub public_base_url: String,
    pub completion: CompletionConfig,
    pub image_synthesis: ProviderEndpoint,
    pub model_tasks: ProviderEndpoint,
}
