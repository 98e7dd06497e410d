pub mod adapter;
pub mod ai;
pub mod api;
pub mod config;
pub mod credits;
pub mod db;
pub mod error;
pub mod generator;
pub mod logging;
pub mod notify;
pub mod revision;
pub mod secrets;
pub mod storage;
pub mod webhook;

pub use adapter::{SchemaMapping, SchemaProfile};
pub use ai::{CompletionClient, GenAiError, ImageClient, TaskClient, TaskStatus};
pub use config::{load_config, Config};
pub use db::Database;
pub use error::{ConfigError, GenpireError, Result};
pub use generator::{CostEstimator, GeneratorError, MultiViewEditor};
pub use notify::{LogNotifier, Notifier};
pub use revision::{Batch, RevisionStore};
pub use secrets::{resolve_secret, resolve_secret_optional, SecretError};
pub use storage::{FsObjectStore, ObjectStore};
pub use webhook::WebhookProcessor;
