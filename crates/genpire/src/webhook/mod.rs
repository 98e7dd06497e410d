//! Provider webhook processing for asynchronous 3D-model jobs.

pub mod handler;
pub mod types;

pub use handler::{WebhookError, WebhookProcessor};
pub use types::{WebhookAck, WebhookPayload};
