//! User notification seam.
//!
//! Delivery (mail, push) lives in the embedding application; this crate
//! only needs a sink it can hand completed-job notices to.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from notification delivery.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// Delivers a notice to a user.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Log-only notifier for deployments without a delivery channel.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, user_id: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        log::info!("Notify {}: {} — {}", user_id, subject, body);
        Ok(())
    }
}
