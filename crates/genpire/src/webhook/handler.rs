//! Webhook handler for 3D-model job callbacks.
//!
//! The handler never errors toward the sender: every payload gets an
//! acknowledgement, and internal failures are logged and flagged in the
//! ack body only.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info_span, Instrument};

use crate::ai::{GenAiError, TaskClient, TaskStatus};
use crate::credits::{self, DebitOutcome, LedgerError};
use crate::db::{model_job_repo, Database, DatabaseError};
use crate::notify::Notifier;

use super::types::{WebhookAck, WebhookPayload};

/// Credits debited for one completed model generation.
pub const MODEL_GENERATION_CREDIT_COST: i64 = 10;

/// Internal webhook processing errors. These never reach the sender.
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("No stored job for task '{0}'")]
    UnknownTask(String),

    #[error("Provider fetch failed: {0}")]
    Provider(#[source] GenAiError),

    #[error("Provider reports success but returned no model url for task '{0}'")]
    MissingResult(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Processes provider callbacks against the stored job records.
pub struct WebhookProcessor {
    db: Database,
    tasks: Arc<dyn TaskClient>,
    notifier: Arc<dyn Notifier>,
    credit_cost: i64,
}

impl WebhookProcessor {
    pub fn new(db: Database, tasks: Arc<dyn TaskClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db,
            tasks,
            notifier,
            credit_cost: MODEL_GENERATION_CREDIT_COST,
        }
    }

    /// Handles one callback. Infallible toward the caller.
    pub async fn handle(&self, payload: WebhookPayload) -> WebhookAck {
        let span = info_span!("webhook", task_id = %payload.task_id, status = ?payload.status);

        match self.process(&payload).instrument(span).await {
            Ok(()) => WebhookAck::processed(&payload.task_id),
            Err(e) => {
                log::error!("Webhook processing failed for {}: {}", payload.task_id, e);
                WebhookAck::failed(&payload.task_id, e.to_string())
            }
        }
    }

    async fn process(&self, payload: &WebhookPayload) -> Result<(), WebhookError> {
        let job = model_job_repo::find_by_task_id(&self.db, &payload.task_id)?
            .ok_or_else(|| WebhookError::UnknownTask(payload.task_id.clone()))?;

        let now = Utc::now().to_rfc3339();

        match payload.status {
            TaskStatus::Pending | TaskStatus::InProgress => {
                model_job_repo::update_status(
                    &self.db,
                    &payload.task_id,
                    payload.status.as_db_str(),
                    None,
                    &now,
                )?;
                Ok(())
            }
            TaskStatus::Failed | TaskStatus::Expired => {
                model_job_repo::update_status(
                    &self.db,
                    &payload.task_id,
                    payload.status.as_db_str(),
                    Some("reported by provider"),
                    &now,
                )?;
                Ok(())
            }
            TaskStatus::Succeeded => self.complete(&job.user_id, payload).await,
        }
    }

    /// Success path: the webhook's own result fields are untrusted, so the
    /// authoritative state comes from a fresh provider fetch.
    async fn complete(&self, user_id: &str, payload: &WebhookPayload) -> Result<(), WebhookError> {
        let result = self
            .tasks
            .fetch_task(&payload.task_id)
            .await
            .map_err(WebhookError::Provider)?;

        let now = Utc::now().to_rfc3339();

        if result.status != TaskStatus::Succeeded {
            // Sender raced ahead of the provider; record what the provider
            // actually says.
            log::warn!(
                "Webhook said SUCCEEDED but provider reports {:?} for {}",
                result.status,
                payload.task_id
            );
            model_job_repo::update_status(
                &self.db,
                &payload.task_id,
                result.status.as_db_str(),
                result.error.as_deref(),
                &now,
            )?;
            return Ok(());
        }

        let model_url = result
            .model_url
            .as_deref()
            .ok_or_else(|| WebhookError::MissingResult(payload.task_id.clone()))?;

        model_job_repo::mark_succeeded(
            &self.db,
            &payload.task_id,
            model_url,
            result.thumbnail_url.as_deref(),
            &now,
        )?;

        if let Err(e) = self
            .notifier
            .notify(
                user_id,
                "Your 3D model is ready",
                &format!("Model generation {} finished: {}", payload.task_id, model_url),
            )
            .await
        {
            log::warn!("Notification failed for {}: {}", user_id, e);
        }

        match credits::debit(&self.db, user_id, self.credit_cost)? {
            DebitOutcome::Debited { consumed } => {
                log::debug!(
                    "Debited {} credits from {} balance(s) for {}",
                    self.credit_cost,
                    consumed.len(),
                    user_id
                );
            }
            DebitOutcome::InsufficientCredits {
                available,
                required,
            } => {
                log::warn!(
                    "User {} has {} credits, {} required; no debit applied",
                    user_id,
                    available,
                    required
                );
            }
        }

        Ok(())
    }
}
