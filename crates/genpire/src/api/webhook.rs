//! Provider webhook endpoint.

use crate::webhook::{WebhookAck, WebhookPayload, WebhookProcessor};

/// Receives one provider callback. The ack always represents a success
/// status toward the sender; processing errors ride inside the body.
pub async fn receive_model_webhook(
    processor: &WebhookProcessor,
    payload: WebhookPayload,
) -> WebhookAck {
    processor.handle(payload).await
}
