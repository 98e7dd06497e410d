//! Webhook wire types.

use serde::{Deserialize, Serialize};

use crate::ai::TaskStatus;

/// Incoming webhook body. Only the task id and status are read; any
/// result fields the sender includes are ignored in favor of a fresh
/// fetch from the provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub task_id: String,
    pub status: TaskStatus,
}

/// Acknowledgement returned to the sender. Always delivered with a
/// success status so the sender's retry logic stays quiet; internal
/// failures surface only in the body flag and the server logs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub received: bool,
    pub task_id: String,
    pub processed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WebhookAck {
    pub fn processed(task_id: &str) -> Self {
        Self {
            received: true,
            task_id: task_id.to_string(),
            processed: true,
            error: None,
        }
    }

    pub fn failed(task_id: &str, error: String) -> Self {
        Self {
            received: true,
            task_id: task_id.to_string(),
            processed: false,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_parses_camel_case() {
        let payload: WebhookPayload =
            serde_json::from_str(r#"{"taskId": "t1", "status": "SUCCEEDED"}"#).unwrap();
        assert_eq!(payload.task_id, "t1");
        assert_eq!(payload.status, TaskStatus::Succeeded);
    }

    #[test]
    fn test_payload_ignores_untrusted_result_fields() {
        let payload: WebhookPayload = serde_json::from_str(
            r#"{"taskId": "t1", "status": "SUCCEEDED", "modelUrl": "https://evil.test/x.glb"}"#,
        )
        .unwrap();
        assert_eq!(payload.task_id, "t1");
    }

    #[test]
    fn test_ack_serialization() {
        let ack = WebhookAck::processed("t1");
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["received"], true);
        assert_eq!(json["processed"], true);
        assert!(json.get("error").is_none());

        let ack = WebhookAck::failed("t1", "boom".to_string());
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["processed"], false);
        assert_eq!(json["error"], "boom");
    }
}
