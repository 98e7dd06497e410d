//! Multi-view edit endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::generator::{MultiViewEditRequest, MultiViewEditor};

/// Incoming edit request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditViewsRequest {
    pub entity_id: String,
    pub owner_id: String,
    /// Slot name to the prior artifact URL.
    pub views: BTreeMap<String, String>,
    pub instruction: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Uniform edit response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditViewsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    pub views: BTreeMap<String, String>,
    pub revision_ids: Vec<String>,
    /// True when some slot's revision write was dropped.
    pub partial: bool,
}

/// Runs the edit operation. Generation failure fails the request;
/// per-slot persistence failure degrades it to a partial success.
pub async fn edit_views(
    editor: &MultiViewEditor,
    request: EditViewsRequest,
) -> EditViewsResponse {
    let outcome = editor
        .edit(MultiViewEditRequest {
            entity_id: request.entity_id,
            owner_id: request.owner_id,
            views: request.views,
            instruction: request.instruction,
            display_name: request.display_name,
            category: request.category,
        })
        .await;

    match outcome {
        Ok(outcome) => EditViewsResponse {
            success: true,
            error: None,
            partial: !outcome.fully_committed(),
            batch_id: Some(outcome.batch_id),
            views: outcome.views,
            revision_ids: outcome.revision_ids,
        },
        Err(e) => EditViewsResponse {
            success: false,
            error: Some(e.to_string()),
            batch_id: None,
            views: BTreeMap::new(),
            revision_ids: Vec::new(),
            partial: false,
        },
    }
}
