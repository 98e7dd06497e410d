//! Revision history endpoint.

use serde::Serialize;

use crate::revision::{Batch, RevisionStore};

/// Uniform history response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub batches: Vec<Batch>,
}

/// Returns batch-grouped revision history for an entity, newest first.
pub fn revision_history(store: &RevisionStore, entity_id: &str) -> HistoryResponse {
    match store.history(entity_id) {
        Ok(batches) => HistoryResponse {
            success: true,
            error: None,
            batches,
        },
        Err(e) => HistoryResponse {
            success: false,
            error: Some(e.to_string()),
            batches: Vec::new(),
        },
    }
}
