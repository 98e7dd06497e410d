//! Read-model types for revision history.

use std::collections::BTreeMap;

use serde::Serialize;

/// One revision as it appears inside a batch's `views` map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevisionSummary {
    pub id: String,
    pub revision_number: i64,
    pub artifact_url: String,
    pub thumbnail_url: Option<String>,
    pub is_active: bool,
}

/// A reconstructed generation batch.
///
/// Not persisted — derived by grouping an entity's revisions by batch id.
/// Representative fields come from the first-seen (newest) member row.
/// `views` is ordered by slot name so serialization is stable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Batch {
    pub batch_id: String,
    pub revision_number: i64,
    pub prompt: Option<String>,
    pub edit_type: Option<String>,
    pub created_at: String,
    pub is_active: bool,
    pub views: BTreeMap<String, RevisionSummary>,
}
