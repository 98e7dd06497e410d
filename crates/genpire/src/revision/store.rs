//! Revision store service: transactional write path plus history reads.

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::adapter::SchemaMapping;
use crate::db::revision_repo::{self, NewRevision, RevisionRow};
use crate::db::snapshot_repo::{self, SnapshotRow};
use crate::db::{Database, DatabaseError};

use super::grouping;
use super::types::Batch;

/// Errors from revision store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Metadata is not a JSON object")]
    MetadataShape,
}

/// Optional denormalized fields mirrored onto the entity snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotPatch {
    pub name: Option<String>,
    pub category: Option<String>,
}

/// Input for committing one generated artifact.
#[derive(Debug, Clone)]
pub struct CommitRevision {
    pub entity_id: String,
    pub slot: String,
    pub artifact_url: String,
    pub thumbnail_url: Option<String>,
    pub prompt: Option<String>,
    pub batch_id: Option<String>,
    pub edit_type: Option<String>,
    pub owner_id: Option<String>,
    /// Free-form generator metadata; must be a JSON object.
    pub metadata: serde_json::Value,
    /// Denormalized mirror fields; `None` skips the snapshot write.
    pub snapshot: Option<SnapshotPatch>,
    /// Creation timestamp override; defaults to now.
    pub created_at: Option<String>,
}

/// Identifiers assigned to a committed revision.
#[derive(Debug, Clone)]
pub struct CommittedRevision {
    pub id: String,
    pub revision_number: i64,
}

/// Service wrapper over the revision and snapshot tables.
#[derive(Clone)]
pub struct RevisionStore {
    db: Database,
}

impl RevisionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Commits a new active revision and mirrors the entity snapshot.
    ///
    /// The revision insert is the operation; the snapshot mirror is a
    /// denormalization whose failure is logged and swallowed.
    pub fn commit(&self, input: CommitRevision) -> Result<CommittedRevision, StoreError> {
        if !input.metadata.is_object() {
            return Err(StoreError::MetadataShape);
        }

        let id = Uuid::new_v4().to_string();
        let created_at = input
            .created_at
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        let new = NewRevision {
            id: id.clone(),
            entity_id: input.entity_id.clone(),
            slot: input.slot.clone(),
            artifact_url: input.artifact_url.clone(),
            thumbnail_url: input.thumbnail_url.clone(),
            prompt: input.prompt.clone(),
            metadata: input.metadata.to_string(),
            batch_id: input.batch_id.clone(),
            edit_type: input.edit_type.clone(),
            owner_id: input.owner_id.clone(),
            created_at: created_at.clone(),
        };

        let revision_number = revision_repo::insert_active(&self.db, &new)?;

        if let Some(patch) = &input.snapshot {
            let snapshot = SnapshotRow {
                entity_id: input.entity_id.clone(),
                name: patch.name.clone(),
                category: patch.category.clone(),
                latest_artifact_url: Some(input.artifact_url.clone()),
                updated_at: created_at,
            };
            if let Err(e) = snapshot_repo::upsert(&self.db, &snapshot) {
                log::warn!(
                    "Snapshot mirror failed for entity {}: {}",
                    input.entity_id,
                    e
                );
            }
        }

        Ok(CommittedRevision {
            id,
            revision_number,
        })
    }

    /// Commits into a variant-schema table resolved through `mapping`.
    /// Legacy tables carry no metadata or batch columns, and the snapshot
    /// mirror does not apply to them.
    pub fn commit_mapped(
        &self,
        table: &str,
        mapping: &SchemaMapping,
        input: CommitRevision,
    ) -> Result<CommittedRevision, StoreError> {
        let id = Uuid::new_v4().to_string();
        let created_at = input
            .created_at
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        let new = NewRevision {
            id: id.clone(),
            entity_id: input.entity_id,
            slot: input.slot,
            artifact_url: input.artifact_url,
            thumbnail_url: input.thumbnail_url,
            prompt: input.prompt,
            metadata: "{}".to_string(),
            batch_id: None,
            edit_type: input.edit_type,
            owner_id: input.owner_id,
            created_at,
        };

        let revision_number = revision_repo::insert_active_mapped(&self.db, table, mapping, &new)?;

        Ok(CommittedRevision {
            id,
            revision_number,
        })
    }

    /// Batch-grouped history for an entity, newest first.
    pub fn history(&self, entity_id: &str) -> Result<Vec<Batch>, StoreError> {
        let rows = revision_repo::list_for_entity(&self.db, entity_id)?;
        Ok(grouping::group(&rows))
    }

    /// The active revision for one slot, if any.
    pub fn active(&self, entity_id: &str, slot: &str) -> Result<Option<RevisionRow>, StoreError> {
        Ok(revision_repo::find_active(&self.db, entity_id, slot)?)
    }
}
