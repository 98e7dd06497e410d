//! Batch reconstruction from flat revision rows.

use std::collections::HashMap;

use crate::db::revision_repo::RevisionRow;

use super::types::{Batch, RevisionSummary};

/// Synthetic batch key for a revision stored without one.
fn singleton_key(revision_id: &str) -> String {
    format!("single-{}", revision_id)
}

/// Groups rows (expected newest-first) into batches.
///
/// Every row lands in exactly one batch. First-seen member order doubles
/// as the output order, which keeps batches sorted by representative
/// creation time descending. Within a batch, the first row seen for a
/// slot wins; later rows for the same slot only contribute to the
/// batch's active flag.
pub fn group(rows: &[RevisionRow]) -> Vec<Batch> {
    let mut batches: Vec<Batch> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let key = row
            .batch_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| singleton_key(&row.id));

        let summary = RevisionSummary {
            id: row.id.clone(),
            revision_number: row.revision_number,
            artifact_url: row.artifact_url.clone(),
            thumbnail_url: row.thumbnail_url.clone(),
            is_active: row.is_active,
        };

        match index.get(&key) {
            Some(&i) => {
                let batch = &mut batches[i];
                batch.is_active |= row.is_active;
                batch.views.entry(row.slot.clone()).or_insert(summary);
            }
            None => {
                index.insert(key.clone(), batches.len());
                let mut batch = Batch {
                    batch_id: key,
                    revision_number: row.revision_number,
                    prompt: row.prompt.clone(),
                    edit_type: row.edit_type.clone(),
                    created_at: row.created_at.clone(),
                    is_active: row.is_active,
                    views: Default::default(),
                };
                batch.views.insert(row.slot.clone(), summary);
                batches.push(batch);
            }
        }
    }

    batches
}
