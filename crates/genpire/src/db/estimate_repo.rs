//! Cost estimate repository — persisted AI estimates for the
//! `cost_estimates` table, with bounded retention per entity.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

/// How many stored estimates survive per entity.
pub const RETAIN_PER_ENTITY: u64 = 5;

/// A stored cost estimate row.
#[derive(Debug, Clone)]
pub struct EstimateRow {
    pub id: String,
    pub entity_id: String,
    pub fingerprint: String,
    /// JSON payload of the estimate content.
    pub estimate: String,
    pub model: Option<String>,
    pub created_at: String,
}

impl EstimateRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            entity_id: row.get("entity_id")?,
            fingerprint: row.get("fingerprint")?,
            estimate: row.get("estimate")?,
            model: row.get("model")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Inserts a new estimate row.
pub fn insert(db: &Database, row: &EstimateRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO cost_estimates (id, entity_id, fingerprint, estimate, model, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                row.id,
                row.entity_id,
                row.fingerprint,
                row.estimate,
                row.model,
                row.created_at,
            ],
        )?;
        Ok(())
    })
}

/// The most recent estimate for `(entity_id, fingerprint)`, if any.
pub fn find_latest(
    db: &Database,
    entity_id: &str,
    fingerprint: &str,
) -> Result<Option<EstimateRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM cost_estimates
             WHERE entity_id = ?1 AND fingerprint = ?2
             ORDER BY created_at DESC, id DESC LIMIT 1",
        )?;
        let mut rows = stmt.query_map(params![entity_id, fingerprint], EstimateRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// All stored estimates for an entity, newest first.
pub fn list_for_entity(db: &Database, entity_id: &str) -> Result<Vec<EstimateRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM cost_estimates WHERE entity_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt
            .query_map(params![entity_id], EstimateRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Deletes everything but the newest `RETAIN_PER_ENTITY` rows for an entity.
/// Returns the number of pruned rows.
pub fn prune(db: &Database, entity_id: &str) -> Result<usize, DatabaseError> {
    db.with_conn(|conn| {
        let pruned = conn.execute(
            "DELETE FROM cost_estimates WHERE entity_id = ?1 AND id NOT IN (
                 SELECT id FROM cost_estimates WHERE entity_id = ?1
                 ORDER BY created_at DESC, id DESC LIMIT ?2
             )",
            params![entity_id, RETAIN_PER_ENTITY],
        )?;
        Ok(pruned)
    })
}
