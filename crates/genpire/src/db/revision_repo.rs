//! Revision repository — versioned artifact rows for the `revisions` table.
//!
//! The write path is transactional: next-number read, deactivation of the
//! prior active row, and the insert commit or roll back together. A partial
//! unique index on `(entity_id, slot) WHERE is_active = 1` backstops the
//! at-most-one-active invariant at the storage layer.

use rusqlite::{params, Connection, Row};

use crate::adapter::{is_sql_identifier, SchemaMapping};

use super::{Database, DatabaseError};

/// A raw revision row from the database.
#[derive(Debug, Clone)]
pub struct RevisionRow {
    pub id: String,
    pub entity_id: String,
    pub slot: String,
    pub revision_number: i64,
    pub artifact_url: String,
    pub thumbnail_url: Option<String>,
    pub prompt: Option<String>,
    pub metadata: String,
    pub batch_id: Option<String>,
    pub edit_type: Option<String>,
    pub is_active: bool,
    pub owner_id: Option<String>,
    pub created_at: String,
}

impl RevisionRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            entity_id: row.get("entity_id")?,
            slot: row.get("slot")?,
            revision_number: row.get("revision_number")?,
            artifact_url: row.get("artifact_url")?,
            thumbnail_url: row.get("thumbnail_url")?,
            prompt: row.get("prompt")?,
            metadata: row.get("metadata")?,
            batch_id: row.get("batch_id")?,
            edit_type: row.get("edit_type")?,
            is_active: row.get::<_, i64>("is_active")? != 0,
            owner_id: row.get("owner_id")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Input for a new revision. The revision number is assigned inside the
/// write transaction, never by the caller.
#[derive(Debug, Clone)]
pub struct NewRevision {
    pub id: String,
    pub entity_id: String,
    pub slot: String,
    pub artifact_url: String,
    pub thumbnail_url: Option<String>,
    pub prompt: Option<String>,
    pub metadata: String,
    pub batch_id: Option<String>,
    pub edit_type: Option<String>,
    pub owner_id: Option<String>,
    pub created_at: String,
}

/// Commits a new active revision for `(entity_id, slot)`.
///
/// One transaction: reads the current max revision number, deactivates the
/// active row, inserts the new row active with `max + 1` (or 1). Returns
/// the assigned revision number.
pub fn insert_active(db: &Database, new: &NewRevision) -> Result<i64, DatabaseError> {
    db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;

        let next_number: i64 = tx.query_row(
            "SELECT COALESCE(MAX(revision_number), 0) + 1 FROM revisions
             WHERE entity_id = ?1 AND slot = ?2",
            params![new.entity_id, new.slot],
            |r| r.get(0),
        )?;

        tx.execute(
            "UPDATE revisions SET is_active = 0
             WHERE entity_id = ?1 AND slot = ?2 AND is_active = 1",
            params![new.entity_id, new.slot],
        )?;

        tx.execute(
            "INSERT INTO revisions (id, entity_id, slot, revision_number, artifact_url,
             thumbnail_url, prompt, metadata, batch_id, edit_type, is_active, owner_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1, ?11, ?12)",
            params![
                new.id,
                new.entity_id,
                new.slot,
                next_number,
                new.artifact_url,
                new.thumbnail_url,
                new.prompt,
                new.metadata,
                new.batch_id,
                new.edit_type,
                new.owner_id,
                new.created_at,
            ],
        )?;

        tx.commit()?;
        Ok(next_number)
    })
}

/// Finds a revision by its ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<RevisionRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM revisions WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], RevisionRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// The currently active revision for `(entity_id, slot)`, if any.
pub fn find_active(
    db: &Database,
    entity_id: &str,
    slot: &str,
) -> Result<Option<RevisionRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM revisions
             WHERE entity_id = ?1 AND slot = ?2 AND is_active = 1",
        )?;
        let mut rows = stmt.query_map(params![entity_id, slot], RevisionRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// All revisions for an entity, newest first. Ties on `created_at`
/// (common inside one batch) break on revision number, then id, so the
/// ordering is stable across calls.
pub fn list_for_entity(db: &Database, entity_id: &str) -> Result<Vec<RevisionRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM revisions WHERE entity_id = ?1
             ORDER BY created_at DESC, revision_number DESC, id ASC",
        )?;
        let rows = stmt
            .query_map(params![entity_id], RevisionRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Counts revisions for `(entity_id, slot)`.
pub fn count_for_slot(db: &Database, entity_id: &str, slot: &str) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM revisions WHERE entity_id = ?1 AND slot = ?2",
            params![entity_id, slot],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

// ─── Adaptive variant ───────────────────────────────────────────────────────
//
// The same logical operations against a table whose physical column names
// were resolved at runtime. Legacy tables carry no metadata/batch columns,
// so reads fill those with defaults.

fn ensure_table_and_mapping(table: &str, mapping: &SchemaMapping) -> Result<(), DatabaseError> {
    if !is_sql_identifier(table) {
        return Err(DatabaseError::InvalidColumn(table.to_string()));
    }
    if let Some(bad) = mapping.first_invalid_column() {
        return Err(DatabaseError::InvalidColumn(bad.to_string()));
    }
    Ok(())
}

/// Commits a new active revision into a variant-schema table.
pub fn insert_active_mapped(
    db: &Database,
    table: &str,
    mapping: &SchemaMapping,
    new: &NewRevision,
) -> Result<i64, DatabaseError> {
    ensure_table_and_mapping(table, mapping)?;

    let select_sql = format!(
        "SELECT COALESCE(MAX({num}), 0) + 1 FROM {table} WHERE {entity} = ?1 AND {slot} = ?2",
        num = mapping.revision_number,
        table = table,
        entity = mapping.entity_id,
        slot = mapping.slot,
    );
    let deactivate_sql = format!(
        "UPDATE {table} SET {active} = 0 WHERE {entity} = ?1 AND {slot} = ?2 AND {active} = 1",
        table = table,
        active = mapping.is_active,
        entity = mapping.entity_id,
        slot = mapping.slot,
    );
    let insert_sql = format!(
        "INSERT INTO {table} (id, {entity}, {owner}, {num}, {slot}, {url}, {thumb}, {prompt}, {etype}, {active}, {created})
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10)",
        table = table,
        entity = mapping.entity_id,
        owner = mapping.owner_id,
        num = mapping.revision_number,
        slot = mapping.slot,
        url = mapping.artifact_url,
        thumb = mapping.thumbnail_url,
        prompt = mapping.prompt,
        etype = mapping.edit_type,
        active = mapping.is_active,
        created = mapping.created_at,
    );

    db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;

        let next_number: i64 =
            tx.query_row(&select_sql, params![new.entity_id, new.slot], |r| r.get(0))?;

        tx.execute(&deactivate_sql, params![new.entity_id, new.slot])?;

        tx.execute(
            &insert_sql,
            params![
                new.id,
                new.entity_id,
                new.owner_id,
                next_number,
                new.slot,
                new.artifact_url,
                new.thumbnail_url,
                new.prompt,
                new.edit_type,
                new.created_at,
            ],
        )?;

        tx.commit()?;
        Ok(next_number)
    })
}

/// All revisions for an entity from a variant-schema table, newest first.
pub fn list_for_entity_mapped(
    db: &Database,
    table: &str,
    mapping: &SchemaMapping,
    entity_id: &str,
) -> Result<Vec<RevisionRow>, DatabaseError> {
    ensure_table_and_mapping(table, mapping)?;

    let sql = format!(
        "SELECT id, {entity}, {owner}, {num}, {slot}, {url}, {thumb}, {prompt}, {etype}, {active}, {created}
         FROM {table} WHERE {entity} = ?1 ORDER BY {created} DESC, {num} DESC, id ASC",
        table = table,
        entity = mapping.entity_id,
        owner = mapping.owner_id,
        num = mapping.revision_number,
        slot = mapping.slot,
        url = mapping.artifact_url,
        thumb = mapping.thumbnail_url,
        prompt = mapping.prompt,
        etype = mapping.edit_type,
        active = mapping.is_active,
        created = mapping.created_at,
    );

    db.with_conn(|conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![entity_id], |row| {
                Ok(RevisionRow {
                    id: row.get(0)?,
                    entity_id: row.get(1)?,
                    owner_id: row.get(2)?,
                    revision_number: row.get(3)?,
                    slot: row.get(4)?,
                    artifact_url: row.get(5)?,
                    thumbnail_url: row.get(6)?,
                    prompt: row.get(7)?,
                    edit_type: row.get(8)?,
                    is_active: row.get::<_, i64>(9)? != 0,
                    created_at: row.get(10)?,
                    metadata: "{}".to_string(),
                    batch_id: None,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}
