//! Entity snapshot repository — the denormalized "current state" mirror
//! kept for consumers that never want history.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

/// A denormalized snapshot row, one per entity.
#[derive(Debug, Clone)]
pub struct SnapshotRow {
    pub entity_id: String,
    pub name: Option<String>,
    pub category: Option<String>,
    pub latest_artifact_url: Option<String>,
    pub updated_at: String,
}

impl SnapshotRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            entity_id: row.get("entity_id")?,
            name: row.get("name")?,
            category: row.get("category")?,
            latest_artifact_url: row.get("latest_artifact_url")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// Upserts the snapshot for an entity. NULL inputs keep whatever value the
/// existing row already carries.
pub fn upsert(db: &Database, snapshot: &SnapshotRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO entity_snapshots (entity_id, name, category, latest_artifact_url, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(entity_id) DO UPDATE SET
                 name = COALESCE(excluded.name, entity_snapshots.name),
                 category = COALESCE(excluded.category, entity_snapshots.category),
                 latest_artifact_url = COALESCE(excluded.latest_artifact_url, entity_snapshots.latest_artifact_url),
                 updated_at = excluded.updated_at",
            params![
                snapshot.entity_id,
                snapshot.name,
                snapshot.category,
                snapshot.latest_artifact_url,
                snapshot.updated_at,
            ],
        )?;
        Ok(())
    })
}

/// Finds the snapshot for an entity.
pub fn find(db: &Database, entity_id: &str) -> Result<Option<SnapshotRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM entity_snapshots WHERE entity_id = ?1")?;
        let mut rows = stmt.query_map(params![entity_id], SnapshotRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    #[test]
    fn test_upsert_inserts_then_updates() {
        let db = test_db();
        upsert(
            &db,
            &SnapshotRow {
                entity_id: "p1".to_string(),
                name: Some("Canvas Tote".to_string()),
                category: Some("bags".to_string()),
                latest_artifact_url: Some("https://cdn.test/v1.png".to_string()),
                updated_at: "2026-01-01T00:00:00Z".to_string(),
            },
        )
        .unwrap();

        upsert(
            &db,
            &SnapshotRow {
                entity_id: "p1".to_string(),
                name: None,
                category: None,
                latest_artifact_url: Some("https://cdn.test/v2.png".to_string()),
                updated_at: "2026-01-02T00:00:00Z".to_string(),
            },
        )
        .unwrap();

        let row = find(&db, "p1").unwrap().unwrap();
        // Earlier values survive NULL updates; the URL moves forward.
        assert_eq!(row.name.as_deref(), Some("Canvas Tote"));
        assert_eq!(row.category.as_deref(), Some("bags"));
        assert_eq!(row.latest_artifact_url.as_deref(), Some("https://cdn.test/v2.png"));
        assert_eq!(row.updated_at, "2026-01-02T00:00:00Z");
    }

    #[test]
    fn test_find_missing() {
        let db = test_db();
        assert!(find(&db, "nope").unwrap().is_none());
    }
}
