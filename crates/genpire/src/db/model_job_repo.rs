//! Model job repository — stored 3D-generation jobs for the `model_jobs`
//! table, keyed by the provider's task id.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

/// A raw model job row.
#[derive(Debug, Clone)]
pub struct ModelJobRow {
    pub id: String,
    pub task_id: String,
    pub entity_id: Option<String>,
    pub user_id: String,
    pub status: String,
    pub model_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ModelJobRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            task_id: row.get("task_id")?,
            entity_id: row.get("entity_id")?,
            user_id: row.get("user_id")?,
            status: row.get("status")?,
            model_url: row.get("model_url")?,
            thumbnail_url: row.get("thumbnail_url")?,
            error: row.get("error")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// Inserts a new job row.
pub fn insert(db: &Database, job: &ModelJobRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO model_jobs (id, task_id, entity_id, user_id, status, model_url,
             thumbnail_url, error, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                job.id,
                job.task_id,
                job.entity_id,
                job.user_id,
                job.status,
                job.model_url,
                job.thumbnail_url,
                job.error,
                job.created_at,
                job.updated_at,
            ],
        )?;
        Ok(())
    })
}

/// Finds a job by the provider's task id.
pub fn find_by_task_id(db: &Database, task_id: &str) -> Result<Option<ModelJobRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM model_jobs WHERE task_id = ?1")?;
        let mut rows = stmt.query_map(params![task_id], ModelJobRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Marks a job succeeded with the authoritative result URLs.
pub fn mark_succeeded(
    db: &Database,
    task_id: &str,
    model_url: &str,
    thumbnail_url: Option<&str>,
    updated_at: &str,
) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE model_jobs SET status='succeeded', model_url=?2, thumbnail_url=?3,
             error=NULL, updated_at=?4 WHERE task_id=?1",
            params![task_id, model_url, thumbnail_url, updated_at],
        )?;
        Ok(())
    })
}

/// Records a non-success terminal or intermediate status.
pub fn update_status(
    db: &Database,
    task_id: &str,
    status: &str,
    error: Option<&str>,
    updated_at: &str,
) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE model_jobs SET status=?2, error=?3, updated_at=?4 WHERE task_id=?1",
            params![task_id, status, error, updated_at],
        )?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    pub(crate) fn sample_job(id: &str, task_id: &str, user: &str) -> ModelJobRow {
        ModelJobRow {
            id: id.to_string(),
            task_id: task_id.to_string(),
            entity_id: Some("p1".to_string()),
            user_id: user.to_string(),
            status: "pending".to_string(),
            model_url: None,
            thumbnail_url: None,
            error: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_insert_and_find_by_task_id() {
        let db = test_db();
        insert(&db, &sample_job("j1", "task-abc", "u1")).unwrap();

        let found = find_by_task_id(&db, "task-abc").unwrap().unwrap();
        assert_eq!(found.id, "j1");
        assert_eq!(found.status, "pending");
        assert!(find_by_task_id(&db, "task-missing").unwrap().is_none());
    }

    #[test]
    fn test_mark_succeeded() {
        let db = test_db();
        insert(&db, &sample_job("j1", "task-abc", "u1")).unwrap();

        mark_succeeded(
            &db,
            "task-abc",
            "https://cdn.test/model.glb",
            Some("https://cdn.test/model_thumb.png"),
            "2026-01-02T00:00:00Z",
        )
        .unwrap();

        let found = find_by_task_id(&db, "task-abc").unwrap().unwrap();
        assert_eq!(found.status, "succeeded");
        assert_eq!(found.model_url.as_deref(), Some("https://cdn.test/model.glb"));
        assert!(found.error.is_none());
    }

    #[test]
    fn test_update_status_failed() {
        let db = test_db();
        insert(&db, &sample_job("j1", "task-abc", "u1")).unwrap();

        update_status(&db, "task-abc", "failed", Some("mesh timeout"), "2026-01-02T00:00:00Z")
            .unwrap();

        let found = find_by_task_id(&db, "task-abc").unwrap().unwrap();
        assert_eq!(found.status, "failed");
        assert_eq!(found.error.as_deref(), Some("mesh timeout"));
    }

    #[test]
    fn test_duplicate_task_id_rejected() {
        let db = test_db();
        insert(&db, &sample_job("j1", "task-abc", "u1")).unwrap();
        assert!(insert(&db, &sample_job("j2", "task-abc", "u1")).is_err());
    }
}
