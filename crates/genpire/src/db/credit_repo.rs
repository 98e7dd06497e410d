//! Credit balance repository — rows for the `credit_balances` table.
//!
//! Debit ordering and expiry semantics live in `credits::ledger`; this
//! module only moves rows.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

pub const PLAN_SUBSCRIPTION: &str = "subscription";
pub const PLAN_ONE_TIME: &str = "one_time";

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_EXPIRED: &str = "expired";

/// A raw credit balance row.
#[derive(Debug, Clone)]
pub struct CreditBalanceRow {
    pub id: String,
    pub user_id: String,
    pub plan_type: String,
    pub remaining: i64,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl CreditBalanceRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            plan_type: row.get("plan_type")?,
            remaining: row.get("remaining")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// Inserts a balance row.
pub fn insert(db: &Database, row: &CreditBalanceRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO credit_balances (id, user_id, plan_type, remaining, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row.id,
                row.user_id,
                row.plan_type,
                row.remaining,
                row.status,
                row.created_at,
                row.updated_at,
            ],
        )?;
        Ok(())
    })
}

/// Finds a balance by ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<CreditBalanceRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM credit_balances WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], CreditBalanceRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Active balances for a user in debit priority order: subscription plans
/// before one-time plans, oldest first within a plan type.
pub fn list_active_for_user(
    db: &Database,
    user_id: &str,
) -> Result<Vec<CreditBalanceRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM credit_balances
             WHERE user_id = ?1 AND status = 'active'
             ORDER BY CASE plan_type WHEN 'subscription' THEN 0 ELSE 1 END,
                      created_at ASC, id ASC",
        )?;
        let rows = stmt
            .query_map(params![user_id], CreditBalanceRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    pub(crate) fn sample_balance(
        id: &str,
        user: &str,
        plan: &str,
        remaining: i64,
        created: &str,
    ) -> CreditBalanceRow {
        CreditBalanceRow {
            id: id.to_string(),
            user_id: user.to_string(),
            plan_type: plan.to_string(),
            remaining,
            status: STATUS_ACTIVE.to_string(),
            created_at: created.to_string(),
            updated_at: created.to_string(),
        }
    }

    #[test]
    fn test_priority_order() {
        let db = test_db();
        insert(&db, &sample_balance("b1", "u1", PLAN_ONE_TIME, 5, "2026-01-01T00:00:00Z")).unwrap();
        insert(&db, &sample_balance("b2", "u1", PLAN_SUBSCRIPTION, 5, "2026-01-03T00:00:00Z"))
            .unwrap();
        insert(&db, &sample_balance("b3", "u1", PLAN_SUBSCRIPTION, 5, "2026-01-02T00:00:00Z"))
            .unwrap();

        let rows = list_active_for_user(&db, "u1").unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        // Subscriptions first (older before newer), then one-time.
        assert_eq!(ids, vec!["b3", "b2", "b1"]);
    }

    #[test]
    fn test_expired_balances_excluded() {
        let db = test_db();
        let mut expired = sample_balance("b1", "u1", PLAN_ONE_TIME, 0, "2026-01-01T00:00:00Z");
        expired.status = STATUS_EXPIRED.to_string();
        insert(&db, &expired).unwrap();
        insert(&db, &sample_balance("b2", "u1", PLAN_ONE_TIME, 3, "2026-01-02T00:00:00Z")).unwrap();

        let rows = list_active_for_user(&db, "u1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "b2");
    }

    #[test]
    fn test_find_by_id() {
        let db = test_db();
        insert(&db, &sample_balance("b1", "u1", PLAN_SUBSCRIPTION, 10, "2026-01-01T00:00:00Z"))
            .unwrap();
        assert!(find_by_id(&db, "b1").unwrap().is_some());
        assert!(find_by_id(&db, "missing").unwrap().is_none());
    }
}
