//! Prioritized credit debiting.
//!
//! Consumption order: subscription balances before one-time balances,
//! oldest balance first within a plan type. A debit is all-or-nothing —
//! when the summed available balance is short, nothing is touched.

use chrono::Utc;
use rusqlite::params;
use thiserror::Error;

use crate::db::credit_repo::{CreditBalanceRow, PLAN_ONE_TIME};
use crate::db::{Database, DatabaseError};

/// Errors from ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Debit amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// One balance touched by a debit.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceDebit {
    pub balance_id: String,
    pub amount: i64,
    /// True when this consumption emptied a one-time balance.
    pub expired: bool,
}

/// Result of a debit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum DebitOutcome {
    Debited { consumed: Vec<BalanceDebit> },
    InsufficientCredits { available: i64, required: i64 },
}

/// Debits `amount` credits from the user's balances in priority order,
/// inside one transaction.
pub fn debit(db: &Database, user_id: &str, amount: i64) -> Result<DebitOutcome, LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidAmount(amount));
    }

    let now = Utc::now().to_rfc3339();

    let outcome = db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;

        let balances: Vec<CreditBalanceRow> = {
            let mut stmt = tx.prepare(
                "SELECT * FROM credit_balances
                 WHERE user_id = ?1 AND status = 'active'
                 ORDER BY CASE plan_type WHEN 'subscription' THEN 0 ELSE 1 END,
                          created_at ASC, id ASC",
            )?;
            let rows = stmt
                .query_map(params![user_id], |row| {
                    Ok(CreditBalanceRow {
                        id: row.get("id")?,
                        user_id: row.get("user_id")?,
                        plan_type: row.get("plan_type")?,
                        remaining: row.get("remaining")?,
                        status: row.get("status")?,
                        created_at: row.get("created_at")?,
                        updated_at: row.get("updated_at")?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let available: i64 = balances.iter().map(|b| b.remaining.max(0)).sum();
        if available < amount {
            // Short balance: leave every row untouched.
            return Ok(DebitOutcome::InsufficientCredits {
                available,
                required: amount,
            });
        }

        let mut still_needed = amount;
        let mut consumed = Vec::new();

        for balance in balances {
            if still_needed == 0 {
                break;
            }
            let take = balance.remaining.max(0).min(still_needed);
            if take == 0 {
                continue;
            }

            let new_remaining = balance.remaining - take;
            let expire = new_remaining == 0 && balance.plan_type == PLAN_ONE_TIME;

            tx.execute(
                "UPDATE credit_balances SET remaining = ?2, status = ?3, updated_at = ?4
                 WHERE id = ?1",
                params![
                    balance.id,
                    new_remaining,
                    if expire { "expired" } else { "active" },
                    now,
                ],
            )?;

            consumed.push(BalanceDebit {
                balance_id: balance.id,
                amount: take,
                expired: expire,
            });
            still_needed -= take;
        }

        tx.commit()?;
        Ok(DebitOutcome::Debited { consumed })
    })?;

    Ok(outcome)
}
