//! Credit balance accounting.

pub mod ledger;

pub use ledger::{debit, BalanceDebit, DebitOutcome, LedgerError};
