//! Revision store: the durable, versioned history of generated artifacts.
//!
//! Write path commits one new active revision per (entity, slot) inside a
//! transaction and mirrors the "current state" snapshot best-effort. Read
//! path reconstructs batch-oriented history from the flat rows.

pub mod grouping;
pub mod store;
pub mod types;

pub use store::{CommitRevision, CommittedRevision, RevisionStore, SnapshotPatch, StoreError};
pub use types::{Batch, RevisionSummary};
