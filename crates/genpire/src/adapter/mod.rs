//! Schema adapter: maps the logical revision fields onto the physical
//! column names of whatever table variant a deployment actually carries.
//!
//! Resolution prefers an explicit schema profile marker when one is
//! present; otherwise column names are inferred heuristically. Either
//! way the result is total — every logical field maps to some name.

pub mod mapping;
pub mod profile;

pub use mapping::{is_sql_identifier, SchemaMapping};
pub use profile::SchemaProfile;

/// Resolves a mapping for a table.
///
/// An explicit profile marker wins outright; heuristic inference over the
/// observed column list is the fallback. With neither, the canonical
/// defaults apply.
pub fn resolve(marker: Option<&str>, columns: &[String]) -> SchemaMapping {
    if let Some(profile) = marker.and_then(SchemaProfile::parse) {
        return profile.mapping();
    }
    SchemaMapping::infer(columns)
}
