//! Named schema profiles.
//!
//! A deployment that knows which table variant it carries records an
//! explicit marker instead of relying on column-name inference.

use super::mapping::SchemaMapping;

/// Known physical layouts of the revision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaProfile {
    /// Canonical layout created by this crate's migrations.
    Current,
    /// The original hosted-database layout (product/view naming).
    Legacy,
}

impl SchemaProfile {
    /// Parses a stored profile marker. Unknown markers resolve to `None`
    /// so callers fall back to inference.
    pub fn parse(marker: &str) -> Option<Self> {
        match marker.trim().to_lowercase().as_str() {
            "current" | "v2" => Some(SchemaProfile::Current),
            "legacy" | "v1" => Some(SchemaProfile::Legacy),
            _ => None,
        }
    }

    /// The fixed mapping for this profile.
    pub fn mapping(&self) -> SchemaMapping {
        match self {
            SchemaProfile::Current => SchemaMapping {
                entity_id: "entity_id".into(),
                owner_id: "owner_id".into(),
                revision_number: "revision_number".into(),
                slot: "slot".into(),
                artifact_url: "artifact_url".into(),
                thumbnail_url: "thumbnail_url".into(),
                prompt: "prompt".into(),
                edit_type: "edit_type".into(),
                is_active: "is_active".into(),
                created_at: "created_at".into(),
            },
            SchemaProfile::Legacy => SchemaMapping {
                entity_id: "product_id".into(),
                owner_id: "user_id".into(),
                revision_number: "revision_number".into(),
                slot: "view_type".into(),
                artifact_url: "image_url".into(),
                thumbnail_url: "thumbnail_url".into(),
                prompt: "edit_prompt".into(),
                edit_type: "edit_type".into(),
                is_active: "is_active".into(),
                created_at: "created_at".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_markers() {
        assert_eq!(SchemaProfile::parse("current"), Some(SchemaProfile::Current));
        assert_eq!(SchemaProfile::parse("V2"), Some(SchemaProfile::Current));
        assert_eq!(SchemaProfile::parse("legacy"), Some(SchemaProfile::Legacy));
        assert_eq!(SchemaProfile::parse(" v1 "), Some(SchemaProfile::Legacy));
        assert_eq!(SchemaProfile::parse("v99"), None);
        assert_eq!(SchemaProfile::parse(""), None);
    }

    #[test]
    fn test_profile_mappings_are_sql_safe() {
        for profile in [SchemaProfile::Current, SchemaProfile::Legacy] {
            assert!(profile.mapping().first_invalid_column().is_none());
        }
    }

    #[test]
    fn test_current_profile_matches_migrated_table() {
        // Columns the migrations actually create resolve identically by
        // inference and by the explicit profile.
        let columns: Vec<String> = [
            "id",
            "entity_id",
            "slot",
            "revision_number",
            "artifact_url",
            "thumbnail_url",
            "prompt",
            "metadata",
            "batch_id",
            "is_active",
            "owner_id",
            "created_at",
            "edit_type",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let inferred = SchemaMapping::infer(&columns);
        assert_eq!(inferred, SchemaProfile::Current.mapping());
    }
}
