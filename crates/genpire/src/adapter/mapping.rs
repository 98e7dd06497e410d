//! Logical-field to physical-column resolution.

/// Resolved physical column name for each logical revision field.
///
/// Never partially resolved: construction always fills every field,
/// falling back to the canonical default name when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMapping {
    pub entity_id: String,
    pub owner_id: String,
    pub revision_number: String,
    pub slot: String,
    pub artifact_url: String,
    pub thumbnail_url: String,
    pub prompt: String,
    pub edit_type: String,
    pub is_active: String,
    pub created_at: String,
}

/// One resolution rule: substring pair, then exact fallbacks, then default.
struct FieldRule {
    primary: &'static [&'static str],
    qualifier: &'static str,
    exact: &'static [&'static str],
    default: &'static str,
}

impl FieldRule {
    /// Picks the first column satisfying the rule, in column order.
    /// Order of attempts: substring pair, exact fallback, default.
    fn resolve(&self, columns: &[String]) -> String {
        for col in columns {
            let lower = col.to_lowercase();
            if self.primary.iter().any(|p| lower.contains(p)) && lower.contains(self.qualifier) {
                return col.clone();
            }
        }
        for col in columns {
            let lower = col.to_lowercase();
            if self.exact.iter().any(|e| lower == *e) {
                return col.clone();
            }
        }
        self.default.to_string()
    }
}

const ENTITY_ID: FieldRule = FieldRule {
    primary: &["product", "entity"],
    qualifier: "id",
    exact: &["product", "pid"],
    default: "entity_id",
};

const OWNER_ID: FieldRule = FieldRule {
    primary: &["user", "owner"],
    qualifier: "id",
    exact: &["uid"],
    default: "owner_id",
};

const REVISION_NUMBER: FieldRule = FieldRule {
    primary: &["revision", "version"],
    qualifier: "num",
    exact: &["revision", "version", "rev"],
    default: "revision_number",
};

const SLOT: FieldRule = FieldRule {
    primary: &["view", "slot"],
    qualifier: "type",
    exact: &["view", "slot", "side"],
    default: "slot",
};

const ARTIFACT_URL: FieldRule = FieldRule {
    primary: &["image", "artifact"],
    qualifier: "url",
    exact: &["url", "image"],
    default: "artifact_url",
};

const THUMBNAIL_URL: FieldRule = FieldRule {
    primary: &["thumb"],
    qualifier: "url",
    exact: &["thumbnail", "thumb", "preview"],
    default: "thumbnail_url",
};

const PROMPT: FieldRule = FieldRule {
    primary: &["edit", "prompt"],
    qualifier: "prompt",
    exact: &["prompt", "instruction"],
    default: "prompt",
};

const EDIT_TYPE: FieldRule = FieldRule {
    primary: &["edit"],
    qualifier: "type",
    exact: &["kind"],
    default: "edit_type",
};

const IS_ACTIVE: FieldRule = FieldRule {
    primary: &["is"],
    qualifier: "active",
    exact: &["active", "current"],
    default: "is_active",
};

const CREATED_AT: FieldRule = FieldRule {
    primary: &["created"],
    qualifier: "at",
    exact: &["created", "timestamp"],
    default: "created_at",
};

impl SchemaMapping {
    /// Infers a mapping from an observed physical column list.
    ///
    /// Deterministic for a given list, and total: an empty list yields
    /// the canonical defaults for every field.
    pub fn infer(columns: &[String]) -> Self {
        Self {
            entity_id: ENTITY_ID.resolve(columns),
            owner_id: OWNER_ID.resolve(columns),
            revision_number: REVISION_NUMBER.resolve(columns),
            slot: SLOT.resolve(columns),
            artifact_url: ARTIFACT_URL.resolve(columns),
            thumbnail_url: THUMBNAIL_URL.resolve(columns),
            prompt: PROMPT.resolve(columns),
            edit_type: EDIT_TYPE.resolve(columns),
            is_active: IS_ACTIVE.resolve(columns),
            created_at: CREATED_AT.resolve(columns),
        }
    }

    /// All resolved column names, for identifier validation.
    pub fn column_names(&self) -> [&str; 10] {
        [
            &self.entity_id,
            &self.owner_id,
            &self.revision_number,
            &self.slot,
            &self.artifact_url,
            &self.thumbnail_url,
            &self.prompt,
            &self.edit_type,
            &self.is_active,
            &self.created_at,
        ]
    }

    /// Returns the first resolved name that is not a bare SQL identifier,
    /// if any. Names are interpolated into SQL, so anything else is refused
    /// upstream of the storage layer.
    pub fn first_invalid_column(&self) -> Option<&str> {
        self.column_names()
            .into_iter()
            .find(|name| !is_sql_identifier(name))
    }
}

/// Bare identifier check: ASCII alphanumerics and underscores, starting
/// with a letter or underscore.
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
