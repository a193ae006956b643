//! SQL schema for the docset search index.
//!
//! Docset browsers read exactly this table layout, so there is no version
//! tracking table: the index is always created from scratch.

/// A schema step with a description for logging.
pub(crate) struct SchemaStep {
    pub description: &'static str,
    pub sql: &'static str,
}

/// All schema steps, applied in order on a fresh database.
pub(crate) fn all_steps() -> Vec<SchemaStep> {
    vec![
        SchemaStep {
            description: "searchIndex table",
            sql: r#"
CREATE TABLE searchIndex(
    id   INTEGER PRIMARY KEY,
    name TEXT,
    type TEXT,
    path TEXT
);
"#,
        },
        SchemaStep {
            description: "uniqueness over (name, type, path)",
            sql: r#"
CREATE UNIQUE INDEX anchor ON searchIndex (name, type, path);
"#,
        },
    ]
}
