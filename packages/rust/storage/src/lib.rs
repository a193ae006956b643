//! libSQL storage layer for the docset search index (`docSet.dsidx`).
//!
//! The [`SearchIndex`] struct wraps a local libSQL database holding the
//! single `searchIndex` table that Dash and Zeal query.
//!
//! **Access rules:**
//! - Builder: read-write, always from a fresh file, via [`SearchIndex::create`]
//! - Verification and tests: read-only via [`SearchIndex::open_readonly`]

mod schema;

use std::path::Path;

use libsql::{Connection, Database, params};
use threejs_docset_shared::{DocsetError, EntryType, IndexEntry, Result};

/// Handle to a docset search index.
pub struct SearchIndex {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
    readonly: bool,
}

impl SearchIndex {
    /// Create a fresh index at `path`, replacing any existing file.
    pub async fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocsetError::io(parent, e))?;
        }
        if path.exists() {
            std::fs::remove_file(path).map_err(|e| DocsetError::io(path, e))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        let index = Self {
            db,
            conn,
            readonly: false,
        };
        index.apply_schema().await?;
        Ok(index)
    }

    /// Open an existing index without write access.
    pub async fn open_readonly(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DocsetError::Storage(format!(
                "no search index at {}",
                path.display()
            )));
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        Ok(Self {
            db,
            conn,
            readonly: true,
        })
    }

    /// Create the `searchIndex` table and its uniqueness constraint.
    async fn apply_schema(&self) -> Result<()> {
        for step in schema::all_steps() {
            tracing::debug!(description = step.description, "applying schema step");
            self.conn.execute_batch(step.sql).await.map_err(|e| {
                DocsetError::Storage(format!("schema step '{}' failed: {e}", step.description))
            })?;
        }
        Ok(())
    }

    /// Ensure we're in read-write mode before writing.
    fn check_writable(&self) -> Result<()> {
        if self.readonly {
            return Err(DocsetError::Storage(
                "search index is opened in read-only mode".into(),
            ));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a batch of entries in one transaction.
    ///
    /// A duplicate (name, type, path) triple fails the whole batch; nothing
    /// from it is kept.
    pub async fn insert_batch(&self, entries: &[IndexEntry]) -> Result<usize> {
        self.check_writable()?;

        let tx = self
            .conn
            .transaction()
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        for entry in entries {
            tx.execute(
                "INSERT INTO searchIndex (name, type, path) VALUES (?1, ?2, ?3)",
                params![
                    entry.name.as_str(),
                    entry.entry_type.as_str(),
                    entry.path.as_str()
                ],
            )
            .await
            .map_err(|e| {
                DocsetError::Storage(format!(
                    "insert ({}, {}, {}) failed: {e}",
                    entry.name, entry.entry_type, entry.path
                ))
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        tracing::debug!(rows = entries.len(), "inserted index batch");
        Ok(entries.len())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Total number of rows.
    pub async fn count(&self) -> Result<u64> {
        self.count_where("SELECT COUNT(*) FROM searchIndex", None).await
    }

    /// Number of rows of one entry type.
    pub async fn count_by_type(&self, entry_type: EntryType) -> Result<u64> {
        self.count_where(
            "SELECT COUNT(*) FROM searchIndex WHERE type = ?1",
            Some(entry_type.as_str()),
        )
        .await
    }

    async fn count_where(&self, sql: &str, arg: Option<&str>) -> Result<u64> {
        let mut rows = match arg {
            Some(value) => self.conn.query(sql, params![value]).await,
            None => self.conn.query(sql, params![]).await,
        }
        .map_err(|e| DocsetError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let n = row
                    .get::<i64>(0)
                    .map_err(|e| DocsetError::Storage(e.to_string()))?;
                Ok(n as u64)
            }
            Ok(None) => Ok(0),
            Err(e) => Err(DocsetError::Storage(e.to_string())),
        }
    }

    /// All rows in insertion order.
    pub async fn entries(&self) -> Result<Vec<IndexEntry>> {
        let mut rows = self
            .conn
            .query(
                "SELECT name, type, path FROM searchIndex ORDER BY id",
                params![],
            )
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?
        {
            results.push(row_to_entry(&row)?);
        }
        Ok(results)
    }
}

/// Convert a database row to an [`IndexEntry`].
fn row_to_entry(row: &libsql::Row) -> Result<IndexEntry> {
    let entry_type: String = row
        .get(1)
        .map_err(|e| DocsetError::Storage(e.to_string()))?;
    Ok(IndexEntry {
        name: row
            .get::<String>(0)
            .map_err(|e| DocsetError::Storage(e.to_string()))?,
        entry_type: entry_type.parse()?,
        path: row
            .get::<String>(2)
            .map_err(|e| DocsetError::Storage(e.to_string()))?,
    })
}
