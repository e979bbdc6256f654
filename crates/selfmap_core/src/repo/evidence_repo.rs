//! Evidence repository contract and SQLite implementation.
//!
//! # Invariants
//! - `upsert_evidence` is a single atomic statement; repeating it converges.
//! - Deleting evidence cascades to its link row at the storage layer.

use super::sqlite_repo::SqliteBoardRepository;
use super::{RepoError, RepoResult};
use crate::model::evidence::{EvidenceItem, EvidencePatch};
use rusqlite::{params, Row};

/// Raw evidence row as fetched for the bulk loader.
///
/// Text columns are optional so rows written by other clients with missing
/// fields can be skipped instead of failing the whole load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceRow {
    pub id: String,
    pub content: Option<String>,
    pub date: Option<String>,
}

impl EvidenceRow {
    /// Converts to a board item, or `None` when required fields are missing.
    pub fn into_item(self) -> Option<EvidenceItem> {
        let content = self.content.filter(|value| !value.trim().is_empty())?;
        let date = self.date?;
        if self.id.trim().is_empty() {
            return None;
        }
        Some(EvidenceItem {
            id: self.id,
            content,
            date,
        })
    }
}

/// Repository interface for evidence persistence.
pub trait EvidenceRepository {
    /// Inserts the item, or updates content/date when the id already exists.
    fn upsert_evidence(&self, item: &EvidenceItem) -> RepoResult<()>;
    /// Applies a partial update to an existing item.
    fn update_evidence(&self, id: &str, patch: &EvidencePatch) -> RepoResult<()>;
    fn delete_evidence(&self, id: &str) -> RepoResult<()>;
    /// Lists all evidence rows in creation order.
    fn list_evidence(&self) -> RepoResult<Vec<EvidenceRow>>;
}

impl EvidenceRepository for SqliteBoardRepository {
    fn upsert_evidence(&self, item: &EvidenceItem) -> RepoResult<()> {
        item.validate()?;

        self.conn.execute(
            "INSERT INTO evidence (id, content, date)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                content = excluded.content,
                date = excluded.date;",
            params![item.id.as_str(), item.content.as_str(), item.date.as_str()],
        )?;

        Ok(())
    }

    fn update_evidence(&self, id: &str, patch: &EvidencePatch) -> RepoResult<()> {
        if patch
            .content
            .as_deref()
            .is_some_and(|content| content.trim().is_empty())
        {
            return Err(RepoError::Validation(
                crate::model::ValidationError::BlankContent,
            ));
        }

        let changed = self.conn.execute(
            "UPDATE evidence
             SET
                content = COALESCE(?2, content),
                date = COALESCE(?3, date)
             WHERE id = ?1;",
            params![id, patch.content.as_deref(), patch.date.as_deref()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "evidence",
                id: id.to_string(),
            });
        }

        Ok(())
    }

    fn delete_evidence(&self, id: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM evidence WHERE id = ?1;", [id])?;
        Ok(())
    }

    fn list_evidence(&self) -> RepoResult<Vec<EvidenceRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, content, date
             FROM evidence
             ORDER BY created_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_evidence_row(row)?);
        }
        Ok(items)
    }
}

fn parse_evidence_row(row: &Row<'_>) -> RepoResult<EvidenceRow> {
    Ok(EvidenceRow {
        id: row.get("id")?,
        content: row.get("content")?,
        date: row.get("date")?,
    })
}
