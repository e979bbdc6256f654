//! Trait/evidence link repository contract and SQLite implementation.
//!
//! # Invariants
//! - Links are keyed by `(trait_id, evidence_id)`.
//! - One evidence item links to at most one trait (unique index).
//! - Attaching an existing pair is a no-op; detaching a missing pair too.

use super::evidence_repo::EvidenceRow;
use super::sqlite_repo::SqliteBoardRepository;
use super::RepoResult;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};

/// One link row joined to its evidence row.
///
/// `evidence` is `None` for orphaned links whose evidence row is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRow {
    pub trait_id: String,
    pub evidence_id: String,
    pub evidence: Option<EvidenceRow>,
}

/// Repository interface for trait membership links.
pub trait LinkRepository {
    fn attach_evidence(&self, trait_id: &str, evidence_id: &str) -> RepoResult<()>;
    fn detach_evidence(&self, trait_id: &str, evidence_id: &str) -> RepoResult<()>;
    /// Lists links of the given traits, in link creation order.
    fn list_links(&self, trait_ids: &[String]) -> RepoResult<Vec<LinkRow>>;
}

impl LinkRepository for SqliteBoardRepository {
    fn attach_evidence(&self, trait_id: &str, evidence_id: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO trait_evidence (trait_id, evidence_id)
             VALUES (?1, ?2)
             ON CONFLICT(trait_id, evidence_id) DO NOTHING;",
            params![trait_id, evidence_id],
        )?;
        Ok(())
    }

    fn detach_evidence(&self, trait_id: &str, evidence_id: &str) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM trait_evidence
             WHERE trait_id = ?1
               AND evidence_id = ?2;",
            params![trait_id, evidence_id],
        )?;
        Ok(())
    }

    fn list_links(&self, trait_ids: &[String]) -> RepoResult<Vec<LinkRow>> {
        if trait_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; trait_ids.len()].join(", ");
        let sql = format!(
            "SELECT
                te.trait_id AS trait_id,
                te.evidence_id AS evidence_id,
                e.id AS joined_id,
                e.content AS content,
                e.date AS date
             FROM trait_evidence te
             LEFT JOIN evidence e ON e.id = te.evidence_id
             WHERE te.trait_id IN ({placeholders})
             ORDER BY te.created_at ASC, te.rowid ASC;"
        );
        let bind_values: Vec<Value> = trait_ids
            .iter()
            .map(|id| Value::Text(id.clone()))
            .collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut links = Vec::new();
        while let Some(row) = rows.next()? {
            let joined_id: Option<String> = row.get("joined_id")?;
            let evidence = match joined_id {
                Some(id) => Some(EvidenceRow {
                    id,
                    content: row.get("content")?,
                    date: row.get("date")?,
                }),
                None => None,
            };
            links.push(LinkRow {
                trait_id: row.get("trait_id")?,
                evidence_id: row.get("evidence_id")?,
                evidence,
            });
        }
        Ok(links)
    }
}
