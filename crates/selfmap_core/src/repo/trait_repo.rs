//! Trait repository contract and SQLite implementation.
//!
//! # Invariants
//! - `delete_trait` removes link rows and the trait row in one transaction;
//!   the evidence rows themselves are never touched.

use super::sqlite_repo::SqliteBoardRepository;
use super::{RepoError, RepoResult};
use crate::model::traits::{TraitPatch, TraitRecord};
use rusqlite::params;

/// Raw trait row as fetched for the bulk loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitRow {
    pub id: String,
    pub name: Option<String>,
}

/// Repository interface for trait persistence.
pub trait TraitRepository {
    /// Inserts the trait, or renames it when the id already exists.
    fn upsert_trait(&self, record: &TraitRecord) -> RepoResult<()>;
    fn update_trait(&self, id: &str, patch: &TraitPatch) -> RepoResult<()>;
    fn delete_trait(&self, id: &str) -> RepoResult<()>;
    /// Lists all trait rows in creation order.
    fn list_traits(&self) -> RepoResult<Vec<TraitRow>>;
}

impl TraitRepository for SqliteBoardRepository {
    fn upsert_trait(&self, record: &TraitRecord) -> RepoResult<()> {
        record.validate()?;

        self.conn.execute(
            "INSERT INTO traits (id, name)
             VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name;",
            params![record.id.as_str(), record.name.as_str()],
        )?;

        Ok(())
    }

    fn update_trait(&self, id: &str, patch: &TraitPatch) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE traits SET name = COALESCE(?2, name) WHERE id = ?1;",
            params![id, patch.name.as_deref()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "trait",
                id: id.to_string(),
            });
        }

        Ok(())
    }

    fn delete_trait(&self, id: &str) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM trait_evidence WHERE trait_id = ?1;", [id])?;
        tx.execute("DELETE FROM traits WHERE id = ?1;", [id])?;
        tx.commit()?;
        Ok(())
    }

    fn list_traits(&self) -> RepoResult<Vec<TraitRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name
             FROM traits
             ORDER BY created_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut traits = Vec::new();
        while let Some(row) = rows.next()? {
            traits.push(TraitRow {
                id: row.get("id")?,
                name: row.get("name")?,
            });
        }
        Ok(traits)
    }
}
