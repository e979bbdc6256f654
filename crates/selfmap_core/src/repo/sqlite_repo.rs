//! SQLite-backed board repository.
//!
//! # Responsibility
//! - Own the explicitly opened connection used for board persistence.
//! - Verify the board tables exist before accepting work.
//!
//! The per-aggregate contracts are implemented next to their traits in
//! `evidence_repo`, `trait_repo` and `link_repo`.

use super::{RepoError, RepoResult};
use rusqlite::Connection;

const REQUIRED_TABLES: [&str; 3] = ["evidence", "traits", "trait_evidence"];

/// Board repository over one migrated SQLite connection.
pub struct SqliteBoardRepository {
    pub(crate) conn: Connection,
}

impl SqliteBoardRepository {
    /// Wraps a migrated connection, rejecting one without the board tables.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        for table in REQUIRED_TABLES {
            if !table_exists(&conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }

    /// Borrow of the underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
