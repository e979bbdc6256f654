//! Repository layer: the persistence half of the sync layer.
//!
//! # Responsibility
//! - Define one data access contract per aggregate (evidence, traits, links).
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Creates are atomic upserts keyed by id, safe to repeat.
//! - Updates take an id plus a partial field set and report `NotFound`.
//! - Deletes and link detaches are idempotent.

pub mod evidence_repo;
pub mod link_repo;
pub mod sqlite_repo;
pub mod trait_repo;

use crate::db::DbError;
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use evidence_repo::{EvidenceRepository, EvidenceRow};
pub use link_repo::{LinkRepository, LinkRow};
pub use sqlite_repo::SqliteBoardRepository;
pub use trait_repo::{TraitRepository, TraitRow};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for board persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// Entity targeted by an update does not exist.
    NotFound { entity: &'static str, id: String },
    MissingRequiredTable(&'static str),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::MissingRequiredTable(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Full backend contract consumed by the sync worker and the bulk loader.
pub trait BoardRepository: EvidenceRepository + TraitRepository + LinkRepository {}

impl<T> BoardRepository for T where T: EvidenceRepository + TraitRepository + LinkRepository {}
