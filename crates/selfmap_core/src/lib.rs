//! Core domain logic for selfmap.
//! This crate is the single source of truth for board invariants.

pub mod board;
pub mod config;
pub mod db;
pub mod drag;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use board::{BoardError, BoardMutation, BoardSnapshot, EvidenceLocation, MutationKind};
pub use config::{BoardConfig, ConfigError, LogLevel};
pub use drag::{DragController, DragOutcome, DragState, DropTarget};
pub use logging::{init_logging, logging_status, LoggingError};
pub use model::evidence::{EvidenceId, EvidenceItem, EvidencePatch};
pub use model::traits::{Trait, TraitId, TraitPatch, TraitRecord};
pub use repo::{
    BoardRepository, EvidenceRepository, LinkRepository, RepoError, RepoResult,
    SqliteBoardRepository, TraitRepository,
};
pub use service::board_service::{BoardService, NoticeLevel, SyncMode, SyncNotice};
pub use service::loader::{load_board, try_load_board};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
