//! Background execution of repository calls.
//!
//! # Responsibility
//! - Describe each remote write as a self-contained command.
//! - Run commands off the caller's thread and report outcomes back.
//!
//! # Invariants
//! - Commands run strictly in submission order, one at a time.
//! - Each command runs at most once; nothing is retried.
//! - A failing command never stops the worker.

mod command;
mod worker;

pub use command::{SyncCommand, SyncKind};
pub use worker::{SyncHandle, SyncOutcome};

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier tying an outcome back to the mutation that issued it.
pub type MutationId = u64;

/// Failure of one sync command.
#[derive(Debug)]
pub enum SyncError {
    Repo(RepoError),
    /// The worker thread is gone; the command was never executed.
    WorkerStopped,
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::WorkerStopped => write!(f, "sync worker is not running"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::WorkerStopped => None,
        }
    }
}

impl From<RepoError> for SyncError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
