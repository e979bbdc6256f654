//! Domain model for evidence cards and the traits that group them.
//!
//! # Responsibility
//! - Define canonical records shared by the board, repository and loader.
//! - Generate stable identifiers for newly captured items.
//!
//! # Invariants
//! - Every evidence item and trait is identified by a stable string id.
//! - Ids are unique across both entity kinds.
//! - Evidence is owned by exactly one place: the unassigned pool or one trait.

pub mod evidence;
pub mod ids;
pub mod traits;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures for records about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identifier is empty after trim.
    EmptyId,
    /// Evidence content is empty after trim.
    BlankContent,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "id must not be empty"),
            Self::BlankContent => write!(f, "evidence content must not be blank"),
        }
    }
}

impl Error for ValidationError {}
