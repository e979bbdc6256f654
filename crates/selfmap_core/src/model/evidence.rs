//! Evidence item model.
//!
//! # Responsibility
//! - Define the user-authored note record and its partial update shape.
//!
//! # Invariants
//! - `id` is stable for the lifetime of the item, including across moves.
//! - `content` is never blank for a persisted item.
//! - `date` is the local creation date formatted as `YYYY-MM-DD`.

use super::ids::{new_id, IdKind};
use super::ValidationError;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Stable identifier of an evidence item.
pub type EvidenceId = String;

/// One data point the user captured about themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub id: EvidenceId,
    pub content: String,
    /// Creation date shown next to the card.
    pub date: String,
}

impl EvidenceItem {
    /// Creates an item with a generated id and today's local date.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: new_id(IdKind::Evidence),
            content: content.into(),
            date: today(),
        }
    }

    /// Creates an item with a caller-provided identity.
    ///
    /// Used by load paths where identity already exists in storage.
    pub fn with_id(
        id: impl Into<EvidenceId>,
        content: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            date: date.into(),
        }
    }

    /// Checks write-path invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if self.content.trim().is_empty() {
            return Err(ValidationError::BlankContent);
        }
        Ok(())
    }
}

/// Partial field set for evidence updates. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidencePatch {
    pub content: Option<String>,
    pub date: Option<String>,
}

impl EvidencePatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            date: None,
        }
    }
}

/// Returns the local calendar date in `YYYY-MM-DD` form.
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}
