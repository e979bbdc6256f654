//! Trait model.
//!
//! # Invariants
//! - A trait owns its evidence collection in display order.
//! - Deleting a trait never deletes evidence.

use super::evidence::EvidenceItem;
use super::ids::{new_id, IdKind};
use super::ValidationError;
use serde::{Deserialize, Serialize};

/// Stable identifier of a trait.
pub type TraitId = String;

/// A named grouping of evidence, as shown on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
    pub id: TraitId,
    pub name: String,
    pub evidence: Vec<EvidenceItem>,
}

impl Trait {
    /// Creates an empty trait with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(IdKind::Trait),
            name: name.into(),
            evidence: Vec::new(),
        }
    }

    /// Returns the persisted shape of this trait (without its evidence).
    pub fn record(&self) -> TraitRecord {
        TraitRecord {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Persisted trait row. Evidence membership lives in the link table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitRecord {
    pub id: TraitId,
    pub name: String,
}

impl TraitRecord {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        Ok(())
    }
}

/// Partial field set for trait updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraitPatch {
    pub name: Option<String>,
}

impl TraitPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Default display name for the trait created after `existing` others.
pub fn default_trait_name(prefix: &str, existing: usize) -> String {
    format!("{prefix} {}", existing + 1)
}
