//! Immutable board snapshot and its transforms.

use crate::model::evidence::{EvidenceId, EvidenceItem};
use crate::model::traits::{Trait, TraitId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Precondition failures of board mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Evidence content is empty after trim.
    BlankContent,
    EvidenceNotFound(EvidenceId),
    TraitNotFound(TraitId),
    /// Evidence exists but is not in the unassigned pool.
    NotUnassigned(EvidenceId),
    /// Evidence is not in the given trait's collection.
    NotInTrait {
        trait_id: TraitId,
        evidence_id: EvidenceId,
    },
    /// An item with this id is already on the board.
    DuplicateId(String),
    /// The item is open in the editor and cannot be dragged.
    EditInProgress(EvidenceId),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankContent => write!(f, "evidence content must not be blank"),
            Self::EvidenceNotFound(id) => write!(f, "evidence not found: {id}"),
            Self::TraitNotFound(id) => write!(f, "trait not found: {id}"),
            Self::NotUnassigned(id) => write!(f, "evidence is not unassigned: {id}"),
            Self::NotInTrait {
                trait_id,
                evidence_id,
            } => write!(f, "evidence {evidence_id} is not in trait {trait_id}"),
            Self::DuplicateId(id) => write!(f, "id already on the board: {id}"),
            Self::EditInProgress(id) => write!(f, "evidence is being edited: {id}"),
        }
    }
}

impl Error for BoardError {}

/// Where an evidence item currently lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvidenceLocation {
    Unassigned { index: usize },
    Trait { trait_id: TraitId, index: usize },
}

/// One consistent view of the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub unassigned: Vec<EvidenceItem>,
    pub traits: Vec<Trait>,
}

impl BoardSnapshot {
    pub fn new(unassigned: Vec<EvidenceItem>, traits: Vec<Trait>) -> Self {
        Self { unassigned, traits }
    }

    pub fn is_empty(&self) -> bool {
        self.unassigned.is_empty() && self.traits.is_empty()
    }

    /// Finds an evidence item wherever it lives.
    pub fn find_evidence(&self, evidence_id: &str) -> Option<(EvidenceLocation, &EvidenceItem)> {
        if let Some(index) = self.unassigned.iter().position(|e| e.id == evidence_id) {
            return Some((
                EvidenceLocation::Unassigned { index },
                &self.unassigned[index],
            ));
        }
        self.traits.iter().find_map(|t| {
            t.evidence
                .iter()
                .position(|e| e.id == evidence_id)
                .map(|index| {
                    (
                        EvidenceLocation::Trait {
                            trait_id: t.id.clone(),
                            index,
                        },
                        &t.evidence[index],
                    )
                })
        })
    }

    pub fn find_trait(&self, trait_id: &str) -> Option<(usize, &Trait)> {
        self.traits
            .iter()
            .enumerate()
            .find(|(_, t)| t.id == trait_id)
    }

    /// All evidence ids on the board: pool first, then traits in order.
    pub fn evidence_ids(&self) -> Vec<&str> {
        self.unassigned
            .iter()
            .chain(self.traits.iter().flat_map(|t| t.evidence.iter()))
            .map(|e| e.id.as_str())
            .collect()
    }

    /// Appends a new item to the unassigned pool.
    pub fn add_evidence(&self, item: EvidenceItem) -> Result<Self, BoardError> {
        if item.content.trim().is_empty() {
            return Err(BoardError::BlankContent);
        }
        if self.contains_id(&item.id) {
            return Err(BoardError::DuplicateId(item.id));
        }
        let mut next = self.clone();
        next.unassigned.push(item);
        Ok(next)
    }

    /// Replaces content of an item in place, wherever it lives.
    pub fn edit_evidence(&self, evidence_id: &str, content: &str) -> Result<Self, BoardError> {
        if content.trim().is_empty() {
            return Err(BoardError::BlankContent);
        }
        let mut next = self.clone();
        let item = next
            .evidence_mut(evidence_id)
            .ok_or_else(|| BoardError::EvidenceNotFound(evidence_id.to_string()))?;
        item.content = content.to_string();
        Ok(next)
    }

    pub fn delete_evidence(&self, evidence_id: &str) -> Result<Self, BoardError> {
        let mut next = self.clone();
        next.take_evidence(evidence_id)
            .ok_or_else(|| BoardError::EvidenceNotFound(evidence_id.to_string()))?;
        Ok(next)
    }

    pub fn add_trait(&self, created: Trait) -> Result<Self, BoardError> {
        if self.contains_id(&created.id) {
            return Err(BoardError::DuplicateId(created.id));
        }
        let mut next = self.clone();
        next.traits.push(created);
        Ok(next)
    }

    pub fn rename_trait(&self, trait_id: &str, name: &str) -> Result<Self, BoardError> {
        let mut next = self.clone();
        let target = next
            .traits
            .iter_mut()
            .find(|t| t.id == trait_id)
            .ok_or_else(|| BoardError::TraitNotFound(trait_id.to_string()))?;
        target.name = name.to_string();
        Ok(next)
    }

    /// Removes a trait and appends its evidence to the pool in trait order.
    pub fn delete_trait(&self, trait_id: &str) -> Result<Self, BoardError> {
        let (index, _) = self
            .find_trait(trait_id)
            .ok_or_else(|| BoardError::TraitNotFound(trait_id.to_string()))?;
        let mut next = self.clone();
        let removed = next.traits.remove(index);
        next.unassigned.extend(removed.evidence);
        Ok(next)
    }

    /// Moves an unassigned item to the end of a trait's collection.
    pub fn move_to_trait(&self, evidence_id: &str, trait_id: &str) -> Result<Self, BoardError> {
        if self.find_trait(trait_id).is_none() {
            return Err(BoardError::TraitNotFound(trait_id.to_string()));
        }
        let index = match self.find_evidence(evidence_id) {
            Some((EvidenceLocation::Unassigned { index }, _)) => index,
            Some((EvidenceLocation::Trait { .. }, _)) => {
                return Err(BoardError::NotUnassigned(evidence_id.to_string()));
            }
            None => return Err(BoardError::EvidenceNotFound(evidence_id.to_string())),
        };

        let mut next = self.clone();
        let item = next.unassigned.remove(index);
        if let Some(target) = next.traits.iter_mut().find(|t| t.id == trait_id) {
            target.evidence.push(item);
        }
        Ok(next)
    }

    /// Moves an item out of a trait to the end of the unassigned pool.
    pub fn move_to_unassigned(&self, trait_id: &str, evidence_id: &str) -> Result<Self, BoardError> {
        let (trait_index, source) = self
            .find_trait(trait_id)
            .ok_or_else(|| BoardError::TraitNotFound(trait_id.to_string()))?;
        let index = source
            .evidence
            .iter()
            .position(|e| e.id == evidence_id)
            .ok_or_else(|| BoardError::NotInTrait {
                trait_id: trait_id.to_string(),
                evidence_id: evidence_id.to_string(),
            })?;

        let mut next = self.clone();
        let item = next.traits[trait_index].evidence.remove(index);
        next.unassigned.push(item);
        Ok(next)
    }

    fn contains_id(&self, id: &str) -> bool {
        self.find_evidence(id).is_some() || self.find_trait(id).is_some()
    }

    fn evidence_mut(&mut self, evidence_id: &str) -> Option<&mut EvidenceItem> {
        self.unassigned
            .iter_mut()
            .chain(self.traits.iter_mut().flat_map(|t| t.evidence.iter_mut()))
            .find(|e| e.id == evidence_id)
    }

    /// Removes an item from wherever it lives. Mutates a private working copy.
    fn take_evidence(&mut self, evidence_id: &str) -> Option<EvidenceItem> {
        if let Some(index) = self.unassigned.iter().position(|e| e.id == evidence_id) {
            return Some(self.unassigned.remove(index));
        }
        self.traits.iter_mut().find_map(|t| {
            t.evidence
                .iter()
                .position(|e| e.id == evidence_id)
                .map(|index| t.evidence.remove(index))
        })
    }
}
