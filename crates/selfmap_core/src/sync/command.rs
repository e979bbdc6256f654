//! Sync command definitions.

use crate::board::BoardMutation;
use crate::model::evidence::{EvidenceId, EvidenceItem, EvidencePatch};
use crate::model::traits::{TraitId, TraitPatch, TraitRecord};
use crate::repo::{BoardRepository, RepoResult};

/// One remote write, carrying everything needed to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncCommand {
    UpsertEvidence(EvidenceItem),
    UpdateEvidence { id: EvidenceId, patch: EvidencePatch },
    DeleteEvidence { id: EvidenceId },
    UpsertTrait(TraitRecord),
    UpdateTrait { id: TraitId, patch: TraitPatch },
    DeleteTrait { id: TraitId },
    AttachEvidence {
        trait_id: TraitId,
        evidence_id: EvidenceId,
    },
    DetachEvidence {
        trait_id: TraitId,
        evidence_id: EvidenceId,
    },
}

/// Payload-free command discriminant, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncKind {
    UpsertEvidence,
    UpdateEvidence,
    DeleteEvidence,
    UpsertTrait,
    UpdateTrait,
    DeleteTrait,
    AttachEvidence,
    DetachEvidence,
}

impl SyncKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpsertEvidence => "upsert_evidence",
            Self::UpdateEvidence => "update_evidence",
            Self::DeleteEvidence => "delete_evidence",
            Self::UpsertTrait => "upsert_trait",
            Self::UpdateTrait => "update_trait",
            Self::DeleteTrait => "delete_trait",
            Self::AttachEvidence => "attach_evidence",
            Self::DetachEvidence => "detach_evidence",
        }
    }
}

impl SyncCommand {
    pub fn kind(&self) -> SyncKind {
        match self {
            Self::UpsertEvidence(_) => SyncKind::UpsertEvidence,
            Self::UpdateEvidence { .. } => SyncKind::UpdateEvidence,
            Self::DeleteEvidence { .. } => SyncKind::DeleteEvidence,
            Self::UpsertTrait(_) => SyncKind::UpsertTrait,
            Self::UpdateTrait { .. } => SyncKind::UpdateTrait,
            Self::DeleteTrait { .. } => SyncKind::DeleteTrait,
            Self::AttachEvidence { .. } => SyncKind::AttachEvidence,
            Self::DetachEvidence { .. } => SyncKind::DetachEvidence,
        }
    }

    /// Runs the command against a repository.
    pub fn execute<R: BoardRepository + ?Sized>(&self, repo: &R) -> RepoResult<()> {
        match self {
            Self::UpsertEvidence(item) => repo.upsert_evidence(item),
            Self::UpdateEvidence { id, patch } => repo.update_evidence(id, patch),
            Self::DeleteEvidence { id } => repo.delete_evidence(id),
            Self::UpsertTrait(record) => repo.upsert_trait(record),
            Self::UpdateTrait { id, patch } => repo.update_trait(id, patch),
            Self::DeleteTrait { id } => repo.delete_trait(id),
            Self::AttachEvidence {
                trait_id,
                evidence_id,
            } => repo.attach_evidence(trait_id, evidence_id),
            Self::DetachEvidence {
                trait_id,
                evidence_id,
            } => repo.detach_evidence(trait_id, evidence_id),
        }
    }
}

impl From<&BoardMutation> for SyncCommand {
    fn from(mutation: &BoardMutation) -> Self {
        match mutation {
            BoardMutation::AddEvidence(item) => Self::UpsertEvidence(item.clone()),
            BoardMutation::EditEvidence {
                evidence_id,
                content,
            } => Self::UpdateEvidence {
                id: evidence_id.clone(),
                patch: EvidencePatch::content(content.as_str()),
            },
            BoardMutation::DeleteEvidence { evidence_id } => Self::DeleteEvidence {
                id: evidence_id.clone(),
            },
            BoardMutation::AddTrait(created) => Self::UpsertTrait(created.record()),
            BoardMutation::RenameTrait { trait_id, name } => Self::UpdateTrait {
                id: trait_id.clone(),
                patch: TraitPatch::name(name.as_str()),
            },
            BoardMutation::DeleteTrait { trait_id } => Self::DeleteTrait {
                id: trait_id.clone(),
            },
            BoardMutation::MoveToTrait {
                evidence_id,
                trait_id,
            } => Self::AttachEvidence {
                trait_id: trait_id.clone(),
                evidence_id: evidence_id.clone(),
            },
            BoardMutation::MoveToUnassigned {
                trait_id,
                evidence_id,
            } => Self::DetachEvidence {
                trait_id: trait_id.clone(),
                evidence_id: evidence_id.clone(),
            },
        }
    }
}
