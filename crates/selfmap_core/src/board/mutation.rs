//! Replayable board mutations.
//!
//! A mutation carries everything it needs, generated ids and dates
//! included, so applying it to the same snapshot always gives the same
//! result. The service keeps the mutations whose sync is still pending and
//! rebuilds the visible board from the last confirmed snapshot by replaying
//! them.

use super::snapshot::{BoardError, BoardSnapshot};
use crate::model::evidence::{EvidenceId, EvidenceItem};
use crate::model::traits::{Trait, TraitId};

/// User-level operation category, used for notices and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    AddEvidence,
    EditEvidence,
    DeleteEvidence,
    AddTrait,
    RenameTrait,
    DeleteTrait,
    MoveToTrait,
    MoveToUnassigned,
}

impl MutationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddEvidence => "add_evidence",
            Self::EditEvidence => "edit_evidence",
            Self::DeleteEvidence => "delete_evidence",
            Self::AddTrait => "add_trait",
            Self::RenameTrait => "rename_trait",
            Self::DeleteTrait => "delete_trait",
            Self::MoveToTrait => "move_to_trait",
            Self::MoveToUnassigned => "move_to_unassigned",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardMutation {
    AddEvidence(EvidenceItem),
    EditEvidence {
        evidence_id: EvidenceId,
        content: String,
    },
    DeleteEvidence {
        evidence_id: EvidenceId,
    },
    /// The trait is created empty.
    AddTrait(Trait),
    RenameTrait {
        trait_id: TraitId,
        name: String,
    },
    DeleteTrait {
        trait_id: TraitId,
    },
    MoveToTrait {
        evidence_id: EvidenceId,
        trait_id: TraitId,
    },
    MoveToUnassigned {
        trait_id: TraitId,
        evidence_id: EvidenceId,
    },
}

impl BoardMutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::AddEvidence(_) => MutationKind::AddEvidence,
            Self::EditEvidence { .. } => MutationKind::EditEvidence,
            Self::DeleteEvidence { .. } => MutationKind::DeleteEvidence,
            Self::AddTrait(_) => MutationKind::AddTrait,
            Self::RenameTrait { .. } => MutationKind::RenameTrait,
            Self::DeleteTrait { .. } => MutationKind::DeleteTrait,
            Self::MoveToTrait { .. } => MutationKind::MoveToTrait,
            Self::MoveToUnassigned { .. } => MutationKind::MoveToUnassigned,
        }
    }

    /// Applies the mutation to `board`, leaving `board` untouched.
    ///
    /// # Errors
    /// - Returns the same `BoardError` the matching snapshot transform
    ///   returns when its precondition does not hold on `board`.
    pub fn apply(&self, board: &BoardSnapshot) -> Result<BoardSnapshot, BoardError> {
        match self {
            Self::AddEvidence(item) => board.add_evidence(item.clone()),
            Self::EditEvidence {
                evidence_id,
                content,
            } => board.edit_evidence(evidence_id, content),
            Self::DeleteEvidence { evidence_id } => board.delete_evidence(evidence_id),
            Self::AddTrait(created) => board.add_trait(created.clone()),
            Self::RenameTrait { trait_id, name } => board.rename_trait(trait_id, name),
            Self::DeleteTrait { trait_id } => board.delete_trait(trait_id),
            Self::MoveToTrait {
                evidence_id,
                trait_id,
            } => board.move_to_trait(evidence_id, trait_id),
            Self::MoveToUnassigned {
                trait_id,
                evidence_id,
            } => board.move_to_unassigned(trait_id, evidence_id),
        }
    }
}

/// Replays `mutations` in order on top of `base`.
///
/// Mutations whose precondition no longer holds are skipped; storage rejects
/// the same write, so the result still mirrors what storage will hold.
pub fn replay<'a, I>(base: &BoardSnapshot, mutations: I) -> BoardSnapshot
where
    I: IntoIterator<Item = &'a BoardMutation>,
{
    let mut board = base.clone();
    for mutation in mutations {
        if let Ok(next) = mutation.apply(&board) {
            board = next;
        }
    }
    board
}

#[cfg(test)]
mod tests {
    use super::{replay, BoardMutation, MutationKind};
    use crate::board::snapshot::BoardSnapshot;
    use crate::model::evidence::EvidenceItem;
    use crate::model::traits::Trait;

    fn item(id: &str, content: &str) -> EvidenceItem {
        EvidenceItem::with_id(id, content, "2024-05-01")
    }

    fn named_trait(id: &str, name: &str, evidence: Vec<EvidenceItem>) -> Trait {
        Trait {
            id: id.to_string(),
            name: name.to_string(),
            evidence,
        }
    }

    fn edit(id: &str, content: &str) -> BoardMutation {
        BoardMutation::EditEvidence {
            evidence_id: id.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn apply_matches_the_snapshot_transform() {
        let board = BoardSnapshot::new(vec![item("e1", "a")], vec![named_trait("t1", "Calm", vec![])]);
        let moved = BoardMutation::MoveToTrait {
            evidence_id: "e1".to_string(),
            trait_id: "t1".to_string(),
        };
        assert_eq!(moved.apply(&board), board.move_to_trait("e1", "t1"));
        assert_eq!(moved.kind(), MutationKind::MoveToTrait);
    }

    #[test]
    fn replay_keeps_the_later_edit_when_an_earlier_one_is_dropped() {
        let confirmed = BoardSnapshot::new(vec![item("e1", "a")], vec![]);
        let later = [edit("e1", "c")];
        let rebuilt = replay(&confirmed, later.iter());
        assert_eq!(rebuilt.unassigned[0].content, "c");
    }

    #[test]
    fn replay_skips_mutations_whose_precondition_is_gone() {
        let confirmed = BoardSnapshot::new(
            vec![],
            vec![
                named_trait("t1", "Calm", vec![item("e1", "a")]),
                named_trait("t2", "Curious", vec![]),
            ],
        );
        // The detach from t1 was dropped, so e1 is not in the pool to move.
        let pending = [BoardMutation::MoveToTrait {
            evidence_id: "e1".to_string(),
            trait_id: "t2".to_string(),
        }];
        assert_eq!(replay(&confirmed, pending.iter()), confirmed);
    }

    #[test]
    fn replay_of_nothing_is_the_base() {
        let confirmed = BoardSnapshot::new(vec![item("e1", "a")], vec![]);
        assert_eq!(replay(&confirmed, std::iter::empty()), confirmed);
    }
}
