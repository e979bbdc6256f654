//! Drag gesture interpretation.
//!
//! # Responsibility
//! - Track which evidence item is being dragged.
//! - Turn a drop into either a move onto a trait or a snap-back.
//!
//! # Invariants
//! - Only evidence items are draggable; traits are only drop targets.
//! - Every gesture end returns the controller to `Idle`.

use crate::model::evidence::EvidenceId;
use crate::model::traits::TraitId;

/// Controller state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { evidence_id: EvidenceId },
}

/// What the pointer was over when the gesture ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Trait(TraitId),
    /// The unassigned pool area.
    EvidencePool,
    /// Another evidence card.
    Evidence(EvidenceId),
}

/// Result of a completed gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    MoveToTrait {
        evidence_id: EvidenceId,
        trait_id: TraitId,
    },
    /// The item visually returns to where it was; nothing changes.
    SnapBack,
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Id of the item under the pointer, if a gesture is in progress.
    pub fn active_id(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { evidence_id } => Some(evidence_id.as_str()),
            DragState::Idle => None,
        }
    }

    /// Starts dragging an evidence item, replacing any stale gesture.
    pub fn start(&mut self, evidence_id: impl Into<EvidenceId>) {
        self.state = DragState::Dragging {
            evidence_id: evidence_id.into(),
        };
    }

    /// Ends the gesture over `target` (`None` when dropped on nothing).
    pub fn end(&mut self, target: Option<&DropTarget>) -> DragOutcome {
        let previous = std::mem::take(&mut self.state);
        match (previous, target) {
            (DragState::Dragging { evidence_id }, Some(DropTarget::Trait(trait_id))) => {
                DragOutcome::MoveToTrait {
                    evidence_id,
                    trait_id: trait_id.clone(),
                }
            }
            _ => DragOutcome::SnapBack,
        }
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
