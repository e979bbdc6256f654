//! Board service: the client state store with optimistic sync.
//!
//! # Responsibility
//! - Own the current board snapshot and transient UI state (drag, edit).
//! - Apply every mutation locally first, then queue exactly one sync command.
//! - Rebuild the board without a mutation and raise a notice when its sync
//!   command fails.
//!
//! # Invariants
//! - Mutations are visible before their sync command completes.
//! - The visible board equals the confirmed board with every pending
//!   mutation replayed on top, in submission order.
//! - A failed mutation never discards a later mutation storage accepted.
//! - In local-only mode no sync command is ever issued.
//! - A precondition failure leaves the snapshot and storage untouched.

use crate::board::{
    replay, BoardError, BoardMutation, BoardSnapshot, EvidenceLocation, MutationKind,
};
use crate::config::BoardConfig;
use crate::db::open_db;
use crate::drag::{DragController, DragOutcome, DropTarget};
use crate::model::evidence::{EvidenceId, EvidenceItem};
use crate::model::traits::{default_trait_name, Trait, TraitId};
use crate::repo::{BoardRepository, SqliteBoardRepository};
use crate::service::loader::load_board;
use crate::sync::{MutationId, SyncCommand, SyncError, SyncHandle, SyncKind, SyncOutcome};
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Whether mutations are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Commands are sent to the sync worker.
    Remote,
    /// Storage was unavailable at startup; changes live in memory only.
    LocalOnly,
}

fn failure_text(kind: MutationKind) -> (&'static str, &'static str) {
    match kind {
        MutationKind::AddEvidence => (
            "Adding evidence failed",
            "The evidence could not be saved and was removed.",
        ),
        MutationKind::EditEvidence => (
            "Updating evidence failed",
            "The evidence text could not be saved and was restored.",
        ),
        MutationKind::DeleteEvidence => (
            "Deleting evidence failed",
            "The evidence could not be deleted and was put back.",
        ),
        MutationKind::AddTrait => (
            "Adding trait failed",
            "The trait could not be saved and was removed.",
        ),
        MutationKind::RenameTrait => (
            "Renaming trait failed",
            "The trait name could not be saved and was restored.",
        ),
        MutationKind::DeleteTrait => (
            "Deleting trait failed",
            "The trait could not be deleted and was put back.",
        ),
        MutationKind::MoveToTrait => (
            "Moving evidence failed",
            "The evidence could not be assigned and was returned.",
        ),
        MutationKind::MoveToUnassigned => (
            "Returning evidence failed",
            "The evidence could not be unassigned and was put back.",
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Non-blocking user notification; rendering is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncNotice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
    /// Operation that failed, for error notices.
    pub kind: Option<MutationKind>,
}

/// Client state store driving optimistic updates.
pub struct BoardService {
    /// What the user sees.
    snapshot: BoardSnapshot,
    /// Board as storage holds it: the loaded board plus every mutation
    /// storage has accepted.
    confirmed: BoardSnapshot,
    sync: Option<SyncHandle>,
    pending: BTreeMap<MutationId, BoardMutation>,
    next_mutation_id: MutationId,
    notices: Vec<SyncNotice>,
    drag: DragController,
    editing: Option<EvidenceId>,
    trait_prefix: String,
}

impl BoardService {
    /// Starts an empty in-memory board that never persists.
    pub fn local_only(config: &BoardConfig) -> Self {
        Self::with_parts(BoardSnapshot::default(), None, config)
    }

    /// Loads the board from `repo`, then hands `repo` to the sync worker.
    pub fn connect<R>(repo: R, config: &BoardConfig) -> Self
    where
        R: BoardRepository + Send + 'static,
    {
        let snapshot = load_board(&repo);
        match SyncHandle::spawn(repo) {
            Ok(handle) => Self::with_parts(snapshot, Some(handle), config),
            Err(err) => {
                error!(
                    "event=sync_worker_start module=service status=error error_code=spawn_failed error={}",
                    err
                );
                Self::with_parts(snapshot, None, config)
            }
        }
    }

    /// Opens configured storage, loads the board and starts syncing.
    ///
    /// Never fails: when storage is not configured or cannot be opened the
    /// board starts empty in local-only mode.
    pub fn bootstrap(config: &BoardConfig) -> Self {
        let Some(path) = config.db_path.as_ref() else {
            info!("event=board_bootstrap module=service status=ok mode=local_only reason=no_db_path");
            return Self::local_only(config);
        };

        let repo = match open_db(path)
            .map_err(|err| err.to_string())
            .and_then(|conn| SqliteBoardRepository::try_new(conn).map_err(|err| err.to_string()))
        {
            Ok(repo) => repo,
            Err(err) => {
                error!(
                    "event=board_bootstrap module=service status=error mode=local_only error_code=db_unavailable error={}",
                    err
                );
                return Self::local_only(config);
            }
        };

        let mut service = Self::connect(repo, config);
        if service.sync_mode() == SyncMode::Remote {
            service.notices.push(SyncNotice {
                level: NoticeLevel::Info,
                title: "Data loaded".to_string(),
                description: "Saved evidence and traits were loaded.".to_string(),
                kind: None,
            });
        }
        info!(
            "event=board_bootstrap module=service status=ok mode={:?}",
            service.sync_mode()
        );
        service
    }

    fn with_parts(snapshot: BoardSnapshot, sync: Option<SyncHandle>, config: &BoardConfig) -> Self {
        Self {
            confirmed: snapshot.clone(),
            snapshot,
            sync,
            pending: BTreeMap::new(),
            next_mutation_id: 1,
            notices: Vec::new(),
            drag: DragController::new(),
            editing: None,
            trait_prefix: config.default_trait_prefix.clone(),
        }
    }

    pub fn snapshot(&self) -> &BoardSnapshot {
        &self.snapshot
    }

    pub fn unassigned(&self) -> &[EvidenceItem] {
        &self.snapshot.unassigned
    }

    pub fn traits(&self) -> &[Trait] {
        &self.snapshot.traits
    }

    pub fn sync_mode(&self) -> SyncMode {
        if self.sync.is_some() {
            SyncMode::Remote
        } else {
            SyncMode::LocalOnly
        }
    }

    /// Number of sync commands issued but not yet reported back.
    pub fn pending_sync_count(&self) -> usize {
        self.pending.len()
    }

    /// Returns and clears queued notices.
    pub fn take_notices(&mut self) -> Vec<SyncNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Adds a new evidence item to the unassigned pool.
    pub fn add_evidence(&mut self, text: &str) -> Result<EvidenceId, BoardError> {
        let content = text.trim();
        if content.is_empty() {
            return Err(BoardError::BlankContent);
        }
        let item = EvidenceItem::new(content);
        let evidence_id = item.id.clone();
        self.commit(BoardMutation::AddEvidence(item))?;
        Ok(evidence_id)
    }

    /// Replaces evidence content wherever the item lives.
    ///
    /// Returns `Ok(false)` when the trimmed content is unchanged.
    pub fn edit_evidence(&mut self, evidence_id: &str, content: &str) -> Result<bool, BoardError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(BoardError::BlankContent);
        }
        let (_, current) = self
            .snapshot
            .find_evidence(evidence_id)
            .ok_or_else(|| BoardError::EvidenceNotFound(evidence_id.to_string()))?;
        if current.content == content {
            return Ok(false);
        }
        self.commit(BoardMutation::EditEvidence {
            evidence_id: evidence_id.to_string(),
            content: content.to_string(),
        })?;
        Ok(true)
    }

    /// Deletes an evidence item wherever it lives.
    pub fn delete_evidence(&mut self, evidence_id: &str) -> Result<(), BoardError> {
        self.commit(BoardMutation::DeleteEvidence {
            evidence_id: evidence_id.to_string(),
        })?;
        if self.editing.as_deref() == Some(evidence_id) {
            self.editing = None;
        }
        if self.drag.active_id() == Some(evidence_id) {
            self.drag.cancel();
        }
        Ok(())
    }

    /// Appends an empty trait with the next default name.
    pub fn add_trait(&mut self) -> Result<TraitId, BoardError> {
        let name = default_trait_name(&self.trait_prefix, self.snapshot.traits.len());
        let created = Trait::new(name);
        let trait_id = created.id.clone();
        self.commit(BoardMutation::AddTrait(created))?;
        Ok(trait_id)
    }

    /// Renames a trait. Returns `Ok(false)` when the name is unchanged.
    pub fn rename_trait(&mut self, trait_id: &str, name: &str) -> Result<bool, BoardError> {
        let (_, current) = self
            .snapshot
            .find_trait(trait_id)
            .ok_or_else(|| BoardError::TraitNotFound(trait_id.to_string()))?;
        if current.name == name {
            return Ok(false);
        }
        self.commit(BoardMutation::RenameTrait {
            trait_id: trait_id.to_string(),
            name: name.to_string(),
        })?;
        Ok(true)
    }

    /// Deletes a trait; its evidence returns to the unassigned pool.
    pub fn delete_trait(&mut self, trait_id: &str) -> Result<(), BoardError> {
        self.commit(BoardMutation::DeleteTrait {
            trait_id: trait_id.to_string(),
        })
    }

    /// Moves an unassigned item to the end of a trait.
    pub fn move_to_trait(&mut self, evidence_id: &str, trait_id: &str) -> Result<(), BoardError> {
        self.commit(BoardMutation::MoveToTrait {
            evidence_id: evidence_id.to_string(),
            trait_id: trait_id.to_string(),
        })
    }

    /// Moves an item out of `trait_id` to the end of the unassigned pool.
    pub fn move_to_unassigned(
        &mut self,
        trait_id: &str,
        evidence_id: &str,
    ) -> Result<(), BoardError> {
        self.commit(BoardMutation::MoveToUnassigned {
            trait_id: trait_id.to_string(),
            evidence_id: evidence_id.to_string(),
        })
    }

    /// Opens the editor on one item and returns its content as the draft.
    pub fn begin_edit(&mut self, evidence_id: &str) -> Result<String, BoardError> {
        let content = self
            .snapshot
            .find_evidence(evidence_id)
            .map(|(_, item)| item.content.clone())
            .ok_or_else(|| BoardError::EvidenceNotFound(evidence_id.to_string()))?;
        if self.drag.active_id() == Some(evidence_id) {
            self.drag.cancel();
        }
        self.editing = Some(evidence_id.to_string());
        Ok(content)
    }

    /// Id of the item open in the editor.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Closes the editor and saves `draft` unless it is blank or unchanged.
    pub fn commit_edit(&mut self, draft: &str) -> Result<bool, BoardError> {
        let Some(evidence_id) = self.editing.take() else {
            return Ok(false);
        };
        if draft.trim().is_empty() {
            return Ok(false);
        }
        self.edit_evidence(&evidence_id, draft)
    }

    /// Starts dragging an unassigned evidence card.
    pub fn drag_start(&mut self, evidence_id: &str) -> Result<(), BoardError> {
        match self.snapshot.find_evidence(evidence_id) {
            Some((EvidenceLocation::Unassigned { .. }, _)) => {}
            Some((EvidenceLocation::Trait { .. }, _)) => {
                return Err(BoardError::NotUnassigned(evidence_id.to_string()));
            }
            None => return Err(BoardError::EvidenceNotFound(evidence_id.to_string())),
        }
        if self.editing.as_deref() == Some(evidence_id) {
            return Err(BoardError::EditInProgress(evidence_id.to_string()));
        }
        self.drag.start(evidence_id);
        Ok(())
    }

    /// Ends the drag gesture, moving the card when dropped on a trait.
    pub fn drag_end(&mut self, target: Option<&DropTarget>) -> Result<DragOutcome, BoardError> {
        let outcome = self.drag.end(target);
        if let DragOutcome::MoveToTrait {
            evidence_id,
            trait_id,
        } = &outcome
        {
            self.move_to_trait(evidence_id, trait_id)?;
        }
        Ok(outcome)
    }

    pub fn drag_cancel(&mut self) {
        self.drag.cancel();
    }

    /// Item shown in the drag overlay, if a drag is in progress.
    pub fn active_drag_item(&self) -> Option<&EvidenceItem> {
        let active = self.drag.active_id()?;
        self.snapshot.unassigned.iter().find(|item| item.id == active)
    }

    /// Applies every outcome already reported, without blocking, and
    /// returns the queued notices.
    pub fn poll_sync(&mut self) -> Vec<SyncNotice> {
        let outcomes = match &self.sync {
            Some(sync) => sync.try_outcomes(),
            None => Vec::new(),
        };
        for outcome in outcomes {
            self.reconcile(outcome);
        }
        self.take_notices()
    }

    /// Blocks until every issued command has reported back, or `timeout`.
    ///
    /// Returns `true` when nothing is pending anymore. Intended for batch
    /// callers; interactive loops should use `poll_sync`.
    pub fn wait_for_sync(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.pending.is_empty() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            let outcome = match &self.sync {
                Some(sync) => sync.next_outcome(remaining),
                None => None,
            };
            match outcome {
                Some(outcome) => self.reconcile(outcome),
                None => return self.pending.is_empty(),
            }
        }
        true
    }

    /// Applies `mutation` locally and queues its sync command.
    fn commit(&mut self, mutation: BoardMutation) -> Result<(), BoardError> {
        let next = mutation.apply(&self.snapshot)?;
        self.snapshot = next;
        let kind = mutation.kind();

        let Some(sync) = &self.sync else {
            self.confirmed = self.snapshot.clone();
            debug!(
                "event=board_mutation module=service status=applied kind={} mode=local_only",
                kind.as_str()
            );
            return Ok(());
        };

        let mutation_id = self.next_mutation_id;
        self.next_mutation_id += 1;
        let command = SyncCommand::from(&mutation);
        let command_kind = command.kind();
        match sync.submit(mutation_id, command) {
            Ok(()) => {
                debug!(
                    "event=board_mutation module=service status=applied kind={} mutation_id={}",
                    kind.as_str(),
                    mutation_id
                );
                self.pending.insert(mutation_id, mutation);
            }
            Err(err) => self.roll_back(mutation_id, kind, command_kind, &err),
        }
        Ok(())
    }

    fn reconcile(&mut self, outcome: SyncOutcome) {
        let Some(mutation) = self.pending.remove(&outcome.mutation_id) else {
            warn!(
                "event=sync_reconcile module=service status=skip reason=unknown_mutation mutation_id={}",
                outcome.mutation_id
            );
            return;
        };
        match outcome.result {
            Ok(()) => match mutation.apply(&self.confirmed) {
                Ok(next) => self.confirmed = next,
                Err(err) => warn!(
                    "event=sync_reconcile module=service status=skip reason=not_applicable kind={} mutation_id={} error={}",
                    mutation.kind().as_str(),
                    outcome.mutation_id,
                    err
                ),
            },
            Err(err) => self.roll_back(outcome.mutation_id, mutation.kind(), outcome.kind, &err),
        }
    }

    /// Drops a failed mutation by rebuilding the board from the confirmed
    /// snapshot and the mutations still pending.
    fn roll_back(
        &mut self,
        mutation_id: MutationId,
        kind: MutationKind,
        command: SyncKind,
        err: &SyncError,
    ) {
        self.snapshot = replay(&self.confirmed, self.pending.values());
        warn!(
            "event=sync_rollback module=service status=ok kind={} command={} mutation_id={} replayed={} error={}",
            kind.as_str(),
            command.as_str(),
            mutation_id,
            self.pending.len(),
            err
        );
        let (title, description) = failure_text(kind);
        self.notices.push(SyncNotice {
            level: NoticeLevel::Error,
            title: title.to_string(),
            description: description.to_string(),
            kind: Some(kind),
        });
    }
}
