#![allow(dead_code)]

use selfmap_core::db::{open_db, open_db_in_memory};
use selfmap_core::model::evidence::{EvidenceItem, EvidencePatch};
use selfmap_core::model::traits::{TraitPatch, TraitRecord};
use selfmap_core::repo::{EvidenceRow, LinkRow, TraitRow};
use selfmap_core::{
    load_board, BoardSnapshot, EvidenceRepository, LinkRepository, RepoError, RepoResult,
    SqliteBoardRepository, TraitRepository,
};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub fn memory_repo() -> SqliteBoardRepository {
    SqliteBoardRepository::try_new(open_db_in_memory().unwrap()).unwrap()
}

/// Repository on a database file, so a second connection can read back
/// what the sync worker wrote.
pub fn file_repo(path: &Path) -> SqliteBoardRepository {
    SqliteBoardRepository::try_new(open_db(path).unwrap()).unwrap()
}

/// Board as storage currently holds it.
pub fn stored_board(path: &Path) -> BoardSnapshot {
    load_board(&file_repo(path))
}

/// Order-insensitive view of a board: evidence content and owning trait,
/// plus trait names.
#[derive(Debug, PartialEq, Eq)]
pub struct Membership {
    pub evidence: BTreeMap<String, (String, Option<String>)>,
    pub traits: BTreeMap<String, String>,
}

pub fn membership(board: &BoardSnapshot) -> Membership {
    let mut evidence = BTreeMap::new();
    for item in &board.unassigned {
        evidence.insert(item.id.clone(), (item.content.clone(), None));
    }
    let mut traits = BTreeMap::new();
    for owner in &board.traits {
        traits.insert(owner.id.clone(), owner.name.clone());
        for item in &owner.evidence {
            evidence.insert(item.id.clone(), (item.content.clone(), Some(owner.id.clone())));
        }
    }
    Membership { evidence, traits }
}

/// Operations a `FlakyRepository` can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    UpsertEvidence,
    UpdateEvidence,
    DeleteEvidence,
    ListEvidence,
    UpsertTrait,
    UpdateTrait,
    DeleteTrait,
    ListTraits,
    Attach,
    Detach,
    ListLinks,
}

/// Shared switchboard controlling which operations fail.
#[derive(Debug, Clone, Default)]
pub struct FailPlan {
    failing: Arc<Mutex<HashSet<Op>>>,
    once: Arc<Mutex<HashSet<Op>>>,
}

impl FailPlan {
    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Fails only the next call of `op`.
    pub fn fail_once(&self, op: Op) {
        self.once.lock().unwrap().insert(op);
    }

    pub fn heal(&self, op: Op) {
        self.failing.lock().unwrap().remove(&op);
    }

    fn check(&self, op: Op) -> RepoResult<()> {
        let armed_once = self.once.lock().unwrap().remove(&op);
        if armed_once || self.failing.lock().unwrap().contains(&op) {
            return Err(RepoError::InvalidData(format!("injected failure: {op:?}")));
        }
        Ok(())
    }
}

/// SQLite repository wrapper that fails selected operations on demand.
pub struct FlakyRepository {
    inner: SqliteBoardRepository,
    plan: FailPlan,
}

impl FlakyRepository {
    pub fn new(inner: SqliteBoardRepository, plan: FailPlan) -> Self {
        Self { inner, plan }
    }
}

impl EvidenceRepository for FlakyRepository {
    fn upsert_evidence(&self, item: &EvidenceItem) -> RepoResult<()> {
        self.plan.check(Op::UpsertEvidence)?;
        self.inner.upsert_evidence(item)
    }

    fn update_evidence(&self, id: &str, patch: &EvidencePatch) -> RepoResult<()> {
        self.plan.check(Op::UpdateEvidence)?;
        self.inner.update_evidence(id, patch)
    }

    fn delete_evidence(&self, id: &str) -> RepoResult<()> {
        self.plan.check(Op::DeleteEvidence)?;
        self.inner.delete_evidence(id)
    }

    fn list_evidence(&self) -> RepoResult<Vec<EvidenceRow>> {
        self.plan.check(Op::ListEvidence)?;
        self.inner.list_evidence()
    }
}

impl TraitRepository for FlakyRepository {
    fn upsert_trait(&self, record: &TraitRecord) -> RepoResult<()> {
        self.plan.check(Op::UpsertTrait)?;
        self.inner.upsert_trait(record)
    }

    fn update_trait(&self, id: &str, patch: &TraitPatch) -> RepoResult<()> {
        self.plan.check(Op::UpdateTrait)?;
        self.inner.update_trait(id, patch)
    }

    fn delete_trait(&self, id: &str) -> RepoResult<()> {
        self.plan.check(Op::DeleteTrait)?;
        self.inner.delete_trait(id)
    }

    fn list_traits(&self) -> RepoResult<Vec<TraitRow>> {
        self.plan.check(Op::ListTraits)?;
        self.inner.list_traits()
    }
}

impl LinkRepository for FlakyRepository {
    fn attach_evidence(&self, trait_id: &str, evidence_id: &str) -> RepoResult<()> {
        self.plan.check(Op::Attach)?;
        self.inner.attach_evidence(trait_id, evidence_id)
    }

    fn detach_evidence(&self, trait_id: &str, evidence_id: &str) -> RepoResult<()> {
        self.plan.check(Op::Detach)?;
        self.inner.detach_evidence(trait_id, evidence_id)
    }

    fn list_links(&self, trait_ids: &[String]) -> RepoResult<Vec<LinkRow>> {
        self.plan.check(Op::ListLinks)?;
        self.inner.list_links(trait_ids)
    }
}

pub fn evidence(id: &str, content: &str) -> EvidenceItem {
    EvidenceItem::with_id(id, content, "2024-05-01")
}

pub fn trait_record(id: &str, name: &str) -> TraitRecord {
    TraitRecord {
        id: id.to_string(),
        name: name.to_string(),
    }
}
