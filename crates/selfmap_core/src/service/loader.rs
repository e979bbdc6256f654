//! Bulk loader: rebuilds the board from persisted rows.
//!
//! # Responsibility
//! - Fetch evidence, traits and links, then regroup evidence by trait.
//!
//! # Invariants
//! - Every fetched trait appears exactly once, even with no evidence.
//! - Linked evidence never also appears in the unassigned pool.
//! - Orphaned links and incomplete rows are skipped, never fatal.
//! - Any fetch failure yields the empty board, never a partial one.

use crate::board::BoardSnapshot;
use crate::model::evidence::EvidenceItem;
use crate::model::traits::Trait;
use crate::repo::{BoardRepository, RepoResult};
use log::{error, info, warn};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// Loads the whole board, falling back to an empty board on any failure.
pub fn load_board<R: BoardRepository + ?Sized>(repo: &R) -> BoardSnapshot {
    let started_at = Instant::now();
    match try_load_board(repo) {
        Ok(board) => {
            info!(
                "event=board_load module=service status=ok unassigned={} traits={} duration_ms={}",
                board.unassigned.len(),
                board.traits.len(),
                started_at.elapsed().as_millis()
            );
            board
        }
        Err(err) => {
            error!(
                "event=board_load module=service status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            BoardSnapshot::default()
        }
    }
}

/// Loads the whole board, propagating the first fetch failure.
pub fn try_load_board<R: BoardRepository + ?Sized>(repo: &R) -> RepoResult<BoardSnapshot> {
    let evidence_rows = repo.list_evidence()?;
    let trait_rows = repo.list_traits()?;

    let mut evidence: Vec<EvidenceItem> = Vec::with_capacity(evidence_rows.len());
    for row in evidence_rows {
        let row_id = row.id.clone();
        match row.into_item() {
            Some(item) => evidence.push(item),
            None => warn!(
                "event=board_load module=service status=skip reason=incomplete_evidence evidence_id={row_id}"
            ),
        }
    }

    if trait_rows.is_empty() {
        return Ok(BoardSnapshot::new(evidence, Vec::new()));
    }

    let trait_ids: Vec<String> = trait_rows.iter().map(|row| row.id.clone()).collect();
    let links = repo.list_links(&trait_ids)?;

    let mut grouped: HashMap<String, Vec<EvidenceItem>> = HashMap::new();
    let mut assigned: HashSet<String> = HashSet::new();
    for link in links {
        assigned.insert(link.evidence_id.clone());
        let Some(row) = link.evidence else {
            warn!(
                "event=board_load module=service status=skip reason=orphaned_link trait_id={} evidence_id={}",
                link.trait_id, link.evidence_id
            );
            continue;
        };
        match row.into_item() {
            Some(item) => grouped.entry(link.trait_id).or_default().push(item),
            None => warn!(
                "event=board_load module=service status=skip reason=incomplete_linked_evidence trait_id={} evidence_id={}",
                link.trait_id, link.evidence_id
            ),
        }
    }

    let traits = trait_rows
        .into_iter()
        .map(|row| Trait {
            evidence: grouped.remove(&row.id).unwrap_or_default(),
            name: row.name.unwrap_or_default(),
            id: row.id,
        })
        .collect();

    let unassigned = evidence
        .into_iter()
        .filter(|item| !assigned.contains(&item.id))
        .collect();

    Ok(BoardSnapshot::new(unassigned, traits))
}
