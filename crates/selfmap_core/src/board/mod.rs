//! Client-side board state.
//!
//! # Responsibility
//! - Hold the unassigned pool and the trait list as one immutable snapshot.
//! - Express every user mutation as a pure snapshot-to-snapshot transform.
//! - Record mutations so they can be replayed over a confirmed snapshot.
//!
//! # Invariants
//! - Every evidence id appears at most once across the pool and all traits.
//! - Transforms never modify their input snapshot.

mod mutation;
mod snapshot;

pub use mutation::{replay, BoardMutation, MutationKind};
pub use snapshot::{BoardError, BoardSnapshot, EvidenceLocation};
