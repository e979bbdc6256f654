//! Identifier generation.
//!
//! Ids are `<kind>-<uuid v4>` so the kind is visible in logs and storage.

use uuid::Uuid;

/// Entity kind encoded as the id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Evidence,
    Trait,
}

impl IdKind {
    fn prefix(self) -> &'static str {
        match self {
            Self::Evidence => "evidence",
            Self::Trait => "trait",
        }
    }
}

/// Generates a new stable id for the given entity kind.
pub fn new_id(kind: IdKind) -> String {
    format!("{}-{}", kind.prefix(), Uuid::new_v4())
}
