//! Board use-case services.
//!
//! # Responsibility
//! - Rebuild the board from storage at startup.
//! - Apply user mutations optimistically and reconcile them with storage.
//! - Keep UI callers decoupled from repository and worker details.

pub mod board_service;
pub mod loader;
