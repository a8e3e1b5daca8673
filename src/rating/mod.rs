//! Elo rating engine for the club ladder
//!
//! This module provides the Elo formulas, the score-update transactions that
//! apply match results to stored players, the player storage interface, and
//! the display ordering of the ladder.

pub mod elo;
pub mod engine;
pub mod snapshot;
pub mod storage;

// Re-export commonly used types
pub use elo::{compute_elo_doubles, compute_elo_singles, K_FACTOR};
pub use engine::{MatchPreview, RatingEngine};
pub use snapshot::{RankLabel, RankingSnapshot, SnapshotEntry};
pub use storage::{InMemoryPlayerStore, PlayerStore};
