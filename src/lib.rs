//! Club Ladder - Elo ranking ladder for a small tennis club
//!
//! This crate provides the rating engine (singles and doubles Elo with
//! truncating integer points), approval-gated club accounts, CSV-backed
//! storage and the renderers used to display the standings.

pub mod account;
pub mod config;
pub mod display;
pub mod error;
pub mod persistence;
pub mod rating;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{LadderError, Result};
pub use types::*;

// Re-export key components
pub use account::{AccountDirectory, Session};
pub use rating::{PlayerStore, RankingSnapshot, RatingEngine};
pub use service::LadderService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
