//! Service layer for the club ladder
//!
//! This module contains the session-aware ladder service that front-ends call
//! into.

pub mod ladder;

pub use ladder::LadderService;
