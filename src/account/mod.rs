//! Club accounts with approval gating
//!
//! This module provides account storage, the sign-up/approval/login flow and
//! the `Session` object the ladder service takes in place of global state.

pub mod directory;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use directory::AccountDirectory;
pub use session::Session;
pub use store::{AccountStore, InMemoryAccountStore};
