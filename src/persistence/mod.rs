//! File-backed stores for players and accounts
//!
//! Both tables are plain CSV files with a header line, read once on open and
//! rewritten after every change.

pub mod accounts;
pub mod players;
pub mod table;

pub use accounts::CsvAccountStore;
pub use players::CsvPlayerStore;
