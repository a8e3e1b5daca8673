//! Player storage interface and implementations
//!
//! This module defines the interface the engine uses to read and persist
//! player records, plus an in-memory implementation. File-backed stores live
//! in `crate::persistence`.

use crate::error::{LadderError, Result};
use crate::types::PlayerRecord;
use std::sync::RwLock;

/// Trait for player record storage operations
#[cfg_attr(test, mockall::automock)]
pub trait PlayerStore: Send + Sync {
    /// All players, in insertion order
    fn get_all(&self) -> Result<Vec<PlayerRecord>>;

    /// Look a player up by exact (case-sensitive) name
    fn get(&self, name: &str) -> Result<Option<PlayerRecord>>;

    /// Replace the record with the same name in place, or append it
    fn upsert(&self, record: PlayerRecord) -> Result<()>;

    /// Write several records as one unit
    fn upsert_many(&self, records: Vec<PlayerRecord>) -> Result<()>;

    /// Remove a player; returns whether anything was removed
    fn delete(&self, name: &str) -> Result<bool>;
}

/// Insert-or-replace while keeping the position of existing records
pub(crate) fn upsert_into(players: &mut Vec<PlayerRecord>, record: PlayerRecord) {
    match players.iter_mut().find(|p| p.name == record.name) {
        Some(existing) => *existing = record,
        None => players.push(record),
    }
}

/// In-memory player storage implementation
#[derive(Debug, Default)]
pub struct InMemoryPlayerStore {
    players: RwLock<Vec<PlayerRecord>>,
}

impl InMemoryPlayerStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with records, keeping their order
    pub fn with_players(players: Vec<PlayerRecord>) -> Self {
        Self {
            players: RwLock::new(players),
        }
    }

    fn read_lock(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<PlayerRecord>>> {
        self.players.read().map_err(|_| {
            LadderError::Storage {
                message: "Failed to acquire players read lock".to_string(),
            }
            .into()
        })
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<PlayerRecord>>> {
        self.players.write().map_err(|_| {
            LadderError::Storage {
                message: "Failed to acquire players write lock".to_string(),
            }
            .into()
        })
    }
}

impl PlayerStore for InMemoryPlayerStore {
    fn get_all(&self) -> Result<Vec<PlayerRecord>> {
        Ok(self.read_lock()?.clone())
    }

    fn get(&self, name: &str) -> Result<Option<PlayerRecord>> {
        Ok(self.read_lock()?.iter().find(|p| p.name == name).cloned())
    }

    fn upsert(&self, record: PlayerRecord) -> Result<()> {
        let mut players = self.write_lock()?;
        upsert_into(&mut players, record);
        Ok(())
    }

    fn upsert_many(&self, records: Vec<PlayerRecord>) -> Result<()> {
        let mut players = self.write_lock()?;
        for record in records {
            upsert_into(&mut players, record);
        }
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let mut players = self.write_lock()?;
        let before = players.len();
        players.retain(|p| p.name != name);
        Ok(players.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_store_basic_operations() {
        let store = InMemoryPlayerStore::new();

        // Initially empty
        assert!(store.get("Kim").unwrap().is_none());
        assert!(store.get_all().unwrap().is_empty());

        store.upsert(PlayerRecord::new("Kim", 1000)).unwrap();

        let retrieved = store.get("Kim").unwrap().unwrap();
        assert_eq!(retrieved.name, "Kim");
        assert_eq!(retrieved.ranking_points, 1000);

        // Lookups are case-sensitive
        assert!(store.get("kim").unwrap().is_none());
    }

    #[test]
    fn test_upsert_keeps_position() {
        let store = InMemoryPlayerStore::with_players(vec![
            PlayerRecord::new("A", 1000),
            PlayerRecord::new("B", 1000),
            PlayerRecord::new("C", 1000),
        ]);

        let mut updated = store.get("A").unwrap().unwrap();
        updated.ranking_points = 1100;
        store.upsert(updated).unwrap();

        let names: Vec<String> = store.get_all().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(store.get("A").unwrap().unwrap().ranking_points, 1100);
    }

    #[test]
    fn test_bulk_upsert() {
        let store = InMemoryPlayerStore::with_players(vec![PlayerRecord::new("A", 1000)]);

        store
            .upsert_many(vec![PlayerRecord::new("A", 1016), PlayerRecord::new("B", 984)])
            .unwrap();

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].ranking_points, 1016);
        assert_eq!(all[1].name, "B");
    }

    #[test]
    fn test_player_removal() {
        let store = InMemoryPlayerStore::new();
        store.upsert(PlayerRecord::new_guest("Visitor", 1000)).unwrap();

        assert!(store.delete("Visitor").unwrap());
        assert!(store.get("Visitor").unwrap().is_none());

        // Removing a missing player reports false
        assert!(!store.delete("Nobody").unwrap());
    }
}
