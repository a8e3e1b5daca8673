//! Player table kept in a CSV file
//!
//! The file uses the same columns as the club's original spreadsheet. It is
//! rewritten after every mutation; the in-memory copy only changes once the
//! write has succeeded.

use crate::error::{LadderError, Result};
use crate::persistence::table::{deserialize_flag, load_table, save_table};
use crate::rating::storage::{upsert_into, PlayerStore};
use crate::types::PlayerRecord;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlayerRow {
    #[serde(rename = "Player")]
    player: String,
    #[serde(rename = "Ranking Points")]
    ranking_points: i64,
    #[serde(rename = "Wins")]
    wins: u32,
    #[serde(rename = "Losses")]
    losses: u32,
    #[serde(rename = "Draws")]
    draws: u32,
    #[serde(rename = "Championships")]
    championships: u32,
    #[serde(rename = "Guest", default, deserialize_with = "deserialize_flag")]
    guest: bool,
}

impl From<PlayerRow> for PlayerRecord {
    fn from(row: PlayerRow) -> Self {
        Self {
            name: row.player,
            ranking_points: row.ranking_points,
            wins: row.wins,
            losses: row.losses,
            draws: row.draws,
            championships: row.championships,
            guest: row.guest,
        }
    }
}

impl From<&PlayerRecord> for PlayerRow {
    fn from(record: &PlayerRecord) -> Self {
        Self {
            player: record.name.clone(),
            ranking_points: record.ranking_points,
            wins: record.wins,
            losses: record.losses,
            draws: record.draws,
            championships: record.championships,
            guest: record.guest,
        }
    }
}

/// File-backed player storage
#[derive(Debug)]
pub struct CsvPlayerStore {
    path: PathBuf,
    players: RwLock<Vec<PlayerRecord>>,
}

impl CsvPlayerStore {
    /// Open the player table, starting empty when the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let rows: Vec<PlayerRow> = load_table(&path)?;
        let players: Vec<PlayerRecord> = rows.into_iter().map(PlayerRecord::from).collect();

        info!("Loaded {} players from {}", players.len(), path.display());
        Ok(Self {
            path,
            players: RwLock::new(players),
        })
    }

    /// Apply a change to a copy, persist it, then swap it in
    fn mutate<T>(&self, change: impl FnOnce(&mut Vec<PlayerRecord>) -> T) -> Result<T> {
        let mut players = self.players.write().map_err(|_| LadderError::Storage {
            message: "Failed to acquire players write lock".to_string(),
        })?;

        let mut updated = players.clone();
        let outcome = change(&mut updated);

        let rows: Vec<PlayerRow> = updated.iter().map(PlayerRow::from).collect();
        save_table(&self.path, &rows)?;
        debug!("Saved {} players to {}", rows.len(), self.path.display());

        *players = updated;
        Ok(outcome)
    }
}

impl PlayerStore for CsvPlayerStore {
    fn get_all(&self) -> Result<Vec<PlayerRecord>> {
        let players = self.players.read().map_err(|_| LadderError::Storage {
            message: "Failed to acquire players read lock".to_string(),
        })?;

        Ok(players.clone())
    }

    fn get(&self, name: &str) -> Result<Option<PlayerRecord>> {
        let players = self.players.read().map_err(|_| LadderError::Storage {
            message: "Failed to acquire players read lock".to_string(),
        })?;

        Ok(players.iter().find(|p| p.name == name).cloned())
    }

    fn upsert(&self, record: PlayerRecord) -> Result<()> {
        self.mutate(|players| upsert_into(players, record))
    }

    fn upsert_many(&self, records: Vec<PlayerRecord>) -> Result<()> {
        self.mutate(|players| {
            for record in records {
                upsert_into(players, record);
            }
        })
    }

    fn delete(&self, name: &str) -> Result<bool> {
        self.mutate(|players| {
            let before = players.len();
            players.retain(|p| p.name != name);
            players.len() != before
        })
    }
}
