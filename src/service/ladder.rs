//! Ladder operations as seen by a logged-in club member
//!
//! This is the boundary the front-end talks to. It checks the caller's
//! `Session`, validates names, delegates rating work to the `RatingEngine`
//! and logs what happened. Every logged-in member may view standings and
//! record results; removing ranked players is reserved for admins.

use crate::account::Session;
use crate::error::{LadderError, Result};
use crate::rating::engine::{MatchPreview, RatingEngine};
use crate::rating::snapshot::RankingSnapshot;
use crate::rating::storage::PlayerStore;
use crate::types::{MatchReport, MatchResult, PlayerRecord, RatingChange};
use crate::utils::normalize_name;
use std::sync::Arc;
use tracing::{info, warn};

pub struct LadderService {
    engine: RatingEngine,
    players: Arc<dyn PlayerStore>,
}

impl LadderService {
    pub fn new(engine: RatingEngine, players: Arc<dyn PlayerStore>) -> Self {
        Self { engine, players }
    }

    /// Current standings
    pub fn standings(&self, _session: &Session) -> Result<RankingSnapshot> {
        self.engine.build_ranking_snapshot(self.players.as_ref())
    }

    /// Add a ranked player on the starting points
    pub fn add_player(&self, session: &Session, name: &str) -> Result<PlayerRecord> {
        let record = self.engine.new_player(self.validate_new_name(name)?);
        self.players.upsert(record.clone())?;

        info!("'{}' added player '{}'", session.user_id(), record.name);
        Ok(record)
    }

    /// Add a guest, listed apart from the ranked ladder
    pub fn add_guest(&self, session: &Session, name: &str) -> Result<PlayerRecord> {
        let record = self.engine.new_guest(self.validate_new_name(name)?);
        self.players.upsert(record.clone())?;

        info!("'{}' added guest '{}'", session.user_id(), record.name);
        Ok(record)
    }

    /// Remove a guest; ranked players are left alone
    pub fn delete_guest(&self, session: &Session, name: &str) -> Result<PlayerRecord> {
        let record = self.fetch(name)?;
        if !record.guest {
            return Err(LadderError::InvalidPlayerName {
                reason: format!("'{}' is not a guest", name),
            }
            .into());
        }

        self.players.delete(name)?;
        info!("'{}' deleted guest '{}'", session.user_id(), name);
        Ok(record)
    }

    /// Remove any player, ranked or guest
    pub fn delete_player(&self, session: &Session, name: &str) -> Result<PlayerRecord> {
        session.require_admin("delete ranked players")?;

        let record = self.fetch(name)?;
        self.players.delete(name)?;

        warn!(
            "'{}' deleted player '{}' ({} points, {} matches)",
            session.user_id(),
            name,
            record.ranking_points,
            record.matches_played()
        );
        Ok(record)
    }

    /// Apply a singles or doubles result
    pub fn submit_match(&self, session: &Session, result: &MatchResult) -> Result<MatchReport> {
        let report = match self.engine.apply_match(self.players.as_ref(), result) {
            Ok(report) => report,
            Err(e) => {
                warn!("'{}' submitted a rejected match: {}", session.user_id(), e);
                return Err(e);
            }
        };

        info!(
            "'{}' recorded {} ({}): {}",
            session.user_id(),
            result.participants().join(" / "),
            result.outcome(),
            summarize(&report.rating_changes)
        );
        Ok(report)
    }

    /// Record a championship title for a player
    pub fn record_championship(&self, session: &Session, name: &str) -> Result<RatingChange> {
        let change = self.engine.apply_championship(self.players.as_ref(), name)?;

        info!(
            "'{}' recorded a championship for '{}' ({} -> {})",
            session.user_id(),
            name,
            change.old_points,
            change.new_points
        );
        Ok(change)
    }

    /// What a singles match between two players would do
    pub fn preview_singles(&self, _session: &Session, a: &str, b: &str) -> Result<MatchPreview> {
        self.engine.preview_singles(self.players.as_ref(), a, b)
    }

    fn validate_new_name(&self, name: &str) -> Result<String> {
        let name = normalize_name(name).ok_or_else(|| LadderError::InvalidPlayerName {
            reason: "player name cannot be empty".to_string(),
        })?;

        if self.players.get(&name)?.is_some() {
            return Err(LadderError::DuplicatePlayer { player: name }.into());
        }

        Ok(name)
    }

    fn fetch(&self, name: &str) -> Result<PlayerRecord> {
        self.players.get(name)?.ok_or_else(|| {
            LadderError::PlayerNotFound {
                player: name.to_string(),
            }
            .into()
        })
    }
}

fn summarize(changes: &[RatingChange]) -> String {
    if changes.is_empty() {
        return "no rating change".to_string();
    }

    changes
        .iter()
        .map(|c| format!("{} {:+}", c.player, c.delta()))
        .collect::<Vec<_>>()
        .join(", ")
}
