//! Score-update transactions applied to player records
//!
//! The engine reads the players a match names, computes their new points with
//! the formulas in `rating::elo`, bumps their counters and writes them back in
//! a single `upsert_many`. All validation happens before anything is written,
//! so a rejected match leaves the store untouched.

use crate::config::{DrawPolicy, RatingConfig};
use crate::error::{LadderError, Result};
use crate::rating::elo;
use crate::rating::snapshot::RankingSnapshot;
use crate::rating::storage::PlayerStore;
use crate::types::{MatchOutcome, MatchReport, MatchResult, PlayerName, PlayerRecord, RatingChange};
use serde::{Deserialize, Serialize};
use skillratings::elo::{expected_score, EloRating};
use std::collections::HashSet;
use tracing::debug;

/// What each possible singles result would do, without applying it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPreview {
    pub player_a: PlayerName,
    pub player_b: PlayerName,
    pub a_win_probability: f64,
    pub b_win_probability: f64,
    /// `(a_points, b_points)` if A wins
    pub if_a_wins: (i64, i64),
    /// `(a_points, b_points)` if B wins
    pub if_b_wins: (i64, i64),
}

/// Applies match results and championships to a player store
#[derive(Debug, Clone, Default)]
pub struct RatingEngine {
    config: RatingConfig,
}

impl RatingEngine {
    /// Create a new engine, rejecting invalid configuration
    pub fn new(config: RatingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// A fresh ranked player on the configured starting points
    pub fn new_player(&self, name: impl Into<PlayerName>) -> PlayerRecord {
        PlayerRecord::new(name, self.config.initial_points)
    }

    /// A fresh guest player on the configured starting points
    pub fn new_guest(&self, name: impl Into<PlayerName>) -> PlayerRecord {
        PlayerRecord::new_guest(name, self.config.initial_points)
    }

    /// Apply any submitted match result
    pub fn apply_match(&self, store: &dyn PlayerStore, result: &MatchResult) -> Result<MatchReport> {
        result.validate()?;

        let rating_changes = match result {
            MatchResult::Singles {
                player_a,
                player_b,
                outcome,
            } => match outcome {
                MatchOutcome::AWins => self.apply_singles_result(store, player_a, player_b)?,
                MatchOutcome::BWins => self.apply_singles_result(store, player_b, player_a)?,
                MatchOutcome::Draw => self.apply_singles_draw(store, player_a, player_b)?,
            },
            MatchResult::Doubles {
                team_a,
                team_b,
                outcome,
            } => {
                let a = (team_a.0.as_str(), team_a.1.as_str());
                let b = (team_b.0.as_str(), team_b.1.as_str());
                match outcome {
                    MatchOutcome::AWins => self.apply_doubles_result(store, a, b)?,
                    MatchOutcome::BWins => self.apply_doubles_result(store, b, a)?,
                    MatchOutcome::Draw => self.apply_doubles_draw(store, a, b)?,
                }
            }
        };

        Ok(MatchReport {
            result: result.clone(),
            rating_changes,
        })
    }

    /// Record a singles win for `winner` over `loser`
    pub fn apply_singles_result(
        &self,
        store: &dyn PlayerStore,
        winner: &str,
        loser: &str,
    ) -> Result<Vec<RatingChange>> {
        if winner == loser {
            return Err(LadderError::InvalidMatch {
                reason: "a player cannot play against themselves".to_string(),
            }
            .into());
        }

        let mut winner_record = fetch(store, winner)?;
        let mut loser_record = fetch(store, loser)?;

        let (new_winner, new_loser) = elo::compute_elo_singles_with_k(
            self.config.k_factor,
            winner_record.ranking_points,
            loser_record.ranking_points,
        );

        winner_record.wins = bump(winner_record.wins, winner, "wins")?;
        loser_record.losses = bump(loser_record.losses, loser, "losses")?;

        let changes = vec![
            set_points(&mut winner_record, new_winner),
            set_points(&mut loser_record, new_loser),
        ];

        debug!("Singles: {} beat {} -> {:?}", winner, loser, changes);
        store.upsert_many(vec![winner_record, loser_record])?;

        Ok(changes)
    }

    /// Record a doubles win for `winner_team` over `loser_team`
    pub fn apply_doubles_result(
        &self,
        store: &dyn PlayerStore,
        winner_team: (&str, &str),
        loser_team: (&str, &str),
    ) -> Result<Vec<RatingChange>> {
        ensure_four_players(winner_team, loser_team)?;

        let mut winners = [fetch(store, winner_team.0)?, fetch(store, winner_team.1)?];
        let mut losers = [fetch(store, loser_team.0)?, fetch(store, loser_team.1)?];

        let (new_winners, new_losers) = elo::compute_elo_doubles_with_k(
            self.config.k_factor,
            (winners[0].ranking_points, winners[1].ranking_points),
            (losers[0].ranking_points, losers[1].ranking_points),
        );

        for winner in winners.iter_mut() {
            winner.wins = bump(winner.wins, &winner.name, "wins")?;
        }
        for loser in losers.iter_mut() {
            loser.losses = bump(loser.losses, &loser.name, "losses")?;
        }

        let changes = vec![
            set_points(&mut winners[0], new_winners.0),
            set_points(&mut winners[1], new_winners.1),
            set_points(&mut losers[0], new_losers.0),
            set_points(&mut losers[1], new_losers.1),
        ];

        debug!(
            "Doubles: {}/{} beat {}/{} -> {:?}",
            winner_team.0, winner_team.1, loser_team.0, loser_team.1, changes
        );
        store.upsert_many(winners.into_iter().chain(losers).collect())?;

        Ok(changes)
    }

    /// Add a championship title and the configured bonus
    pub fn apply_championship(&self, store: &dyn PlayerStore, player: &str) -> Result<RatingChange> {
        let mut record = fetch(store, player)?;

        record.championships = bump(record.championships, player, "championships")?;
        let new_points = record.ranking_points + self.config.championship_bonus;
        let change = set_points(&mut record, new_points);

        debug!("Championship for {} -> {:?}", player, change);
        store.upsert(record)?;

        Ok(change)
    }

    /// Current display ordering of the ladder
    pub fn build_ranking_snapshot(&self, store: &dyn PlayerStore) -> Result<RankingSnapshot> {
        Ok(RankingSnapshot::from_players(store.get_all()?))
    }

    /// Win probabilities and resulting points for both singles outcomes
    pub fn preview_singles(
        &self,
        store: &dyn PlayerStore,
        player_a: &str,
        player_b: &str,
    ) -> Result<MatchPreview> {
        if player_a == player_b {
            return Err(LadderError::InvalidMatch {
                reason: "a player cannot play against themselves".to_string(),
            }
            .into());
        }

        let a = fetch(store, player_a)?;
        let b = fetch(store, player_b)?;
        let (a_win_probability, b_win_probability) =
            expected_score(&EloRating::from(&a), &EloRating::from(&b));

        let k = self.config.k_factor;
        let if_a_wins = elo::compute_elo_singles_with_k(k, a.ranking_points, b.ranking_points);
        let (b_after, a_after) = elo::compute_elo_singles_with_k(k, b.ranking_points, a.ranking_points);

        Ok(MatchPreview {
            player_a: a.name,
            player_b: b.name,
            a_win_probability,
            b_win_probability,
            if_a_wins,
            if_b_wins: (a_after, b_after),
        })
    }

    fn apply_singles_draw(
        &self,
        store: &dyn PlayerStore,
        player_a: &str,
        player_b: &str,
    ) -> Result<Vec<RatingChange>> {
        let mut a = fetch(store, player_a)?;
        let mut b = fetch(store, player_b)?;

        if self.config.draw_policy == DrawPolicy::Ignore {
            debug!("Ignoring draw between {} and {}", player_a, player_b);
            return Ok(Vec::new());
        }

        let (new_a, new_b) =
            elo::compute_elo_singles_draw_with_k(self.config.k_factor, a.ranking_points, b.ranking_points);

        a.draws = bump(a.draws, player_a, "draws")?;
        b.draws = bump(b.draws, player_b, "draws")?;

        let changes = vec![set_points(&mut a, new_a), set_points(&mut b, new_b)];
        store.upsert_many(vec![a, b])?;

        Ok(changes)
    }

    fn apply_doubles_draw(
        &self,
        store: &dyn PlayerStore,
        team_a: (&str, &str),
        team_b: (&str, &str),
    ) -> Result<Vec<RatingChange>> {
        ensure_four_players(team_a, team_b)?;

        let mut side_a = [fetch(store, team_a.0)?, fetch(store, team_a.1)?];
        let mut side_b = [fetch(store, team_b.0)?, fetch(store, team_b.1)?];

        if self.config.draw_policy == DrawPolicy::Ignore {
            debug!(
                "Ignoring draw between {}/{} and {}/{}",
                team_a.0, team_a.1, team_b.0, team_b.1
            );
            return Ok(Vec::new());
        }

        let (new_a, new_b) = elo::compute_elo_doubles_draw_with_k(
            self.config.k_factor,
            (side_a[0].ranking_points, side_a[1].ranking_points),
            (side_b[0].ranking_points, side_b[1].ranking_points),
        );

        for player in side_a.iter_mut().chain(side_b.iter_mut()) {
            player.draws = bump(player.draws, &player.name, "draws")?;
        }

        let changes = vec![
            set_points(&mut side_a[0], new_a.0),
            set_points(&mut side_a[1], new_a.1),
            set_points(&mut side_b[0], new_b.0),
            set_points(&mut side_b[1], new_b.1),
        ];
        store.upsert_many(side_a.into_iter().chain(side_b).collect())?;

        Ok(changes)
    }
}

fn fetch(store: &dyn PlayerStore, name: &str) -> Result<PlayerRecord> {
    store.get(name)?.ok_or_else(|| {
        LadderError::PlayerNotFound {
            player: name.to_string(),
        }
        .into()
    })
}

/// Increment a match counter, refusing to wrap
fn bump(counter: u32, player: &str, what: &str) -> Result<u32> {
    counter.checked_add(1).ok_or_else(|| {
        LadderError::Storage {
            message: format!("{} counter for '{}' is at its maximum", what, player),
        }
        .into()
    })
}

fn set_points(record: &mut PlayerRecord, new_points: i64) -> RatingChange {
    let change = RatingChange {
        player: record.name.clone(),
        old_points: record.ranking_points,
        new_points,
    };
    record.ranking_points = new_points;
    change
}

fn ensure_four_players(team_a: (&str, &str), team_b: (&str, &str)) -> Result<()> {
    let names: HashSet<&str> = [team_a.0, team_a.1, team_b.0, team_b.1].into_iter().collect();
    if names.len() != 4 {
        return Err(LadderError::InvalidMatch {
            reason: "a doubles match needs four different players".to_string(),
        }
        .into());
    }
    Ok(())
}
