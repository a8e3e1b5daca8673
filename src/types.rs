//! Common types used throughout the ranking ladder

use crate::error::{LadderError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillratings::elo::EloRating;
use std::collections::HashSet;
use std::fmt;

/// Unique, case-sensitive player name
pub type PlayerName = String;

/// Unique account identifier used to log in
pub type UserId = String;

/// Ranking points every new player starts with
pub const DEFAULT_RANKING_POINTS: i64 = 1000;

/// A player on the ladder together with their counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: PlayerName,
    pub ranking_points: i64,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub championships: u32,
    pub guest: bool,
}

impl PlayerRecord {
    /// Create a ranked (non-guest) player with zeroed counters
    pub fn new(name: impl Into<PlayerName>, ranking_points: i64) -> Self {
        Self {
            name: name.into(),
            ranking_points,
            wins: 0,
            losses: 0,
            draws: 0,
            championships: 0,
            guest: false,
        }
    }

    /// Create a guest player with zeroed counters
    pub fn new_guest(name: impl Into<PlayerName>, ranking_points: i64) -> Self {
        Self {
            guest: true,
            ..Self::new(name, ranking_points)
        }
    }

    /// Total number of matches this player has taken part in
    pub fn matches_played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}

impl From<&PlayerRecord> for EloRating {
    fn from(record: &PlayerRecord) -> Self {
        Self {
            rating: record.ranking_points as f64,
        }
    }
}

/// Outcome of a match from side A's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    AWins,
    BWins,
    Draw,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::AWins => write!(f, "A wins"),
            MatchOutcome::BWins => write!(f, "B wins"),
            MatchOutcome::Draw => write!(f, "draw"),
        }
    }
}

/// A submitted match result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchResult {
    Singles {
        player_a: PlayerName,
        player_b: PlayerName,
        outcome: MatchOutcome,
    },
    Doubles {
        team_a: (PlayerName, PlayerName),
        team_b: (PlayerName, PlayerName),
        outcome: MatchOutcome,
    },
}

impl MatchResult {
    pub fn singles(
        player_a: impl Into<PlayerName>,
        player_b: impl Into<PlayerName>,
        outcome: MatchOutcome,
    ) -> Self {
        MatchResult::Singles {
            player_a: player_a.into(),
            player_b: player_b.into(),
            outcome,
        }
    }

    pub fn doubles(
        team_a: (impl Into<PlayerName>, impl Into<PlayerName>),
        team_b: (impl Into<PlayerName>, impl Into<PlayerName>),
        outcome: MatchOutcome,
    ) -> Self {
        MatchResult::Doubles {
            team_a: (team_a.0.into(), team_a.1.into()),
            team_b: (team_b.0.into(), team_b.1.into()),
            outcome,
        }
    }

    pub fn outcome(&self) -> MatchOutcome {
        match self {
            MatchResult::Singles { outcome, .. } | MatchResult::Doubles { outcome, .. } => *outcome,
        }
    }

    /// Every player named in the match, side A first
    pub fn participants(&self) -> Vec<&str> {
        match self {
            MatchResult::Singles {
                player_a, player_b, ..
            } => vec![player_a.as_str(), player_b.as_str()],
            MatchResult::Doubles { team_a, team_b, .. } => vec![
                team_a.0.as_str(),
                team_a.1.as_str(),
                team_b.0.as_str(),
                team_b.1.as_str(),
            ],
        }
    }

    /// Reject matches that name the same player more than once
    pub fn validate(&self) -> Result<()> {
        let participants = self.participants();
        let distinct: HashSet<&str> = participants.iter().copied().collect();

        if distinct.len() != participants.len() {
            let reason = match self {
                MatchResult::Singles { .. } => "a player cannot play against themselves",
                MatchResult::Doubles { .. } => "a doubles match needs four different players",
            };
            return Err(LadderError::InvalidMatch {
                reason: reason.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Points change for one player after an engine operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingChange {
    pub player: PlayerName,
    pub old_points: i64,
    pub new_points: i64,
}

impl RatingChange {
    pub fn delta(&self) -> i64 {
        self.new_points - self.old_points
    }
}

/// What an applied match did to the ladder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub result: MatchResult,
    /// Empty when the match changed no ratings (an ignored draw)
    pub rating_changes: Vec<RatingChange>,
}

/// Account role, mirroring what the club admin can assign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Guest,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
            Role::Guest => write!(f, "guest"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = LadderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            "guest" => Ok(Role::Guest),
            other => Err(LadderError::InvalidAccount {
                reason: format!("unknown role '{}'", other),
            }),
        }
    }
}

/// A registered club account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_defaults() {
        let player = PlayerRecord::new("Kim", DEFAULT_RANKING_POINTS);
        assert_eq!(player.ranking_points, 1000);
        assert_eq!(player.matches_played(), 0);
        assert_eq!(player.championships, 0);
        assert!(!player.guest);

        let guest = PlayerRecord::new_guest("Visitor", DEFAULT_RANKING_POINTS);
        assert!(guest.guest);
        assert_eq!(guest.ranking_points, 1000);
    }

    #[test]
    fn test_singles_validation() {
        assert!(MatchResult::singles("A", "B", MatchOutcome::AWins)
            .validate()
            .is_ok());

        let err = MatchResult::singles("A", "A", MatchOutcome::Draw)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LadderError>(),
            Some(LadderError::InvalidMatch { .. })
        ));
    }

    #[test]
    fn test_doubles_validation() {
        assert!(MatchResult::doubles(("A", "B"), ("C", "D"), MatchOutcome::BWins)
            .validate()
            .is_ok());

        // Repeated across teams
        assert!(MatchResult::doubles(("A", "B"), ("A", "C"), MatchOutcome::AWins)
            .validate()
            .is_err());

        // Repeated within a team
        assert!(MatchResult::doubles(("A", "A"), ("B", "C"), MatchOutcome::AWins)
            .validate()
            .is_err());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!(MatchResult::singles("kim", "Kim", MatchOutcome::AWins)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert_eq!("guest".parse::<Role>().unwrap(), Role::Guest);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_match_result_json_shape() {
        let result = MatchResult::singles("A", "B", MatchOutcome::AWins);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "singles");
        assert_eq!(json["outcome"], "a_wins");
    }
}
