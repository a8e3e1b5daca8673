//! Rating system configuration

use crate::error::{LadderError, Result};
use crate::rating::elo::K_FACTOR;
use crate::types::DEFAULT_RANKING_POINTS;
use serde::{Deserialize, Serialize};

/// How a drawn match affects the ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawPolicy {
    /// Draws are accepted but change nothing, not even the draw counter
    #[default]
    Ignore,
    /// Draws count for both sides and move points with an actual score of 0.5
    Score,
}

impl std::str::FromStr for DrawPolicy {
    type Err = LadderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(DrawPolicy::Ignore),
            "score" => Ok(DrawPolicy::Score),
            other => Err(LadderError::Configuration {
                message: format!("Invalid draw policy: {}", other),
            }),
        }
    }
}

/// Parameters of the ladder's rating rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub k_factor: f64,
    pub initial_points: i64,
    pub championship_bonus: i64,
    pub draw_policy: DrawPolicy,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_factor: K_FACTOR,
            initial_points: DEFAULT_RANKING_POINTS,
            championship_bonus: 50,
            draw_policy: DrawPolicy::Ignore,
        }
    }
}

impl RatingConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(LadderError::Configuration {
                message: "K-factor must be a positive number".to_string(),
            }
            .into());
        }

        if self.championship_bonus < 0 {
            return Err(LadderError::Configuration {
                message: "Championship bonus cannot be negative".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_config_default() {
        let config = RatingConfig::default();
        assert_eq!(config.k_factor, 32.0);
        assert_eq!(config.initial_points, 1000);
        assert_eq!(config.championship_bonus, 50);
        assert_eq!(config.draw_policy, DrawPolicy::Ignore);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rating_config_validation() {
        let mut config = RatingConfig::default();

        config.k_factor = 0.0;
        assert!(config.validate().is_err());

        config = RatingConfig::default();
        config.k_factor = f64::NAN;
        assert!(config.validate().is_err());

        config = RatingConfig::default();
        config.championship_bonus = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_draw_policy_parsing() {
        assert_eq!("ignore".parse::<DrawPolicy>().unwrap(), DrawPolicy::Ignore);
        assert_eq!("Score".parse::<DrawPolicy>().unwrap(), DrawPolicy::Score);
        assert!("split".parse::<DrawPolicy>().is_err());
    }
}
