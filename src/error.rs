//! Error types for the ranking ladder
//!
//! This module defines the error taxonomy used throughout the crate. Results
//! are carried as `anyhow::Result` and callers recover the specific variant
//! with `downcast_ref::<LadderError>()`.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific ladder scenarios
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LadderError {
    #[error("Invalid match: {reason}")]
    InvalidMatch { reason: String },

    #[error("Player not found: {player}")]
    PlayerNotFound { player: String },

    #[error("Player already exists: {player}")]
    DuplicatePlayer { player: String },

    #[error("Invalid player name: {reason}")]
    InvalidPlayerName { reason: String },

    #[error("Account not found: {user_id}")]
    AccountNotFound { user_id: String },

    #[error("Account already exists: {user_id}")]
    DuplicateAccount { user_id: String },

    #[error("Invalid account: {reason}")]
    InvalidAccount { reason: String },

    #[error("Invalid user id or password")]
    AuthenticationFailed,

    #[error("Not authorized to {action}")]
    Unauthorized { action: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl LadderError {
    /// Recover a `LadderError` from an `anyhow::Error`, if it is one
    pub fn from_anyhow(error: &anyhow::Error) -> Option<&LadderError> {
        error.downcast_ref::<LadderError>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LadderError::InvalidMatch {
            reason: "a player cannot play against themselves".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid match: a player cannot play against themselves"
        );

        let err = LadderError::PlayerNotFound {
            player: "Kim".to_string(),
        };
        assert_eq!(err.to_string(), "Player not found: Kim");
    }

    #[test]
    fn test_downcast_from_anyhow() {
        let err: anyhow::Error = LadderError::AuthenticationFailed.into();
        assert_eq!(
            LadderError::from_anyhow(&err),
            Some(&LadderError::AuthenticationFailed)
        );

        let other = anyhow::anyhow!("something else");
        assert!(LadderError::from_anyhow(&other).is_none());
    }
}
