//! Logged-in session passed explicitly to the ladder service

use crate::error::{LadderError, Result};
use crate::types::{Account, Role, UserId};
use serde::Serialize;

/// Who is acting, and with which role
///
/// A `Session` is only handed out by `AccountDirectory::login` for an approved
/// account, so holding one is proof of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    user_id: UserId,
    username: String,
    role: Role,
}

impl Session {
    pub(crate) fn for_account(account: &Account) -> Self {
        Self {
            user_id: account.user_id.clone(),
            username: account.username.clone(),
            role: account.role,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fail with `Unauthorized` unless this is an admin session
    pub fn require_admin(&self, action: &str) -> Result<()> {
        if !self.is_admin() {
            return Err(LadderError::Unauthorized {
                action: action.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
