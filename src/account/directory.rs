//! Sign-up, approval and login for club accounts
//!
//! New accounts start as unapproved guests. An admin approves them or assigns
//! a role; only approved accounts can log in and obtain a `Session`.

use crate::account::session::Session;
use crate::account::store::AccountStore;
use crate::error::{LadderError, Result};
use crate::types::{Account, Role};
use crate::utils::{current_timestamp, hash_password, normalize_name, verify_password};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Account management on top of an `AccountStore`
pub struct AccountDirectory {
    store: Arc<dyn AccountStore>,
}

impl AccountDirectory {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Create the first admin account if it does not exist yet
    ///
    /// An existing account with the same id is returned untouched, so this is
    /// safe to run on every start-up.
    pub fn bootstrap_admin(&self, user_id: &str, username: &str, password: &str) -> Result<Account> {
        let mut account = new_account(user_id, username, password)?;

        if let Some(existing) = self.store.get(&account.user_id)? {
            debug!(
                "Admin bootstrap skipped, account '{}' already exists",
                existing.user_id
            );
            return Ok(existing);
        }

        account.role = Role::Admin;
        account.approved = true;

        self.store.upsert(account.clone())?;
        info!("Created admin account '{}'", account.user_id);
        Ok(account)
    }

    /// Register a new account awaiting approval
    pub fn sign_up(&self, user_id: &str, username: &str, password: &str) -> Result<Account> {
        let account = new_account(user_id, username, password)?;

        if self.store.get(&account.user_id)?.is_some() {
            return Err(LadderError::DuplicateAccount {
                user_id: account.user_id,
            }
            .into());
        }

        self.store.upsert(account.clone())?;
        info!("Sign-up from '{}', waiting for admin approval", account.user_id);
        Ok(account)
    }

    /// Check credentials and open a session for an approved account
    pub fn login(&self, user_id: &str, password: &str) -> Result<Session> {
        let account = match normalize_name(user_id) {
            Some(user_id) => self.store.get(&user_id)?,
            None => None,
        };
        let account = match account {
            Some(account) => account,
            None => {
                warn!("Login failed for unknown user '{}'", user_id);
                return Err(LadderError::AuthenticationFailed.into());
            }
        };

        if !verify_password(password, &account.password_hash) || !account.approved {
            warn!("Login failed for '{}'", user_id);
            return Err(LadderError::AuthenticationFailed.into());
        }

        debug!("'{}' logged in as {}", account.user_id, account.role);
        Ok(Session::for_account(&account))
    }

    /// Accounts still waiting for approval
    pub fn pending_accounts(&self, session: &Session) -> Result<Vec<Account>> {
        session.require_admin("list pending accounts")?;
        Ok(self
            .store
            .get_all()?
            .into_iter()
            .filter(|a| !a.approved)
            .collect())
    }

    /// All registered accounts
    pub fn accounts(&self, session: &Session) -> Result<Vec<Account>> {
        session.require_admin("list accounts")?;
        self.store.get_all()
    }

    pub fn approve(&self, session: &Session, user_id: &str) -> Result<Account> {
        session.require_admin("approve accounts")?;

        let mut account = self.fetch(user_id)?;
        account.approved = true;
        self.store.upsert(account.clone())?;

        info!("'{}' approved '{}'", session.user_id(), user_id);
        Ok(account)
    }

    /// Assign a role; assigning any role also approves the account
    pub fn update_role(&self, session: &Session, user_id: &str, role: Role) -> Result<Account> {
        session.require_admin("change roles")?;

        let mut account = self.fetch(user_id)?;
        account.role = role;
        account.approved = true;
        self.store.upsert(account.clone())?;

        info!("'{}' set role of '{}' to {}", session.user_id(), user_id, role);
        Ok(account)
    }

    pub fn delete_account(&self, session: &Session, user_id: &str) -> Result<()> {
        session.require_admin("delete accounts")?;

        if session.user_id() == user_id {
            return Err(LadderError::InvalidAccount {
                reason: "admins cannot delete their own account".to_string(),
            }
            .into());
        }

        if !self.store.delete(user_id)? {
            return Err(LadderError::AccountNotFound {
                user_id: user_id.to_string(),
            }
            .into());
        }

        info!("'{}' deleted account '{}'", session.user_id(), user_id);
        Ok(())
    }

    fn fetch(&self, user_id: &str) -> Result<Account> {
        self.store.get(user_id)?.ok_or_else(|| {
            LadderError::AccountNotFound {
                user_id: user_id.to_string(),
            }
            .into()
        })
    }
}

fn new_account(user_id: &str, username: &str, password: &str) -> Result<Account> {
    let (user_id, username) = match (normalize_name(user_id), normalize_name(username)) {
        (Some(user_id), Some(username)) if !password.is_empty() => (user_id, username),
        _ => {
            return Err(LadderError::InvalidAccount {
                reason: "user id, username and password are all required".to_string(),
            }
            .into())
        }
    };

    Ok(Account {
        user_id,
        username,
        password_hash: hash_password(password),
        role: Role::Guest,
        approved: false,
        created_at: current_timestamp(),
    })
}
