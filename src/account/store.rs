//! Account storage interface and in-memory implementation

use crate::error::{LadderError, Result};
use crate::types::Account;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Trait for account storage operations
pub trait AccountStore: Send + Sync {
    /// All accounts, in registration order
    fn get_all(&self) -> Result<Vec<Account>>;

    /// Look an account up by user id
    fn get(&self, user_id: &str) -> Result<Option<Account>>;

    /// Replace the account with the same user id in place, or append it
    fn upsert(&self, account: Account) -> Result<()>;

    /// Remove an account; returns whether anything was removed
    fn delete(&self, user_id: &str) -> Result<bool>;
}

pub(crate) fn upsert_account(accounts: &mut Vec<Account>, account: Account) {
    match accounts.iter_mut().find(|a| a.user_id == account.user_id) {
        Some(existing) => *existing = account,
        None => accounts.push(account),
    }
}

/// In-memory account storage implementation
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<'_, Vec<Account>>> {
        self.accounts.read().map_err(|_| {
            LadderError::Storage {
                message: "Failed to acquire accounts read lock".to_string(),
            }
            .into()
        })
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, Vec<Account>>> {
        self.accounts.write().map_err(|_| {
            LadderError::Storage {
                message: "Failed to acquire accounts write lock".to_string(),
            }
            .into()
        })
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get_all(&self) -> Result<Vec<Account>> {
        Ok(self.read_lock()?.clone())
    }

    fn get(&self, user_id: &str) -> Result<Option<Account>> {
        Ok(self.read_lock()?.iter().find(|a| a.user_id == user_id).cloned())
    }

    fn upsert(&self, account: Account) -> Result<()> {
        let mut accounts = self.write_lock()?;
        upsert_account(&mut accounts, account);
        Ok(())
    }

    fn delete(&self, user_id: &str) -> Result<bool> {
        let mut accounts = self.write_lock()?;
        let before = accounts.len();
        accounts.retain(|a| a.user_id != user_id);
        Ok(accounts.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use crate::utils::{current_timestamp, hash_password};

    fn account(user_id: &str) -> Account {
        Account {
            user_id: user_id.to_string(),
            username: format!("User {}", user_id),
            password_hash: hash_password("pw"),
            role: Role::Guest,
            approved: false,
            created_at: current_timestamp(),
        }
    }

    #[test]
    fn test_account_store_operations() {
        let store = InMemoryAccountStore::new();
        assert!(store.get("kim").unwrap().is_none());

        store.upsert(account("kim")).unwrap();
        store.upsert(account("lee")).unwrap();

        let mut kim = store.get("kim").unwrap().unwrap();
        kim.approved = true;
        store.upsert(kim).unwrap();

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].user_id, "kim");
        assert!(all[0].approved);

        assert!(store.delete("kim").unwrap());
        assert!(!store.delete("kim").unwrap());
        assert_eq!(store.get_all().unwrap().len(), 1);
    }
}
