//! Account table kept in a CSV file

use crate::account::store::{upsert_account, AccountStore};
use crate::error::{LadderError, Result};
use crate::persistence::table::{deserialize_flag, load_table, save_table};
use crate::types::{Account, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountRow {
    #[serde(rename = "UserID")]
    user_id: String,
    #[serde(rename = "Password")]
    password_hash: String,
    #[serde(rename = "Username")]
    username: String,
    #[serde(rename = "Role")]
    role: Role,
    #[serde(rename = "Approved", default, deserialize_with = "deserialize_flag")]
    approved: bool,
    #[serde(rename = "CreatedAt", default = "Utc::now")]
    created_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            user_id: row.user_id,
            username: row.username,
            password_hash: row.password_hash,
            role: row.role,
            approved: row.approved,
            created_at: row.created_at,
        }
    }
}

impl From<&Account> for AccountRow {
    fn from(account: &Account) -> Self {
        Self {
            user_id: account.user_id.clone(),
            password_hash: account.password_hash.clone(),
            username: account.username.clone(),
            role: account.role,
            approved: account.approved,
            created_at: account.created_at,
        }
    }
}

/// File-backed account storage
#[derive(Debug)]
pub struct CsvAccountStore {
    path: PathBuf,
    accounts: RwLock<Vec<Account>>,
}

impl CsvAccountStore {
    /// Open the account table, starting empty when the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let rows: Vec<AccountRow> = load_table(&path)?;
        let accounts: Vec<Account> = rows.into_iter().map(Account::from).collect();

        info!("Loaded {} accounts from {}", accounts.len(), path.display());
        Ok(Self {
            path,
            accounts: RwLock::new(accounts),
        })
    }

    fn mutate<T>(&self, change: impl FnOnce(&mut Vec<Account>) -> T) -> Result<T> {
        let mut accounts = self.accounts.write().map_err(|_| LadderError::Storage {
            message: "Failed to acquire accounts write lock".to_string(),
        })?;

        let mut updated = accounts.clone();
        let outcome = change(&mut updated);

        let rows: Vec<AccountRow> = updated.iter().map(AccountRow::from).collect();
        save_table(&self.path, &rows)?;
        debug!("Saved {} accounts to {}", rows.len(), self.path.display());

        *accounts = updated;
        Ok(outcome)
    }
}

impl AccountStore for CsvAccountStore {
    fn get_all(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().map_err(|_| LadderError::Storage {
            message: "Failed to acquire accounts read lock".to_string(),
        })?;

        Ok(accounts.clone())
    }

    fn get(&self, user_id: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().map_err(|_| LadderError::Storage {
            message: "Failed to acquire accounts read lock".to_string(),
        })?;

        Ok(accounts.iter().find(|a| a.user_id == user_id).cloned())
    }

    fn upsert(&self, account: Account) -> Result<()> {
        self.mutate(|accounts| upsert_account(accounts, account))
    }

    fn delete(&self, user_id: &str) -> Result<bool> {
        self.mutate(|accounts| {
            let before = accounts.len();
            accounts.retain(|a| a.user_id != user_id);
            accounts.len() != before
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::table::read_rows;
    use crate::utils::{current_timestamp, hash_password};

    #[test]
    fn test_original_columns_parse() {
        let hash = hash_password("admin_password");
        let input = format!(
            "UserID,Password,Username,Role,Approved\nadmin,{},Admin User,admin,True\n",
            hash
        );
        let rows: Vec<AccountRow> = read_rows(input.as_bytes()).unwrap();
        let account = Account::from(rows[0].clone());

        assert_eq!(account.user_id, "admin");
        assert_eq!(account.role, Role::Admin);
        assert!(account.approved);
        assert_eq!(account.password_hash, hash);
    }

    #[test]
    fn test_accounts_survive_reopen() {
        let dir = std::env::temp_dir().join(format!("club-ladder-accounts-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("accounts.csv");

        let store = CsvAccountStore::open(&path).unwrap();
        let account = Account {
            user_id: "kim".to_string(),
            username: "Kim".to_string(),
            password_hash: hash_password("pw"),
            role: Role::Guest,
            approved: false,
            created_at: current_timestamp(),
        };
        store.upsert(account.clone()).unwrap();

        let reopened = CsvAccountStore::open(&path).unwrap();
        assert_eq!(reopened.get("kim").unwrap(), Some(account));

        assert!(reopened.delete("kim").unwrap());
        assert!(CsvAccountStore::open(&path).unwrap().get_all().unwrap().is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
