//! Account repository for JSON storage
//!
//! Manages loading and saving accounts to accounts.json. Name lookups are
//! scoped to a family since account names are only unique within one.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::HearthError;
use crate::models::{Account, AccountId, FamilyId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct AccountData {
    accounts: Vec<Account>,
}

/// Repository for account persistence
pub struct AccountRepository {
    path: PathBuf,
    data: RwLock<HashMap<AccountId, Account>>,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load accounts from disk
    pub fn load(&self) -> Result<(), HearthError> {
        let file_data: AccountData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for account in file_data.accounts {
            data.insert(account.id, account);
        }

        Ok(())
    }

    /// Save accounts to disk
    pub fn save(&self) -> Result<(), HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = AccountData {
            accounts: data.values().cloned().collect(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get an account by ID
    pub fn get(&self, id: AccountId) -> Result<Option<Account>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all accounts belonging to a family, sorted by name
    pub fn get_by_family(&self, family_id: FamilyId) -> Result<Vec<Account>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut accounts: Vec<_> = data
            .values()
            .filter(|a| a.family_id == family_id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }

    /// Get all active (non-archived) accounts of a family
    pub fn get_active(&self, family_id: FamilyId) -> Result<Vec<Account>, HearthError> {
        let all = self.get_by_family(family_id)?;
        Ok(all.into_iter().filter(|a| !a.archived).collect())
    }

    /// Get an account by name within a family (case-insensitive)
    pub fn get_by_name(
        &self,
        family_id: FamilyId,
        name: &str,
    ) -> Result<Option<Account>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name_lower = name.to_lowercase();
        Ok(data
            .values()
            .find(|a| a.family_id == family_id && a.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Check if an account name is already taken within a family
    pub fn name_exists(
        &self,
        family_id: FamilyId,
        name: &str,
        exclude_id: Option<AccountId>,
    ) -> Result<bool, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name_lower = name.to_lowercase();
        Ok(data.values().any(|a| {
            a.family_id == family_id
                && a.name.to_lowercase() == name_lower
                && Some(a.id) != exclude_id
        }))
    }

    /// Insert or update an account
    pub fn upsert(&self, account: Account) -> Result<(), HearthError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(account.id, account);
        Ok(())
    }

    /// Check if an account exists
    pub fn exists(&self, id: AccountId) -> Result<bool, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.contains_key(&id))
    }

    /// Count accounts
    pub fn count(&self) -> Result<usize, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
