//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json, with
//! lookups by family, account, category, and originating schedule.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::HearthError;
use crate::models::{AccountId, CategoryId, FamilyId, ScheduledId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk
    pub fn load(&self) -> Result<(), HearthError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for txn in file_data.transactions {
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = TransactionData {
            transactions: data.values().cloned().collect(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all transactions of a family, newest first
    pub fn get_by_family(&self, family_id: FamilyId) -> Result<Vec<Transaction>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut txns: Vec<_> = data
            .values()
            .filter(|t| t.family_id == family_id)
            .cloned()
            .collect();
        txns.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(txns)
    }

    /// Get all transactions posted to an account, newest first
    pub fn get_by_account(&self, account_id: AccountId) -> Result<Vec<Transaction>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut txns: Vec<_> = data
            .values()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect();
        txns.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(txns)
    }

    /// Get all transactions carrying a category
    pub fn get_by_category(&self, category_id: CategoryId) -> Result<Vec<Transaction>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .filter(|t| t.category_id == Some(category_id))
            .cloned()
            .collect())
    }

    /// Check whether a schedule already posted a transaction for a date.
    /// Guards against double-posting the same occurrence.
    pub fn exists_for_occurrence(
        &self,
        scheduled_id: ScheduledId,
        date: NaiveDate,
    ) -> Result<bool, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .any(|t| t.scheduled_id == Some(scheduled_id) && t.date == date))
    }

    /// Check whether a family already imported a row with this dedup hash
    pub fn import_id_exists(
        &self,
        family_id: FamilyId,
        import_id: &str,
    ) -> Result<bool, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .any(|t| t.family_id == family_id && t.import_id.as_deref() == Some(import_id)))
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), HearthError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> Result<bool, HearthError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
