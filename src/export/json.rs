//! JSON export
//!
//! Exports one family's complete data to JSON with schema versioning.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HearthError, HearthResult};
use crate::models::{
    Account, Budget, Category, Family, ScheduledTransaction, Transaction, User,
};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full export of one family's data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// The family the export belongs to
    pub family: Family,

    pub accounts: Vec<Account>,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub scheduled: Vec<ScheduledTransaction>,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub account_count: usize,
    pub category_count: usize,
    pub transaction_count: usize,
    pub budget_count: usize,
    pub scheduled_count: usize,

    /// Date of the earliest transaction
    pub earliest_transaction: Option<String>,

    /// Date of the latest transaction
    pub latest_transaction: Option<String>,
}

impl FullExport {
    /// Gather the acting user's family data into an export bundle
    pub fn from_storage(storage: &Storage, user: &User) -> HearthResult<Self> {
        let family = storage
            .families
            .get(user.family_id)?
            .ok_or_else(|| HearthError::family_not_found(&user.family_id.to_string()))?;

        let accounts = storage.accounts.get_by_family(user.family_id)?;
        let categories = storage.categories.get_by_family(user.family_id)?;
        let transactions = storage.transactions.get_by_family(user.family_id)?;
        let budgets = storage.budgets.get_by_family(user.family_id)?;
        let scheduled = storage.scheduled.get_by_family(user.family_id)?;

        let earliest_transaction = transactions
            .iter()
            .map(|t| t.date)
            .min()
            .map(|d| d.to_string());
        let latest_transaction = transactions
            .iter()
            .map(|t| t.date)
            .max()
            .map(|d| d.to_string());

        let metadata = ExportMetadata {
            account_count: accounts.len(),
            category_count: categories.len(),
            transaction_count: transactions.len(),
            budget_count: budgets.len(),
            scheduled_count: scheduled.len(),
            earliest_transaction,
            latest_transaction,
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            family,
            accounts,
            categories,
            transactions,
            budgets,
            scheduled,
            metadata,
        })
    }

    /// Validate schema version and referential integrity
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let account_ids: HashSet<_> = self.accounts.iter().map(|a| a.id).collect();
        let category_ids: HashSet<_> = self.categories.iter().map(|c| c.id).collect();

        for txn in &self.transactions {
            if !account_ids.contains(&txn.account_id) {
                return Err(format!(
                    "Transaction {} references unknown account {}",
                    txn.id, txn.account_id
                ));
            }
            if let Some(cat_id) = txn.category_id {
                if !category_ids.contains(&cat_id) {
                    return Err(format!(
                        "Transaction {} references unknown category {}",
                        txn.id, cat_id
                    ));
                }
            }
            if txn.family_id != self.family.id {
                return Err(format!(
                    "Transaction {} belongs to a different family",
                    txn.id
                ));
            }
        }

        for budget in &self.budgets {
            if !category_ids.contains(&budget.category_id) {
                return Err(format!(
                    "Budget for category {} references unknown category",
                    budget.category_id
                ));
            }
        }

        for sched in &self.scheduled {
            if !account_ids.contains(&sched.account_id) {
                return Err(format!(
                    "Schedule {} references unknown account {}",
                    sched.id, sched.account_id
                ));
            }
        }

        Ok(())
    }
}

/// Export the family's data to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    user: &User,
    writer: &mut W,
    pretty: bool,
) -> HearthResult<()> {
    let export = FullExport::from_storage(storage, user)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| HearthError::Export(e.to_string()))?;

    Ok(())
}

/// Import from a JSON export (for verification/restore)
pub fn import_from_json(json_str: &str) -> HearthResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| HearthError::Import(e.to_string()))?;

    export.validate().map_err(HearthError::Import)?;

    Ok(export)
}
