//! Backup restoration
//!
//! Validates backup archives and writes their contents back over the data
//! files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::paths::HearthPaths;
use crate::error::{HearthError, HearthResult};

use super::manager::{BackupArchive, BackupManager};

/// Handles restoring from backups
pub struct RestoreManager {
    paths: HearthPaths,
}

impl RestoreManager {
    /// Create a new RestoreManager
    pub fn new(paths: HearthPaths) -> Self {
        Self { paths }
    }

    /// Restore data from a backup file
    ///
    /// This overwrites all current data with the backup contents.
    pub fn restore_from_file(&self, backup_path: &Path) -> HearthResult<RestoreResult> {
        let contents = fs::read_to_string(backup_path)
            .map_err(|e| HearthError::Io(format!("Failed to read backup file: {}", e)))?;

        let archive: BackupArchive = serde_json::from_str(&contents)
            .map_err(|e| HearthError::Json(format!("Failed to parse backup file: {}", e)))?;

        self.restore_from_archive(&archive)
    }

    /// Take a safety backup of the current data, then restore
    ///
    /// Returns the path of the safety backup alongside the restore result,
    /// so a bad restore can itself be undone.
    pub fn restore_with_safety(
        &self,
        backup_path: &Path,
        manager: &BackupManager,
    ) -> HearthResult<(PathBuf, RestoreResult)> {
        let safety = manager.create_backup()?;
        let result = self.restore_from_file(backup_path)?;
        Ok((safety, result))
    }

    /// Restore data from a parsed backup archive
    pub fn restore_from_archive(&self, archive: &BackupArchive) -> HearthResult<RestoreResult> {
        self.paths.ensure_directories()?;

        let mut result = RestoreResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            ..Default::default()
        };

        let sections: [(&str, &serde_json::Value, PathBuf, &mut bool); 7] = [
            (
                "families",
                &archive.families,
                self.paths.families_file(),
                &mut result.families_restored,
            ),
            (
                "users",
                &archive.users,
                self.paths.users_file(),
                &mut result.users_restored,
            ),
            (
                "accounts",
                &archive.accounts,
                self.paths.accounts_file(),
                &mut result.accounts_restored,
            ),
            (
                "categories",
                &archive.categories,
                self.paths.categories_file(),
                &mut result.categories_restored,
            ),
            (
                "transactions",
                &archive.transactions,
                self.paths.transactions_file(),
                &mut result.transactions_restored,
            ),
            (
                "budgets",
                &archive.budgets,
                self.paths.budgets_file(),
                &mut result.budgets_restored,
            ),
            (
                "scheduled",
                &archive.scheduled,
                self.paths.scheduled_file(),
                &mut result.scheduled_restored,
            ),
        ];

        for (name, value, path, restored) in sections {
            if value.is_null() {
                continue;
            }
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| HearthError::Json(format!("Failed to serialize {}: {}", name, e)))?;
            fs::write(&path, json)
                .map_err(|e| HearthError::Io(format!("Failed to restore {}: {}", name, e)))?;
            *restored = true;
        }

        Ok(result)
    }

    /// Validate a backup file without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> HearthResult<ValidationResult> {
        let contents = fs::read_to_string(backup_path)
            .map_err(|e| HearthError::Io(format!("Failed to read backup file: {}", e)))?;

        let archive: BackupArchive = serde_json::from_str(&contents)
            .map_err(|e| HearthError::Json(format!("Failed to parse backup file: {}", e)))?;

        Ok(ValidationResult {
            is_valid: true,
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            has_families: archive.families.is_object(),
            has_users: archive.users.is_object(),
            has_accounts: archive.accounts.is_object(),
            has_categories: archive.categories.is_object(),
            has_transactions: archive.transactions.is_object(),
            has_budgets: archive.budgets.is_object(),
            has_scheduled: archive.scheduled.is_object(),
        })
    }
}

/// Result of a restore operation
#[derive(Debug, Default)]
pub struct RestoreResult {
    /// Schema version of the restored backup
    pub schema_version: u32,
    /// Date the backup was created
    pub backup_date: chrono::DateTime<chrono::Utc>,
    pub families_restored: bool,
    pub users_restored: bool,
    pub accounts_restored: bool,
    pub categories_restored: bool,
    pub transactions_restored: bool,
    pub budgets_restored: bool,
    pub scheduled_restored: bool,
}

impl RestoreResult {
    fn restored_sections(&self) -> Vec<&'static str> {
        let flags = [
            (self.families_restored, "families"),
            (self.users_restored, "users"),
            (self.accounts_restored, "accounts"),
            (self.categories_restored, "categories"),
            (self.transactions_restored, "transactions"),
            (self.budgets_restored, "budgets"),
            (self.scheduled_restored, "scheduled"),
        ];
        flags
            .into_iter()
            .filter_map(|(set, name)| set.then_some(name))
            .collect()
    }

    /// Check if all data was restored
    pub fn all_restored(&self) -> bool {
        self.restored_sections().len() == 7
    }

    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        format!("Restored: {}", self.restored_sections().join(", "))
    }
}

/// Result of validating a backup
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether the backup file is valid
    pub is_valid: bool,
    /// Schema version of the backup
    pub schema_version: u32,
    /// Date the backup was created
    pub backup_date: chrono::DateTime<chrono::Utc>,
    pub has_families: bool,
    pub has_users: bool,
    pub has_accounts: bool,
    pub has_categories: bool,
    pub has_transactions: bool,
    pub has_budgets: bool,
    pub has_scheduled: bool,
}

impl ValidationResult {
    fn sections(&self) -> [(bool, &'static str); 7] {
        [
            (self.has_families, "families"),
            (self.has_users, "users"),
            (self.has_accounts, "accounts"),
            (self.has_categories, "categories"),
            (self.has_transactions, "transactions"),
            (self.has_budgets, "budgets"),
            (self.has_scheduled, "scheduled"),
        ]
    }

    /// Check if all expected data is present
    pub fn is_complete(&self) -> bool {
        self.sections().iter().all(|(present, _)| *present)
    }

    /// Get a summary of what data is present
    pub fn summary(&self) -> String {
        let mut present = Vec::new();
        let mut missing = Vec::new();

        for (has, name) in self.sections() {
            if has {
                present.push(name);
            } else {
                missing.push(name);
            }
        }

        if missing.is_empty() {
            format!("Complete backup (v{})", self.schema_version)
        } else {
            format!(
                "Partial backup (v{}): has {}, missing {}",
                self.schema_version,
                present.join(", "),
                missing.join(", ")
            )
        }
    }
}
