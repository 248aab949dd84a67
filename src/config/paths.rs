//! Path management for Hearth
//!
//! Provides platform-appropriate path resolution for configuration, data,
//! backups, and the session file.
//!
//! ## Path Resolution Order
//!
//! 1. `HEARTH_DATA_DIR` environment variable (if set)
//! 2. The platform config directory via `directories`
//!    (Linux: `~/.config/hearth`, macOS: `~/Library/Application Support/hearth`,
//!    Windows: `%APPDATA%\hearth`)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::HearthError;

/// Manages all paths used by Hearth
#[derive(Debug, Clone)]
pub struct HearthPaths {
    /// Base directory for all Hearth data
    base_dir: PathBuf,
}

impl HearthPaths {
    /// Create a new HearthPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, HearthError> {
        let base_dir = if let Ok(custom) = std::env::var("HEARTH_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            let dirs = ProjectDirs::from("", "", "hearth").ok_or_else(|| {
                HearthError::Config("Could not determine a home directory".into())
            })?;
            dirs.config_dir().to_path_buf()
        };

        Ok(Self { base_dir })
    }

    /// Create HearthPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the backup directory
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the session file
    pub fn session_file(&self) -> PathBuf {
        self.base_dir.join("session.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to families.json
    pub fn families_file(&self) -> PathBuf {
        self.data_dir().join("families.json")
    }

    /// Get the path to users.json
    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    /// Get the path to accounts.json
    pub fn accounts_file(&self) -> PathBuf {
        self.data_dir().join("accounts.json")
    }

    /// Get the path to categories.json
    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    /// Get the path to transactions.json
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Get the path to budgets.json
    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// Get the path to scheduled.json
    pub fn scheduled_file(&self) -> PathBuf {
        self.data_dir().join("scheduled.json")
    }

    /// All data files, in the order backup and restore handle them
    pub fn data_files(&self) -> Vec<PathBuf> {
        vec![
            self.families_file(),
            self.users_file(),
            self.accounts_file(),
            self.categories_file(),
            self.transactions_file(),
            self.budgets_file(),
            self.scheduled_file(),
        ]
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), HearthError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| HearthError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| HearthError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| HearthError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }
}
