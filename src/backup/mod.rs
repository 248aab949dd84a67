//! Backup system
//!
//! Rolling JSON backups of the data files with a retention policy, plus
//! validation and restore.
//!
//! `BackupManager` creates dated archives of all seven data files and prunes
//! old ones; by default 30 daily backups are kept, plus 12 monthly ones
//! (the first backup taken in a month). `RestoreManager` validates archives
//! and writes them back, optionally taking a safety backup first so a restore
//! can be undone.

mod manager;
mod restore;

pub use manager::{BackupArchive, BackupInfo, BackupManager};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
