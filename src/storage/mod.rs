//! Storage layer for Hearth
//!
//! JSON file storage with atomic writes and per-entity repositories, plus
//! the audit hooks services call when they change data.

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod families;
pub mod file_io;
pub mod init;
pub mod scheduled;
pub mod transactions;
pub mod users;

pub use accounts::AccountRepository;
pub use budgets::BudgetRepository;
pub use categories::CategoryRepository;
pub use families::FamilyRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::seed_default_categories;
pub use scheduled::ScheduledRepository;
pub use transactions::TransactionRepository;
pub use users::UserRepository;

use std::sync::RwLock;

use serde::Serialize;

use crate::audit::{generate_diff, AuditActor, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::HearthPaths;
use crate::error::HearthError;

/// Main storage coordinator providing access to all repositories and the
/// audit log
pub struct Storage {
    paths: HearthPaths,
    pub families: FamilyRepository,
    pub users: UserRepository,
    pub accounts: AccountRepository,
    pub categories: CategoryRepository,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
    pub scheduled: ScheduledRepository,
    audit: AuditLogger,
    actor: RwLock<Option<AuditActor>>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: HearthPaths) -> Result<Self, HearthError> {
        paths.ensure_directories()?;

        Ok(Self {
            families: FamilyRepository::new(paths.families_file()),
            users: UserRepository::new(paths.users_file()),
            accounts: AccountRepository::new(paths.accounts_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            scheduled: ScheduledRepository::new(paths.scheduled_file()),
            audit: AuditLogger::new(paths.audit_log()),
            actor: RwLock::new(None),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &HearthPaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Attribute subsequent audit entries to this user
    pub fn set_actor(&self, actor: Option<AuditActor>) -> Result<(), HearthError> {
        let mut slot = self
            .actor
            .write()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *slot = actor;
        Ok(())
    }

    fn current_actor(&self) -> Result<Option<AuditActor>, HearthError> {
        let slot = self
            .actor
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(slot.clone())
    }

    /// Record a create in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), HearthError> {
        let entry = AuditEntry::create(
            self.current_actor()?,
            entity_type,
            entity_id,
            entity_name,
            entity,
        );
        self.audit.log(&entry)
    }

    /// Record an update in the audit log, with a computed field-level diff
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), HearthError> {
        let diff = match (
            serde_json::to_value(before).ok(),
            serde_json::to_value(after).ok(),
        ) {
            (Some(b), Some(a)) => generate_diff(&b, &a),
            _ => None,
        };

        let entry = AuditEntry::update(
            self.current_actor()?,
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        );
        self.audit.log(&entry)
    }

    /// Record a delete in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), HearthError> {
        let entry = AuditEntry::delete(
            self.current_actor()?,
            entity_type,
            entity_id,
            entity_name,
            entity,
        );
        self.audit.log(&entry)
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), HearthError> {
        self.families.load()?;
        self.users.load()?;
        self.accounts.load()?;
        self.categories.load()?;
        self.transactions.load()?;
        self.budgets.load()?;
        self.scheduled.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), HearthError> {
        self.families.save()?;
        self.users.save()?;
        self.accounts.save()?;
        self.categories.save()?;
        self.transactions.save()?;
        self.budgets.save()?;
        self.scheduled.save()?;
        Ok(())
    }
}
