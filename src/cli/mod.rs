//! Command-line interface
//!
//! One module per command group. Every handler takes the shared storage
//! coordinator; data handlers additionally take the logged-in user.

pub mod account;
pub mod audit;
pub mod auth;
pub mod backup;
pub mod budget;
pub mod category;
pub mod export;
pub mod family;
pub mod import;
pub mod report;
pub mod scheduled;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use audit::{handle_audit_command, AuditCommands};
pub use auth::{handle_auth_command, AuthCommands};
pub use backup::{handle_backup_command, BackupCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use export::{handle_export_command, ExportCommands};
pub use family::{handle_family_command, FamilyCommands};
pub use import::{handle_import_command, ImportArgs};
pub use report::{handle_report_command, ReportCommands};
pub use scheduled::{handle_scheduled_command, ScheduledCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{HearthError, HearthResult};

/// Parse a YYYY-MM-DD date argument
pub(crate) fn parse_date(s: &str) -> HearthResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        HearthError::Validation(format!("Invalid date '{}'. Expected YYYY-MM-DD", s))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
        );
        assert!(parse_date("03/15/2026").is_err());
        assert!(parse_date("2026-02-30").is_err());
    }
}
