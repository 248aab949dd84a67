//! Business logic services
//!
//! Each service borrows the storage coordinator plus the acting user and
//! enforces family ownership on every operation. `AuthService` is the one
//! exception: it runs before a user exists.

pub mod account;
pub mod auth;
pub mod budget;
pub mod category;
pub mod family;
pub mod import;
pub mod scheduled;
pub mod transaction;

pub use account::{AccountService, AccountSummary};
pub use auth::{AuthService, RegisterTarget};
pub use budget::{BudgetOverview, BudgetService, BudgetStatus, OverviewRow};
pub use category::CategoryService;
pub use family::{FamilyDetails, FamilyService};
pub use import::{
    ColumnMapping, ImportOutcome, ImportService, ParsedRow, PreviewRow, RowStatus,
};
pub use scheduled::{
    AdvanceOutcome, ScheduledPatch, ScheduledService, UpcomingOccurrence,
};
pub use transaction::{TransactionFilter, TransactionPatch, TransactionService};
