//! Core data models for Hearth
//!
//! This module contains all the data structures that represent the family
//! finance domain: families, users, accounts, categories, transactions,
//! budgets, and scheduled transactions.

pub mod account;
pub mod budget;
pub mod category;
pub mod family;
pub mod ids;
pub mod money;
pub mod period;
pub mod recurrence;
pub mod scheduled;
pub mod transaction;
pub mod user;

pub use account::{Account, AccountType};
pub use budget::Budget;
pub use category::{Category, CategoryKind};
pub use family::Family;
pub use ids::{
    AccountId, BudgetId, CategoryId, FamilyId, ScheduledId, TransactionId, UserId,
};
pub use money::Money;
pub use period::BudgetPeriod;
pub use recurrence::{Frequency, RecurrenceEnd, RecurrenceError, RecurrenceRule};
pub use scheduled::{ScheduledStatus, ScheduledTransaction};
pub use transaction::{Transaction, TransactionSource};
pub use user::User;
