//! Display formatting for terminal output
//!
//! Table and detail views for the data models. List views render through
//! `tabled`; detail views are plain text.

pub mod account;
pub mod budget;
pub mod category;
pub mod scheduled;
pub mod transaction;

pub use account::{format_account_details, format_account_list};
pub use budget::{format_budget_overview, format_budget_status};
pub use category::format_category_list;
pub use scheduled::{
    format_calendar, format_scheduled_details, format_scheduled_list, format_upcoming,
};
pub use transaction::{format_transaction_details, format_transaction_list};
