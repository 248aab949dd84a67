//! Financial reports
//!
//! Spending by category and month-over-month cash flow.

pub mod cashflow;
pub mod spending;

pub use cashflow::{CashflowMonth, CashflowReport};
pub use spending::{SpendingReport, SpendingRow};
