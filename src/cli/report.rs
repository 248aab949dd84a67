//! Report CLI commands

use chrono::Datelike;
use clap::Subcommand;

use crate::error::HearthResult;
use crate::models::User;
use crate::reports::{CashflowReport, SpendingReport};
use crate::storage::Storage;

use super::parse_date;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Spending by category over a date range
    Spending {
        /// Start date (YYYY-MM-DD, default first of this month)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD, default today)
        #[arg(long)]
        to: Option<String>,
    },
    /// Income vs. spending per month
    Cashflow {
        /// Number of months to cover
        #[arg(short, long, default_value = "6")]
        months: u32,
        /// Last month in the range (YYYY-MM-DD, default today)
        #[arg(long)]
        end: Option<String>,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    user: &User,
    cmd: ReportCommands,
) -> HearthResult<()> {
    let today = chrono::Local::now().date_naive();

    match cmd {
        ReportCommands::Spending { from, to } => {
            let start = match from {
                Some(d) => parse_date(&d)?,
                None => today.with_day(1).unwrap_or(today),
            };
            let end = match to {
                Some(d) => parse_date(&d)?,
                None => today,
            };

            let report = SpendingReport::generate(storage, user, start, end)?;
            print!("{}", report.format_terminal());
        }

        ReportCommands::Cashflow { months, end } => {
            let end = match end {
                Some(d) => parse_date(&d)?,
                None => today,
            };

            let report = CashflowReport::generate(storage, user, end, months)?;
            print!("{}", report.format_terminal());
        }
    }

    Ok(())
}
