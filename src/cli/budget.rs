//! Budget CLI commands

use clap::Subcommand;

use crate::display::{format_budget_overview, format_budget_status};
use crate::error::{HearthError, HearthResult};
use crate::models::{BudgetPeriod, User};
use crate::services::{BudgetService, CategoryService};
use crate::storage::Storage;

use super::transaction::parse_amount;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set (create or replace) a budget for a category
    Set {
        /// Category name or ID
        category: String,
        /// Spending limit, e.g. "400"
        limit: String,
        /// Period: "2026-03", "2026-W12", or "2026-03-01..2026-03-15" (default current month)
        #[arg(short, long)]
        period: Option<String>,
    },
    /// Remove a category's budget for a period
    Remove {
        /// Category name or ID
        category: String,
        /// Period (default current month)
        #[arg(short, long)]
        period: Option<String>,
    },
    /// Show one category's budget with spending
    Status {
        /// Category name or ID
        category: String,
        /// Period (default current month)
        #[arg(short, long)]
        period: Option<String>,
    },
    /// Show all budgets for a period with spending
    Overview {
        /// Period (default current month)
        #[arg(short, long)]
        period: Option<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    user: &User,
    cmd: BudgetCommands,
) -> HearthResult<()> {
    let service = BudgetService::new(storage, user);
    let categories = CategoryService::new(storage, user);

    match cmd {
        BudgetCommands::Set {
            category,
            limit,
            period,
        } => {
            let category = categories.find(&category)?;
            let period = resolve_period(period)?;
            let limit = parse_amount(&limit)?;

            let budget = service.set(category.id, period.clone(), limit)?;
            println!(
                "Budget set: {} at {} for {}",
                category.name, budget.limit, budget.period
            );
        }

        BudgetCommands::Remove { category, period } => {
            let category = categories.find(&category)?;
            let period = resolve_period(period)?;
            service.remove(category.id, &period)?;
            println!("Removed budget for {} ({})", category.name, period);
        }

        BudgetCommands::Status { category, period } => {
            let category = categories.find(&category)?;
            let period = resolve_period(period)?;
            let status = service.status(category.id, &period)?;
            print!("{}", format_budget_status(&status));
        }

        BudgetCommands::Overview { period } => {
            let period = resolve_period(period)?;
            let overview = service.overview(&period)?;
            print!("{}", format_budget_overview(&overview));
        }
    }

    Ok(())
}

fn resolve_period(period: Option<String>) -> HearthResult<BudgetPeriod> {
    match period {
        Some(s) => {
            BudgetPeriod::parse(&s).map_err(|e| HearthError::Validation(e.to_string()))
        }
        None => Ok(BudgetPeriod::current_month()),
    }
}
