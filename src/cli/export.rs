//! Export CLI commands

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{HearthError, HearthResult};
use crate::export::{
    export_accounts_csv, export_budget_csv, export_full_json, export_full_yaml,
    export_transactions_csv,
};
use crate::models::{BudgetPeriod, User};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export all transactions as CSV
    Transactions {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export accounts with balances as CSV
    Accounts {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export a period's budget overview as CSV
    Budget {
        /// Period: "2026-03", "2026-W12", or a custom range (default current month)
        #[arg(short, long)]
        period: Option<String>,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export the family's full dataset
    Full {
        /// Output format (json or yaml)
        #[arg(short, long, default_value = "json")]
        format: String,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle an export command
pub fn handle_export_command(
    storage: &Storage,
    user: &User,
    cmd: ExportCommands,
) -> HearthResult<()> {
    match cmd {
        ExportCommands::Transactions { output } => {
            let mut writer = open_output(&output)?;
            export_transactions_csv(storage, user, &mut writer)?;
            confirm(&output, "transactions");
        }

        ExportCommands::Accounts { output } => {
            let mut writer = open_output(&output)?;
            export_accounts_csv(storage, user, &mut writer)?;
            confirm(&output, "accounts");
        }

        ExportCommands::Budget { period, output } => {
            let period = match period {
                Some(s) => BudgetPeriod::parse(&s)
                    .map_err(|e| HearthError::Validation(e.to_string()))?,
                None => BudgetPeriod::current_month(),
            };
            let mut writer = open_output(&output)?;
            export_budget_csv(storage, user, &period, &mut writer)?;
            confirm(&output, "budget overview");
        }

        ExportCommands::Full {
            format,
            pretty,
            output,
        } => {
            let mut writer = open_output(&output)?;
            match format.to_lowercase().as_str() {
                "json" => export_full_json(storage, user, &mut writer, pretty)?,
                "yaml" | "yml" => export_full_yaml(storage, user, &mut writer)?,
                other => {
                    return Err(HearthError::Export(format!(
                        "Unknown format '{}'. Valid formats: json, yaml",
                        other
                    )))
                }
            }
            confirm(&output, "full export");
        }
    }

    Ok(())
}

fn open_output(output: &Option<PathBuf>) -> HearthResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                HearthError::Export(format!("Cannot create {}: {}", path.display(), e))
            })?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

fn confirm(output: &Option<PathBuf>, what: &str) {
    if let Some(path) = output {
        println!("Wrote {} to {}", what, path.display());
    }
}
