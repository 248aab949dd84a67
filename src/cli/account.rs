//! Account CLI commands

use clap::Subcommand;

use crate::display::{format_account_details, format_account_list};
use crate::error::{HearthError, HearthResult};
use crate::models::{AccountType, Money, User};
use crate::services::AccountService;
use crate::storage::Storage;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Add a new account
    Add {
        /// Account name
        name: String,
        /// Account type (checking, savings, credit, cash, investment)
        #[arg(short = 't', long, default_value = "checking")]
        account_type: String,
        /// Starting balance (e.g., "1000.00")
        #[arg(short, long, default_value = "0")]
        balance: String,
    },
    /// List accounts with balances
    List {
        /// Include archived accounts
        #[arg(short, long)]
        all: bool,
    },
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Rename an account
    Rename {
        /// Account name or ID
        account: String,
        /// New name
        name: String,
    },
    /// Archive an account
    Archive {
        /// Account name or ID
        account: String,
    },
    /// Unarchive an account
    Unarchive {
        /// Account name or ID
        account: String,
    },
}

/// Handle an account command
pub fn handle_account_command(
    storage: &Storage,
    user: &User,
    cmd: AccountCommands,
) -> HearthResult<()> {
    let service = AccountService::new(storage, user);

    match cmd {
        AccountCommands::Add {
            name,
            account_type,
            balance,
        } => {
            let account_type: AccountType = account_type
                .parse()
                .map_err(HearthError::Validation)?;

            let starting_balance = Money::parse(&balance).map_err(|e| {
                HearthError::Validation(format!("Invalid balance '{}': {}", balance, e))
            })?;

            let account = service.create(&name, account_type, starting_balance)?;

            println!("Created account: {}", account.name);
            println!("  Type:             {}", account.account_type);
            println!("  Starting balance: {}", account.starting_balance);
            println!("  ID:               {}", account.id);
        }

        AccountCommands::List { all } => {
            let summaries = service.list_with_balances(all)?;
            print!("{}", format_account_list(&summaries));
        }

        AccountCommands::Show { account } => {
            let found = service.find(&account)?;
            let summary = service.summarize(&found)?;
            print!("{}", format_account_details(&summary));
        }

        AccountCommands::Rename { account, name } => {
            let found = service.find(&account)?;
            let renamed = service.rename(found.id, &name)?;
            println!("Renamed account to: {}", renamed.name);
        }

        AccountCommands::Archive { account } => {
            let found = service.find(&account)?;
            let archived = service.archive(found.id)?;
            println!("Archived account: {}", archived.name);
        }

        AccountCommands::Unarchive { account } => {
            let found = service.find(&account)?;
            let unarchived = service.unarchive(found.id)?;
            println!("Unarchived account: {}", unarchived.name);
        }
    }

    Ok(())
}
