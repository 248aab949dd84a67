//! Transaction CLI commands

use std::collections::HashMap;

use clap::Subcommand;

use crate::display::{format_transaction_details, format_transaction_list};
use crate::error::{HearthError, HearthResult};
use crate::models::{Money, TransactionId, TransactionSource, User};
use crate::services::{
    AccountService, CategoryService, TransactionFilter, TransactionPatch, TransactionService,
};
use crate::storage::Storage;

use super::parse_date;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a transaction (negative amount = spending)
    Add {
        /// Account name or ID
        account: String,
        /// Amount, e.g. "-42.50" for an outflow
        #[arg(allow_negative_numbers = true)]
        amount: String,
        /// Payee name
        #[arg(short, long, default_value = "")]
        payee: String,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Transaction date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Memo
        #[arg(short, long, default_value = "")]
        memo: String,
    },
    /// List transactions, newest first
    List {
        /// Filter by account name or ID
        #[arg(short, long)]
        account: Option<String>,
        /// Filter by category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Earliest date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Filter by source (manual, scheduled, imported)
        #[arg(short, long)]
        source: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show one transaction
    Show {
        /// Transaction ID
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// Move to another account
        #[arg(long)]
        account: Option<String>,
        /// Change the category
        #[arg(long, conflicts_with = "clear_category")]
        category: Option<String>,
        /// Remove the category
        #[arg(long)]
        clear_category: bool,
        /// Change the date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Change the amount
        #[arg(long)]
        amount: Option<String>,
        /// Change the payee
        #[arg(long)]
        payee: Option<String>,
        /// Change the memo
        #[arg(long)]
        memo: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    user: &User,
    cmd: TransactionCommands,
) -> HearthResult<()> {
    let service = TransactionService::new(storage, user);
    let accounts = AccountService::new(storage, user);
    let categories = CategoryService::new(storage, user);

    match cmd {
        TransactionCommands::Add {
            account,
            amount,
            payee,
            category,
            date,
            memo,
        } => {
            let account = accounts.find(&account)?;
            let category_id = match category {
                Some(c) => Some(categories.find(&c)?.id),
                None => None,
            };
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => chrono::Local::now().date_naive(),
            };
            let amount = parse_amount(&amount)?;

            let txn = service.create(account.id, category_id, date, amount, &payee, &memo)?;

            println!("Recorded: {} {} on {}", txn.amount, txn.payee, txn.date);
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            account,
            category,
            from,
            to,
            source,
            limit,
        } => {
            let filter = TransactionFilter {
                account_id: account.map(|a| accounts.find(&a).map(|a| a.id)).transpose()?,
                category_id: category
                    .map(|c| categories.find(&c).map(|c| c.id))
                    .transpose()?,
                from: from.map(|d| parse_date(&d)).transpose()?,
                to: to.map(|d| parse_date(&d)).transpose()?,
                source: source
                    .map(|s| s.parse::<TransactionSource>())
                    .transpose()
                    .map_err(HearthError::Validation)?,
                limit: Some(limit),
            };

            let txns = service.list(&filter)?;
            let (account_names, category_names) = name_maps(storage, user)?;
            print!(
                "{}",
                format_transaction_list(&txns, &account_names, &category_names)
            );
        }

        TransactionCommands::Show { id } => {
            let txn = service.get(parse_txn_id(&id)?)?;
            let account_name = accounts
                .get(txn.account_id)
                .map(|a| a.name)
                .unwrap_or_else(|_| "?".to_string());
            let category_name = match txn.category_id {
                Some(id) => Some(categories.get(id)?.name),
                None => None,
            };
            print!(
                "{}",
                format_transaction_details(&txn, &account_name, category_name.as_deref())
            );
        }

        TransactionCommands::Edit {
            id,
            account,
            category,
            clear_category,
            date,
            amount,
            payee,
            memo,
        } => {
            let category_id = if clear_category {
                Some(None)
            } else {
                match category {
                    Some(c) => Some(Some(categories.find(&c)?.id)),
                    None => None,
                }
            };

            let patch = TransactionPatch {
                account_id: account.map(|a| accounts.find(&a).map(|a| a.id)).transpose()?,
                category_id,
                date: date.map(|d| parse_date(&d)).transpose()?,
                amount: amount.map(|a| parse_amount(&a)).transpose()?,
                payee,
                memo,
            };

            let txn = service.edit(parse_txn_id(&id)?, patch)?;
            println!("Updated transaction {}", txn.id);
        }

        TransactionCommands::Delete { id } => {
            service.delete(parse_txn_id(&id)?)?;
            println!("Deleted transaction {}", id);
        }
    }

    Ok(())
}

/// Name lookup maps for the family's accounts and categories
pub(crate) fn name_maps(
    storage: &Storage,
    user: &User,
) -> HearthResult<(
    HashMap<crate::models::AccountId, String>,
    HashMap<crate::models::CategoryId, String>,
)> {
    let account_names = storage
        .accounts
        .get_by_family(user.family_id)?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();
    let category_names = storage
        .categories
        .get_by_family(user.family_id)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    Ok((account_names, category_names))
}

pub(crate) fn parse_amount(s: &str) -> HearthResult<Money> {
    Money::parse(s).map_err(|e| HearthError::Validation(format!("Invalid amount '{}': {}", s, e)))
}

fn parse_txn_id(s: &str) -> HearthResult<TransactionId> {
    s.parse::<TransactionId>()
        .map_err(|_| HearthError::transaction_not_found(s))
}
