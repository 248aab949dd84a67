//! Transaction display formatting

use std::collections::HashMap;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{AccountId, CategoryId, Transaction, TransactionSource};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Payee")]
    payee: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Src")]
    source: &'static str,
}

fn source_tag(source: TransactionSource) -> &'static str {
    match source {
        TransactionSource::Manual => "",
        TransactionSource::Scheduled => "sched",
        TransactionSource::Imported => "import",
    }
}

/// Format a list of transactions as a table, resolving account and category
/// names through the given lookup maps
pub fn format_transaction_list(
    transactions: &[Transaction],
    account_names: &HashMap<AccountId, String>,
    category_names: &HashMap<CategoryId, String>,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|txn| TransactionRow {
            id: short_id(&txn.id.to_string()),
            date: txn.date.to_string(),
            account: account_names
                .get(&txn.account_id)
                .cloned()
                .unwrap_or_else(|| "?".to_string()),
            payee: if txn.payee.is_empty() {
                "(no payee)".to_string()
            } else {
                truncate(&txn.payee, 24)
            },
            category: txn
                .category_id
                .and_then(|id| category_names.get(&id).cloned())
                .unwrap_or_default(),
            amount: txn.amount.to_string(),
            source: source_tag(txn.source),
        })
        .collect();

    Table::new(rows).with(Style::psql()).to_string()
}

/// Format a single transaction's details
pub fn format_transaction_details(
    txn: &Transaction,
    account_name: &str,
    category_name: Option<&str>,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("  Date:     {}\n", txn.date));
    output.push_str(&format!("  Account:  {}\n", account_name));
    output.push_str(&format!("  Amount:   {}\n", txn.amount));

    if !txn.payee.is_empty() {
        output.push_str(&format!("  Payee:    {}\n", txn.payee));
    }

    match category_name {
        Some(name) => output.push_str(&format!("  Category: {}\n", name)),
        None => output.push_str("  Category: (uncategorized)\n"),
    }

    if !txn.memo.is_empty() {
        output.push_str(&format!("  Memo:     {}\n", txn.memo));
    }

    output.push_str(&format!("  Source:   {}\n", txn.source));
    if let Some(sched_id) = txn.scheduled_id {
        output.push_str(&format!("  Schedule: {}\n", sched_id));
    }

    output
}

/// Shorten a full id for table display
pub(crate) fn short_id(id: &str) -> String {
    id.chars().take(12).collect()
}

/// Truncate a string for table display
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
