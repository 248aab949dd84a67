//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Money;
use crate::services::AccountSummary;

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    account_type: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Txns")]
    transactions: usize,
    #[tabled(rename = "Status")]
    status: &'static str,
}

/// Format a list of accounts with balances as a table
pub fn format_account_list(summaries: &[AccountSummary]) -> String {
    if summaries.is_empty() {
        return "No accounts found.".to_string();
    }

    let rows: Vec<AccountRow> = summaries
        .iter()
        .map(|s| AccountRow {
            name: s.account.name.clone(),
            account_type: s.account.account_type.to_string(),
            balance: s.balance.to_string(),
            transactions: s.transaction_count,
            status: if s.account.archived { "archived" } else { "" },
        })
        .collect();

    let total: Money = summaries.iter().map(|s| s.balance).sum();

    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push('\n');
    output.push_str(&format!("Total balance: {}\n", total));
    output
}

/// Format a single account's details
pub fn format_account_details(summary: &AccountSummary) -> String {
    let account = &summary.account;

    let mut output = String::new();
    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  ID:               {}\n", account.id));
    output.push_str(&format!("  Type:             {}\n", account.account_type));
    output.push_str(&format!(
        "  Archived:         {}\n",
        if account.archived { "Yes" } else { "No" }
    ));
    output.push('\n');
    output.push_str(&format!(
        "  Starting Balance: {}\n",
        account.starting_balance
    ));
    output.push_str(&format!("  Current Balance:  {}\n", summary.balance));
    output.push_str(&format!(
        "  Transactions:     {}\n",
        summary.transaction_count
    ));
    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        account.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType, FamilyId};

    fn summary(name: &str, balance: i64) -> AccountSummary {
        let account = Account::new(
            FamilyId::new(),
            name,
            AccountType::Checking,
            Money::zero(),
        );
        AccountSummary {
            account,
            balance: Money::from_cents(balance),
            transaction_count: 2,
        }
    }

    #[test]
    fn test_format_account_list() {
        let summaries = vec![summary("Checking", 100000), summary("Savings", 500000)];

        let output = format_account_list(&summaries);
        assert!(output.contains("Checking"));
        assert!(output.contains("Savings"));
        assert!(output.contains("Total balance: $6000.00"));
    }

    #[test]
    fn test_format_empty_list() {
        let output = format_account_list(&[]);
        assert!(output.contains("No accounts found"));
    }

    #[test]
    fn test_format_account_details() {
        let output = format_account_details(&summary("My Account", 100000));
        assert!(output.contains("My Account"));
        assert!(output.contains("Checking"));
        assert!(output.contains("Current Balance:  $1000.00"));
    }
}
