//! CSV export
//!
//! Spreadsheet-friendly exports of the family's transactions, accounts, and
//! budget overview.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{HearthError, HearthResult};
use crate::models::{BudgetPeriod, User};
use crate::services::{AccountService, BudgetService};
use crate::storage::Storage;

/// Export the family's transactions to CSV, newest first
pub fn export_transactions_csv<W: Write>(
    storage: &Storage,
    user: &User,
    writer: &mut W,
) -> HearthResult<()> {
    let accounts = storage.accounts.get_by_family(user.family_id)?;
    let account_names: HashMap<_, _> = accounts.iter().map(|a| (a.id, a.name.clone())).collect();

    let categories = storage.categories.get_by_family(user.family_id)?;
    let category_names: HashMap<_, _> =
        categories.iter().map(|c| (c.id, c.name.clone())).collect();

    writeln!(writer, "ID,Date,Account,Payee,Category,Memo,Amount,Source")
        .map_err(|e| HearthError::Export(e.to_string()))?;

    for txn in storage.transactions.get_by_family(user.family_id)? {
        let account_name = account_names
            .get(&txn.account_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        let category_name = txn
            .category_id
            .and_then(|id| category_names.get(&id).cloned())
            .unwrap_or_default();

        writeln!(
            writer,
            "{},{},{},{},{},{},{:.2},{}",
            txn.id,
            txn.date,
            escape_csv(&account_name),
            escape_csv(&txn.payee),
            escape_csv(&category_name),
            escape_csv(&txn.memo),
            txn.amount.cents() as f64 / 100.0,
            txn.source
        )
        .map_err(|e| HearthError::Export(e.to_string()))?;
    }

    Ok(())
}

/// Export the family's accounts with computed balances to CSV
pub fn export_accounts_csv<W: Write>(
    storage: &Storage,
    user: &User,
    writer: &mut W,
) -> HearthResult<()> {
    let service = AccountService::new(storage, user);

    writeln!(
        writer,
        "ID,Name,Type,Starting Balance,Balance,Transactions,Archived"
    )
    .map_err(|e| HearthError::Export(e.to_string()))?;

    for summary in service.list_with_balances(true)? {
        writeln!(
            writer,
            "{},{},{},{:.2},{:.2},{},{}",
            summary.account.id,
            escape_csv(&summary.account.name),
            summary.account.account_type,
            summary.account.starting_balance.cents() as f64 / 100.0,
            summary.balance.cents() as f64 / 100.0,
            summary.transaction_count,
            summary.account.archived
        )
        .map_err(|e| HearthError::Export(e.to_string()))?;
    }

    Ok(())
}

/// Export the budget overview for one period to CSV
pub fn export_budget_csv<W: Write>(
    storage: &Storage,
    user: &User,
    period: &BudgetPeriod,
    writer: &mut W,
) -> HearthResult<()> {
    let overview = BudgetService::new(storage, user).overview(period)?;

    writeln!(writer, "Period,Category,Limit,Spent,Remaining")
        .map_err(|e| HearthError::Export(e.to_string()))?;

    for row in &overview.rows {
        let limit = row
            .limit
            .map(|m| format!("{:.2}", m.cents() as f64 / 100.0))
            .unwrap_or_default();
        let remaining = row
            .remaining
            .map(|m| format!("{:.2}", m.cents() as f64 / 100.0))
            .unwrap_or_default();

        writeln!(
            writer,
            "{},{},{},{:.2},{}",
            overview.period,
            escape_csv(&row.category_name),
            limit,
            row.spent.cents() as f64 / 100.0,
            remaining
        )
        .map_err(|e| HearthError::Export(e.to_string()))?;
    }

    writeln!(
        writer,
        "{},TOTAL,{:.2},{:.2},{:.2}",
        overview.period,
        overview.total_limit.cents() as f64 / 100.0,
        overview.total_spent.cents() as f64 / 100.0,
        (overview.total_limit - overview.total_spent).cents() as f64 / 100.0
    )
    .map_err(|e| HearthError::Export(e.to_string()))?;

    Ok(())
}

/// Escape a string for CSV format
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HearthPaths;
    use crate::models::{
        Account, AccountType, Category, CategoryKind, FamilyId, Money, Transaction,
    };
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn test_setup() -> (TempDir, Storage, User) {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        let user = User::new(FamilyId::new(), "kim@example.com", "Kim", "hash");
        (temp_dir, storage, user)
    }

    #[test]
    fn test_export_transactions_csv() {
        let (_temp_dir, storage, user) = test_setup();

        let account = Account::new(
            user.family_id,
            "Checking",
            AccountType::Checking,
            Money::zero(),
        );
        let category = Category::new(user.family_id, "Groceries", CategoryKind::Expense);
        storage.accounts.upsert(account.clone()).unwrap();
        storage.categories.upsert(category.clone()).unwrap();

        let mut txn = Transaction::new(
            user.family_id,
            account.id,
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            Money::from_cents(-5000),
        );
        txn.payee = "Corner Store, Ltd".to_string();
        txn.category_id = Some(category.id);
        storage.transactions.upsert(txn).unwrap();

        let mut out = Vec::new();
        export_transactions_csv(&storage, &user, &mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        assert!(csv.starts_with("ID,Date,Account,Payee"));
        // Comma in the payee forces quoting
        assert!(csv.contains("\"Corner Store, Ltd\""));
        assert!(csv.contains("Groceries"));
        assert!(csv.contains("-50.00"));
    }

    #[test]
    fn test_export_accounts_csv() {
        let (_temp_dir, storage, user) = test_setup();

        storage
            .accounts
            .upsert(Account::new(
                user.family_id,
                "Savings",
                AccountType::Savings,
                Money::from_cents(100000),
            ))
            .unwrap();

        let mut out = Vec::new();
        export_accounts_csv(&storage, &user, &mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        assert!(csv.contains("Savings"));
        assert!(csv.contains("1000.00"));
    }

    #[test]
    fn test_export_excludes_other_families() {
        let (_temp_dir, storage, user) = test_setup();

        let foreign = Account::new(
            FamilyId::new(),
            "Foreign",
            AccountType::Checking,
            Money::zero(),
        );
        storage
            .transactions
            .upsert(Transaction::new(
                foreign.family_id,
                foreign.id,
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                Money::from_cents(-100),
            ))
            .unwrap();
        storage.accounts.upsert(foreign).unwrap();

        let mut out = Vec::new();
        export_transactions_csv(&storage, &user, &mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        // Header only
        assert_eq!(csv.lines().count(), 1);
    }
}
