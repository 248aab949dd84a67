//! Cash flow report
//!
//! Income, spending, and net flow per calendar month over a span of months.

use chrono::{Datelike, NaiveDate};

use crate::error::HearthResult;
use crate::models::{Money, User};
use crate::storage::Storage;

/// One month of cash flow
#[derive(Debug, Clone)]
pub struct CashflowMonth {
    pub year: i32,
    pub month: u32,
    pub income: Money,
    /// Total outflow, negative
    pub spending: Money,
    pub net: Money,
}

impl CashflowMonth {
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Cash flow report over consecutive months
#[derive(Debug, Clone)]
pub struct CashflowReport {
    pub months: Vec<CashflowMonth>,
    pub total_income: Money,
    pub total_spending: Money,
    pub total_net: Money,
}

impl CashflowReport {
    /// Generate a report covering `month_count` months ending with the month
    /// that contains `end`
    pub fn generate(
        storage: &Storage,
        user: &User,
        end: NaiveDate,
        month_count: u32,
    ) -> HearthResult<Self> {
        let transactions = storage.transactions.get_by_family(user.family_id)?;

        // The month sequence, oldest first
        let mut keys = Vec::with_capacity(month_count as usize);
        let end_index = end.year() as i64 * 12 + (end.month() as i64 - 1);
        for i in (0..month_count as i64).rev() {
            let index = end_index - i;
            keys.push(((index.div_euclid(12)) as i32, (index.rem_euclid(12) + 1) as u32));
        }

        let mut months: Vec<CashflowMonth> = keys
            .into_iter()
            .map(|(year, month)| CashflowMonth {
                year,
                month,
                income: Money::zero(),
                spending: Money::zero(),
                net: Money::zero(),
            })
            .collect();

        for txn in &transactions {
            if let Some(entry) = months
                .iter_mut()
                .find(|m| m.year == txn.date.year() && m.month == txn.date.month())
            {
                if txn.amount.is_positive() {
                    entry.income += txn.amount;
                } else {
                    entry.spending += txn.amount;
                }
            }
        }

        let mut total_income = Money::zero();
        let mut total_spending = Money::zero();
        for entry in &mut months {
            entry.net = entry.income + entry.spending;
            total_income += entry.income;
            total_spending += entry.spending;
        }

        Ok(Self {
            months,
            total_income,
            total_spending,
            total_net: total_income + total_spending,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{:<10} {:>12} {:>12} {:>12}\n",
            "Month", "Income", "Spending", "Net"
        ));
        output.push_str(&"-".repeat(50));
        output.push('\n');

        for month in &self.months {
            output.push_str(&format!(
                "{:<10} {:>12} {:>12} {:>12}\n",
                month.label(),
                month.income.to_string(),
                month.spending.abs().to_string(),
                month.net.to_string()
            ));
        }

        output.push_str(&"-".repeat(50));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>12} {:>12} {:>12}\n",
            "TOTAL",
            self.total_income.to_string(),
            self.total_spending.abs().to_string(),
            self.total_net.to_string()
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HearthPaths;
    use crate::models::{Account, AccountType, FamilyId, Transaction};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cashflow_over_months() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let user = User::new(FamilyId::new(), "kim@example.com", "Kim", "hash");
        let account = Account::new(
            user.family_id,
            "Checking",
            AccountType::Checking,
            Money::zero(),
        );
        storage.accounts.upsert(account.clone()).unwrap();

        let mut post = |d: NaiveDate, cents: i64| {
            storage
                .transactions
                .upsert(Transaction::new(
                    user.family_id,
                    account.id,
                    d,
                    Money::from_cents(cents),
                ))
                .unwrap();
        };

        post(date(2026, 1, 1), 300000);
        post(date(2026, 1, 15), -120000);
        post(date(2026, 2, 1), 300000);
        post(date(2026, 2, 20), -80000);
        post(date(2025, 11, 5), -999999); // outside the window

        let report = CashflowReport::generate(&storage, &user, date(2026, 2, 28), 3).unwrap();
        assert_eq!(report.months.len(), 3);
        assert_eq!(report.months[0].label(), "2025-12");
        assert_eq!(report.months[1].label(), "2026-01");
        assert_eq!(report.months[2].label(), "2026-02");

        assert!(report.months[0].income.is_zero());
        assert_eq!(report.months[1].income.cents(), 300000);
        assert_eq!(report.months[1].spending.cents(), -120000);
        assert_eq!(report.months[1].net.cents(), 180000);

        assert_eq!(report.total_income.cents(), 600000);
        assert_eq!(report.total_spending.cents(), -200000);
        assert_eq!(report.total_net.cents(), 400000);
    }

    #[test]
    fn test_window_crosses_year_boundary() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        let user = User::new(FamilyId::new(), "kim@example.com", "Kim", "hash");

        let report = CashflowReport::generate(&storage, &user, date(2026, 1, 31), 4).unwrap();
        let labels: Vec<String> = report.months.iter().map(|m| m.label()).collect();
        assert_eq!(labels, vec!["2025-10", "2025-11", "2025-12", "2026-01"]);
    }
}
