//! Spending report
//!
//! Spending broken down by category for a date range, with income and
//! uncategorized spending summarized alongside.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::HearthResult;
use crate::models::{CategoryId, CategoryKind, Money, User};
use crate::storage::Storage;

/// Spending in one category
#[derive(Debug, Clone)]
pub struct SpendingRow {
    pub category_id: CategoryId,
    pub category_name: String,
    /// Total spending, negative
    pub total: Money,
    pub transaction_count: usize,
    /// Share of total spending
    pub percentage: f64,
}

/// Spending report for one date range
#[derive(Debug, Clone)]
pub struct SpendingReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rows: Vec<SpendingRow>,
    /// Total spending across categories, negative
    pub total_spending: Money,
    pub total_income: Money,
    pub uncategorized_spending: Money,
    pub uncategorized_count: usize,
    pub total_transactions: usize,
}

impl SpendingReport {
    /// Generate a spending report over the family's transactions in
    /// `[start_date, end_date]`
    pub fn generate(
        storage: &Storage,
        user: &User,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> HearthResult<Self> {
        let categories = storage.categories.get_by_family(user.family_id)?;
        let transactions: Vec<_> = storage
            .transactions
            .get_by_family(user.family_id)?
            .into_iter()
            .filter(|t| t.date >= start_date && t.date <= end_date)
            .collect();

        let expense_ids: HashMap<CategoryId, &str> = categories
            .iter()
            .filter(|c| c.kind == CategoryKind::Expense)
            .map(|c| (c.id, c.name.as_str()))
            .collect();

        let mut by_category: HashMap<CategoryId, (Money, usize)> = HashMap::new();
        let mut total_spending = Money::zero();
        let mut total_income = Money::zero();
        let mut uncategorized_spending = Money::zero();
        let mut uncategorized_count = 0;

        for txn in &transactions {
            if txn.amount.is_positive() {
                total_income += txn.amount;
                continue;
            }

            total_spending += txn.amount;
            match txn.category_id.filter(|id| expense_ids.contains_key(id)) {
                Some(category_id) => {
                    let entry = by_category
                        .entry(category_id)
                        .or_insert((Money::zero(), 0));
                    entry.0 += txn.amount;
                    entry.1 += 1;
                }
                None => {
                    uncategorized_spending += txn.amount;
                    uncategorized_count += 1;
                }
            }
        }

        let total_abs = total_spending.abs();
        let mut rows: Vec<SpendingRow> = by_category
            .into_iter()
            .map(|(category_id, (total, transaction_count))| {
                let percentage = if total_abs.is_zero() {
                    0.0
                } else {
                    total.abs().cents() as f64 / total_abs.cents() as f64 * 100.0
                };
                SpendingRow {
                    category_name: expense_ids
                        .get(&category_id)
                        .map(|&n| n.to_string())
                        .unwrap_or_default(),
                    category_id,
                    total,
                    transaction_count,
                    percentage,
                }
            })
            .collect();

        // Biggest spenders first (spending is negative)
        rows.sort_by(|a, b| a.total.cmp(&b.total));

        Ok(Self {
            start_date,
            end_date,
            rows,
            total_spending,
            total_income,
            uncategorized_spending,
            uncategorized_count,
            total_transactions: transactions.len(),
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Spending Report: {} to {}\n",
            self.start_date, self.end_date
        ));
        output.push_str(&"=".repeat(64));
        output.push('\n');
        output.push_str(&format!("Total spending: {}\n", self.total_spending.abs()));
        output.push_str(&format!("Total income:   {}\n\n", self.total_income));

        output.push_str(&format!(
            "{:<30} {:>12} {:>8} {:>8}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<30} {:>12} {:>8} {:>7.1}%\n",
                row.category_name,
                row.total.abs().to_string(),
                row.transaction_count,
                row.percentage
            ));
        }

        if !self.uncategorized_spending.is_zero() {
            output.push_str(&format!(
                "{:<30} {:>12} {:>8}\n",
                "(uncategorized)",
                self.uncategorized_spending.abs().to_string(),
                self.uncategorized_count
            ));
        }

        output.push_str(&"-".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>12}\n",
            "TOTAL",
            self.total_spending.abs().to_string()
        ));

        output
    }

    /// Top spending categories, biggest first
    pub fn top_categories(&self, limit: usize) -> &[SpendingRow] {
        &self.rows[..limit.min(self.rows.len())]
    }
}
