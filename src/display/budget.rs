//! Budget display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::services::{BudgetOverview, BudgetStatus};

#[derive(Tabled)]
struct OverviewTableRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
}

/// Format the budget overview for one period
pub fn format_budget_overview(overview: &BudgetOverview) -> String {
    if overview.rows.is_empty() {
        return format!("No budgets set for {}.", overview.period);
    }

    let rows: Vec<OverviewTableRow> = overview
        .rows
        .iter()
        .map(|row| OverviewTableRow {
            category: row.category_name.clone(),
            limit: row
                .limit
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string()),
            spent: row.spent.to_string(),
            remaining: row
                .remaining
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let mut output = format!("Budgets for {}\n\n", overview.period);
    output.push_str(&Table::new(rows).with(Style::psql()).to_string());
    output.push('\n');
    output.push_str(&format!(
        "Budgeted: {}   Spent: {}\n",
        overview.total_limit, overview.total_spent
    ));
    if !overview.unbudgeted_spent.is_zero() {
        output.push_str(&format!(
            "Unbudgeted spending: {}\n",
            overview.unbudgeted_spent
        ));
    }

    output
}

/// Format a single budget's status with a usage bar
pub fn format_budget_status(status: &BudgetStatus) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} ({})\n",
        status.category_name, status.budget.period
    ));
    output.push_str(&format!("  Limit:     {}\n", status.budget.limit));
    output.push_str(&format!("  Spent:     {}\n", status.spent));
    output.push_str(&format!("  Remaining: {}\n", status.remaining));
    output.push_str(&format!(
        "  [{}] {:.0}%{}\n",
        usage_bar(status.percent_used, 20),
        status.percent_used,
        if status.is_over() { "  OVER BUDGET" } else { "" }
    ));

    output
}

/// Render a fixed-width usage bar; fills completely at 100%
fn usage_bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, BudgetPeriod, CategoryId, FamilyId, Money};
    use crate::services::OverviewRow;

    fn status(limit: i64, spent: i64) -> BudgetStatus {
        let budget = Budget::new(
            FamilyId::new(),
            CategoryId::new(),
            BudgetPeriod::monthly(2026, 3),
            Money::from_cents(limit),
        );
        let spent = Money::from_cents(spent);
        BudgetStatus {
            remaining: budget.limit - spent,
            percent_used: spent.cents() as f64 / budget.limit.cents() as f64 * 100.0,
            category_name: "Groceries".to_string(),
            budget,
            spent,
        }
    }

    #[test]
    fn test_format_budget_status() {
        let output = format_budget_status(&status(50000, 25000));
        assert!(output.contains("Groceries"));
        assert!(output.contains("Limit:     $500.00"));
        assert!(output.contains("50%"));
        assert!(!output.contains("OVER BUDGET"));
    }

    #[test]
    fn test_over_budget_flag() {
        let output = format_budget_status(&status(50000, 75000));
        assert!(output.contains("OVER BUDGET"));
        assert!(output.contains("150%"));
    }

    #[test]
    fn test_usage_bar_clamps() {
        assert_eq!(usage_bar(0.0, 10), "----------");
        assert_eq!(usage_bar(50.0, 10), "#####-----");
        assert_eq!(usage_bar(250.0, 10), "##########");
    }

    #[test]
    fn test_format_overview() {
        let overview = BudgetOverview {
            period: BudgetPeriod::monthly(2026, 3),
            rows: vec![OverviewRow {
                category_id: CategoryId::new(),
                category_name: "Groceries".to_string(),
                limit: Some(Money::from_cents(50000)),
                spent: Money::from_cents(12345),
                remaining: Some(Money::from_cents(37655)),
            }],
            total_limit: Money::from_cents(50000),
            total_spent: Money::from_cents(12345),
            unbudgeted_spent: Money::from_cents(900),
        };

        let output = format_budget_overview(&overview);
        assert!(output.contains("Groceries"));
        assert!(output.contains("$123.45"));
        assert!(output.contains("Unbudgeted spending: $9.00"));
    }

    #[test]
    fn test_empty_overview() {
        let overview = BudgetOverview {
            period: BudgetPeriod::monthly(2026, 3),
            rows: vec![],
            total_limit: Money::zero(),
            total_spent: Money::zero(),
            unbudgeted_spent: Money::zero(),
        };
        assert!(format_budget_overview(&overview).contains("No budgets set"));
    }
}
