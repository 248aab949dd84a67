//! Budget service
//!
//! Setting spending limits and computing budget status. Spent amounts are
//! never stored; they are derived from the category's transactions inside
//! the period window every time status is asked for.
//!
//! Spent = net outflow of the category's transactions in the period, so a
//! refund posted to the category offsets spending. A period where refunds
//! exceed spending floors at zero rather than going negative.

use crate::audit::EntityType;
use crate::error::{HearthError, HearthResult};
use crate::models::{Budget, BudgetPeriod, Category, CategoryId, CategoryKind, Money, User};
use crate::storage::Storage;

/// Computed status of one budget
#[derive(Debug, Clone)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub category_name: String,
    /// Net spending in the period, floored at zero
    pub spent: Money,
    /// `limit - spent`; negative when over budget
    pub remaining: Money,
    /// `spent / limit * 100`
    pub percent_used: f64,
}

impl BudgetStatus {
    pub fn is_over(&self) -> bool {
        self.remaining.is_negative()
    }
}

/// One row of the period overview
#[derive(Debug, Clone)]
pub struct OverviewRow {
    pub category_id: CategoryId,
    pub category_name: String,
    pub limit: Option<Money>,
    pub spent: Money,
    /// `None` for unbudgeted categories
    pub remaining: Option<Money>,
}

/// Budget overview for one period: every budgeted category plus unbudgeted
/// categories that saw spending
#[derive(Debug, Clone)]
pub struct BudgetOverview {
    pub period: BudgetPeriod,
    pub rows: Vec<OverviewRow>,
    pub total_limit: Money,
    pub total_spent: Money,
    /// Spending in categories with no budget set (included in `total_spent`)
    pub unbudgeted_spent: Money,
}

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
    user: &'a User,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service acting as the given user
    pub fn new(storage: &'a Storage, user: &'a User) -> Self {
        Self { storage, user }
    }

    /// Set the limit for a (category, period) pair, replacing any existing
    /// budget for that pair
    pub fn set(
        &self,
        category_id: CategoryId,
        period: BudgetPeriod,
        limit: Money,
    ) -> HearthResult<Budget> {
        let category = self.check_category(category_id)?;

        if category.kind != CategoryKind::Expense {
            return Err(HearthError::Budget(format!(
                "Budgets apply to expense categories; '{}' is an income category",
                category.name
            )));
        }
        if category.archived {
            return Err(HearthError::Budget(format!(
                "Cannot budget archived category '{}'",
                category.name
            )));
        }

        if !limit.is_positive() {
            return Err(HearthError::Budget(format!(
                "Budget limit must be positive (got {})",
                limit
            )));
        }

        let existing =
            self.storage
                .budgets
                .get_by_category_period(self.user.family_id, category_id, &period)?;

        let budget = match existing {
            Some(mut budget) => {
                let before = budget.clone();
                budget.limit = limit;
                budget
                    .validate()
                    .map_err(|e| HearthError::Validation(e.to_string()))?;

                self.storage.budgets.upsert(budget.clone())?;
                self.storage.budgets.save()?;

                self.storage.log_update(
                    EntityType::Budget,
                    budget.id.to_string(),
                    Some(category.name.clone()),
                    &before,
                    &budget,
                )?;
                budget
            }
            None => {
                let budget = Budget::new(self.user.family_id, category_id, period, limit);
                budget
                    .validate()
                    .map_err(|e| HearthError::Validation(e.to_string()))?;

                self.storage.budgets.upsert(budget.clone())?;
                self.storage.budgets.save()?;

                self.storage.log_create(
                    EntityType::Budget,
                    budget.id.to_string(),
                    Some(category.name.clone()),
                    &budget,
                )?;
                budget
            }
        };

        Ok(budget)
    }

    /// Remove the budget for a (category, period) pair
    pub fn remove(&self, category_id: CategoryId, period: &BudgetPeriod) -> HearthResult<()> {
        let category = self.check_category(category_id)?;

        let budget = self
            .storage
            .budgets
            .get_by_category_period(self.user.family_id, category_id, period)?
            .ok_or_else(|| {
                HearthError::budget_not_found(format!("{} for {}", category.name, period))
            })?;

        self.storage.budgets.delete(budget.id)?;
        self.storage.budgets.save()?;

        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            Some(category.name.clone()),
            &budget,
        )?;

        Ok(())
    }

    /// Compute the status of one budget
    pub fn status(
        &self,
        category_id: CategoryId,
        period: &BudgetPeriod,
    ) -> HearthResult<BudgetStatus> {
        let category = self.check_category(category_id)?;

        let budget = self
            .storage
            .budgets
            .get_by_category_period(self.user.family_id, category_id, period)?
            .ok_or_else(|| {
                HearthError::budget_not_found(format!("{} for {}", category.name, period))
            })?;

        let spent = self.spent_in_period(category_id, period)?;
        Ok(make_status(budget, category.name, spent))
    }

    /// Compute the overview for one period: all budgets plus unbudgeted
    /// categories with spending, sorted by category name
    pub fn overview(&self, period: &BudgetPeriod) -> HearthResult<BudgetOverview> {
        let budgets = self
            .storage
            .budgets
            .get_by_period(self.user.family_id, period)?;
        let categories = self.storage.categories.get_by_family(self.user.family_id)?;

        let mut rows = Vec::new();
        let mut total_limit = Money::zero();
        let mut total_spent = Money::zero();
        let mut unbudgeted_spent = Money::zero();

        for category in &categories {
            let budget = budgets.iter().find(|b| b.category_id == category.id);
            let spent = self.spent_in_period(category.id, period)?;

            match budget {
                Some(budget) => {
                    total_limit += budget.limit;
                    total_spent += spent;
                    rows.push(OverviewRow {
                        category_id: category.id,
                        category_name: category.name.clone(),
                        limit: Some(budget.limit),
                        spent,
                        remaining: Some(budget.limit - spent),
                    });
                }
                None if !spent.is_zero() => {
                    total_spent += spent;
                    unbudgeted_spent += spent;
                    rows.push(OverviewRow {
                        category_id: category.id,
                        category_name: category.name.clone(),
                        limit: None,
                        spent,
                        remaining: None,
                    });
                }
                None => {}
            }
        }

        rows.sort_by(|a, b| a.category_name.cmp(&b.category_name));

        Ok(BudgetOverview {
            period: period.clone(),
            rows,
            total_limit,
            total_spent,
            unbudgeted_spent,
        })
    }

    /// Net outflow of one category inside the period window, floored at zero
    fn spent_in_period(
        &self,
        category_id: CategoryId,
        period: &BudgetPeriod,
    ) -> HearthResult<Money> {
        let transactions = self.storage.transactions.get_by_category(category_id)?;
        let net: Money = transactions
            .iter()
            .filter(|t| period.contains(t.date))
            .map(|t| t.amount)
            .sum();

        // Outflows are negative; net spending is the negation
        let spent = -net;
        Ok(if spent.is_negative() {
            Money::zero()
        } else {
            spent
        })
    }

    fn check_category(&self, category_id: CategoryId) -> HearthResult<Category> {
        let category = self
            .storage
            .categories
            .get(category_id)?
            .ok_or_else(|| HearthError::category_not_found(category_id.to_string()))?;

        if category.family_id != self.user.family_id {
            return Err(HearthError::permission_denied(
                "Category",
                category_id.to_string(),
            ));
        }

        Ok(category)
    }
}

fn make_status(budget: Budget, category_name: String, spent: Money) -> BudgetStatus {
    let percent_used = if budget.limit.is_zero() {
        0.0
    } else {
        spent.cents() as f64 / budget.limit.cents() as f64 * 100.0
    };

    BudgetStatus {
        remaining: budget.limit - spent,
        budget,
        category_name,
        spent,
        percent_used,
    }
}
