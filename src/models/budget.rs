//! Budget model
//!
//! A budget is a spending limit tied to one category and one period. Spent,
//! remaining, and percentage are never stored; they are derived from the
//! category's transactions by the budget service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, CategoryId, FamilyId};
use super::money::Money;
use super::period::BudgetPeriod;

/// A spending limit for one category over one period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    /// Owning family
    pub family_id: FamilyId,

    /// The category this budget limits
    pub category_id: CategoryId,

    /// The period the limit applies to
    pub period: BudgetPeriod,

    /// Spending limit; must be positive
    pub limit: Money,

    /// When the budget was created
    pub created_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget
    pub fn new(
        family_id: FamilyId,
        category_id: CategoryId,
        period: BudgetPeriod,
        limit: Money,
    ) -> Self {
        Self {
            id: BudgetId::new(),
            family_id,
            category_id,
            period,
            limit,
            created_at: Utc::now(),
        }
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if !self.limit.is_positive() {
            return Err(BudgetValidationError::NonPositiveLimit(self.limit));
        }
        Ok(())
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NonPositiveLimit(Money),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveLimit(limit) => {
                write!(f, "Budget limit must be positive (got {})", limit)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}
