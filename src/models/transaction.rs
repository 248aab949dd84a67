//! Transaction model
//!
//! Sign convention: negative amounts are outflows, positive amounts are
//! inflows. A transaction posted from a scheduled transaction carries the
//! schedule's id plus the occurrence date, which together guard against
//! double-posting the same occurrence.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId, FamilyId, ScheduledId, TransactionId};
use super::money::Money;

/// How a transaction entered the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSource {
    /// Entered by hand
    #[default]
    Manual,
    /// Posted by advancing a scheduled transaction
    Scheduled,
    /// Brought in through CSV import
    Imported,
}

impl fmt::Display for TransactionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Scheduled => write!(f, "scheduled"),
            Self::Imported => write!(f, "imported"),
        }
    }
}

impl std::str::FromStr for TransactionSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "scheduled" => Ok(Self::Scheduled),
            "imported" => Ok(Self::Imported),
            _ => Err(format!(
                "Invalid source: '{}'. Valid sources: manual, scheduled, imported",
                s
            )),
        }
    }
}

/// A posted transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Owning family
    pub family_id: FamilyId,

    /// Account the transaction posted to
    pub account_id: AccountId,

    /// Category, if assigned
    pub category_id: Option<CategoryId>,

    /// Transaction date
    pub date: NaiveDate,

    /// Amount in cents; negative = outflow, positive = inflow
    pub amount: Money,

    /// Payee name
    #[serde(default)]
    pub payee: String,

    /// Free-form memo
    #[serde(default)]
    pub memo: String,

    /// How the transaction entered the system
    #[serde(default)]
    pub source: TransactionSource,

    /// The schedule this transaction was posted from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_id: Option<ScheduledId>,

    /// Stable dedup hash assigned during CSV import
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_id: Option<String>,

    /// When the transaction was recorded
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new manual transaction
    pub fn new(
        family_id: FamilyId,
        account_id: AccountId,
        date: NaiveDate,
        amount: Money,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            family_id,
            account_id,
            category_id: None,
            date,
            amount,
            payee: String::new(),
            memo: String::new(),
            source: TransactionSource::Manual,
            scheduled_id: None,
            import_id: None,
            created_at: Utc::now(),
        }
    }

    /// Whether this is an outflow (spending)
    pub fn is_outflow(&self) -> bool {
        self.amount.is_negative()
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_zero() {
            return Err(TransactionValidationError::ZeroAmount);
        }
        if self.payee.len() > 128 {
            return Err(TransactionValidationError::PayeeTooLong(self.payee.len()));
        }
        if self.memo.len() > 256 {
            return Err(TransactionValidationError::MemoTooLong(self.memo.len()));
        }
        Ok(())
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    ZeroAmount,
    PayeeTooLong(usize),
    MemoTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroAmount => write!(f, "Transaction amount cannot be zero"),
            Self::PayeeTooLong(len) => write!(f, "Payee too long ({} chars, max 128)", len),
            Self::MemoTooLong(len) => write!(f, "Memo too long ({} chars, max 256)", len),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
