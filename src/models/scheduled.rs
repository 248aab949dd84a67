//! Scheduled transaction model
//!
//! A scheduled transaction is a template that posts real transactions on the
//! dates its recurrence rule produces. One-shot schedules have no rule and
//! finish after a single posting.
//!
//! Invariant: `next_date` is `None` if and only if the status is `Finished`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{AccountId, CategoryId, FamilyId, ScheduledId};
use super::money::Money;
use super::recurrence::RecurrenceRule;

/// Lifecycle state of a scheduled transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScheduledStatus {
    /// Producing occurrences
    #[default]
    Active,
    /// Suspended; occurrences that fall due while paused are dropped
    Paused,
    /// End condition reached (or one-shot posted); no more occurrences
    Finished,
}

impl fmt::Display for ScheduledStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Paused => write!(f, "paused"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

impl FromStr for ScheduledStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "finished" => Ok(Self::Finished),
            _ => Err(format!(
                "Invalid status: '{}'. Valid statuses: active, paused, finished",
                s
            )),
        }
    }
}

/// A recurring (or one-shot) transaction template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTransaction {
    /// Unique identifier
    pub id: ScheduledId,

    /// Owning family
    pub family_id: FamilyId,

    /// Account postings go to
    pub account_id: AccountId,

    /// Category postings carry, if any
    pub category_id: Option<CategoryId>,

    /// Human name (e.g., "Rent", "Netflix")
    pub name: String,

    /// Amount each posting carries; negative = outflow
    pub amount: Money,

    /// Payee copied onto each posting
    #[serde(default)]
    pub payee: String,

    /// Memo copied onto each posting
    #[serde(default)]
    pub memo: String,

    /// First occurrence anchor
    pub start_date: NaiveDate,

    /// Recurrence rule; `None` means one-shot on `start_date`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,

    /// Next pending occurrence; `None` exactly when finished
    pub next_date: Option<NaiveDate>,

    /// Occurrences consumed so far (posted or skipped)
    #[serde(default)]
    pub occurrences_posted: u32,

    /// Lifecycle state
    #[serde(default)]
    pub status: ScheduledStatus,

    /// When the schedule was created
    pub created_at: DateTime<Utc>,
}

impl ScheduledTransaction {
    /// Create a new schedule. The caller computes and sets `next_date`
    /// before saving.
    pub fn new(
        family_id: FamilyId,
        account_id: AccountId,
        name: impl Into<String>,
        amount: Money,
        start_date: NaiveDate,
        recurrence: Option<RecurrenceRule>,
    ) -> Self {
        Self {
            id: ScheduledId::new(),
            family_id,
            account_id,
            category_id: None,
            name: name.into(),
            amount,
            payee: String::new(),
            memo: String::new(),
            start_date,
            recurrence,
            next_date: Some(start_date),
            occurrences_posted: 0,
            status: ScheduledStatus::Active,
            created_at: Utc::now(),
        }
    }

    /// Whether the schedule is one-shot (no recurrence rule)
    pub fn is_one_shot(&self) -> bool {
        self.recurrence.is_none()
    }

    /// Mark the schedule finished, clearing the pending occurrence
    pub fn finish(&mut self) {
        self.status = ScheduledStatus::Finished;
        self.next_date = None;
    }

    /// Validate the schedule, including its recurrence rule against the
    /// start date
    pub fn validate(&self) -> Result<(), ScheduledValidationError> {
        if self.name.trim().is_empty() {
            return Err(ScheduledValidationError::EmptyName);
        }
        if self.name.len() > 64 {
            return Err(ScheduledValidationError::NameTooLong(self.name.len()));
        }
        if self.amount.is_zero() {
            return Err(ScheduledValidationError::ZeroAmount);
        }
        if let Some(rule) = &self.recurrence {
            rule.validate(self.start_date)
                .map_err(|e| ScheduledValidationError::InvalidRecurrence(e.to_string()))?;
        }
        match (self.next_date, self.status) {
            (None, ScheduledStatus::Finished) => {}
            (Some(_), ScheduledStatus::Finished) | (None, _) => {
                return Err(ScheduledValidationError::NextDateStatusMismatch);
            }
            _ => {}
        }
        Ok(())
    }
}

/// Validation errors for scheduled transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledValidationError {
    EmptyName,
    NameTooLong(usize),
    ZeroAmount,
    InvalidRecurrence(String),
    NextDateStatusMismatch,
}

impl fmt::Display for ScheduledValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Schedule name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Schedule name too long ({} chars, max 64)", len)
            }
            Self::ZeroAmount => write!(f, "Schedule amount cannot be zero"),
            Self::InvalidRecurrence(msg) => write!(f, "Invalid recurrence: {}", msg),
            Self::NextDateStatusMismatch => {
                write!(f, "A schedule has a next date exactly when it is not finished")
            }
        }
    }
}

impl std::error::Error for ScheduledValidationError {}
