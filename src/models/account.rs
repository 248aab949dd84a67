//! Account model
//!
//! Represents financial accounts (checking, savings, credit cards, etc.).
//! The current balance is never stored; it is always computed as the starting
//! balance plus the sum of the account's transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{AccountId, FamilyId};
use super::money::Money;

/// Type of financial account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Checking account
    Checking,
    /// Savings account
    Savings,
    /// Credit card
    Credit,
    /// Cash/wallet
    Cash,
    /// Investment account
    Investment,
}

impl AccountType {
    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "checking" => Some(Self::Checking),
            "savings" => Some(Self::Savings),
            "credit" | "credit_card" | "creditcard" => Some(Self::Credit),
            "cash" => Some(Self::Cash),
            "investment" => Some(Self::Investment),
            _ => None,
        }
    }
}

impl Default for AccountType {
    fn default() -> Self {
        Self::Checking
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => write!(f, "Checking"),
            Self::Savings => write!(f, "Savings"),
            Self::Credit => write!(f, "Credit Card"),
            Self::Cash => write!(f, "Cash"),
            Self::Investment => write!(f, "Investment"),
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "Invalid account type: '{}'. Valid types: checking, savings, credit, cash, investment",
                s
            )
        })
    }
}

/// A financial account owned by a family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Owning family
    pub family_id: FamilyId,

    /// Account name (e.g., "Chase Checking")
    pub name: String,

    /// Type of account
    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Opening balance when the account was created
    pub starting_balance: Money,

    /// Whether this account is archived (soft-deleted)
    pub archived: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account
    pub fn new(
        family_id: FamilyId,
        name: impl Into<String>,
        account_type: AccountType,
        starting_balance: Money,
    ) -> Self {
        Self {
            id: AccountId::new(),
            family_id,
            name: name.into(),
            account_type,
            starting_balance,
            archived: false,
            created_at: Utc::now(),
        }
    }

    /// Mark this account as archived
    pub fn archive(&mut self) {
        self.archived = true;
    }

    /// Unarchive this account
    pub fn unarchive(&mut self) {
        self.archived = false;
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.len() > 64 {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 64)", len)
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account() {
        let account = Account::new(
            FamilyId::new(),
            "Checking",
            AccountType::Checking,
            Money::from_cents(100000),
        );
        assert_eq!(account.name, "Checking");
        assert_eq!(account.account_type, AccountType::Checking);
        assert_eq!(account.starting_balance.cents(), 100000);
        assert!(!account.archived);
    }

    #[test]
    fn test_archive() {
        let mut account = Account::new(FamilyId::new(), "Test", AccountType::Checking, Money::zero());
        assert!(!account.archived);

        account.archive();
        assert!(account.archived);

        account.unarchive();
        assert!(!account.archived);
    }

    #[test]
    fn test_validation() {
        let mut account =
            Account::new(FamilyId::new(), "Valid Name", AccountType::Checking, Money::zero());
        assert!(account.validate().is_ok());

        account.name = String::new();
        assert_eq!(account.validate(), Err(AccountValidationError::EmptyName));

        account.name = "a".repeat(65);
        assert!(matches!(
            account.validate(),
            Err(AccountValidationError::NameTooLong(_))
        ));
    }

    #[test]
    fn test_account_type_parsing() {
        assert_eq!(AccountType::parse("checking"), Some(AccountType::Checking));
        assert_eq!(AccountType::parse("SAVINGS"), Some(AccountType::Savings));
        assert_eq!(AccountType::parse("credit_card"), Some(AccountType::Credit));
        assert_eq!(AccountType::parse("invalid"), None);
    }

    #[test]
    fn test_account_type_from_str() {
        let t: AccountType = "cash".parse().unwrap();
        assert_eq!(t, AccountType::Cash);
        assert!("bogus".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_serialization() {
        let account = Account::new(FamilyId::new(), "Test", AccountType::Credit, Money::zero());
        let json = serde_json::to_string(&account).unwrap();
        assert!(json.contains("\"type\":\"credit\""));

        let deserialized: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(account.id, deserialized.id);
        assert_eq!(account.family_id, deserialized.family_id);
    }

    #[test]
    fn test_display() {
        let account = Account::new(FamilyId::new(), "My Checking", AccountType::Checking, Money::zero());
        assert_eq!(format!("{}", account), "My Checking (Checking)");
    }
}
