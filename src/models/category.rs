//! Category model
//!
//! Flat list of spending/income categories. Names are unique
//! case-insensitively within a family and kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{CategoryId, FamilyId};

/// Whether a category classifies spending or income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    #[default]
    Expense,
    Income,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "Expense"),
            Self::Income => write!(f, "Income"),
        }
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            _ => Err(format!(
                "Invalid category kind: '{}'. Valid kinds: expense, income",
                s
            )),
        }
    }
}

/// A transaction category owned by a family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Owning family
    pub family_id: FamilyId,

    /// Category name (e.g., "Groceries")
    pub name: String,

    /// Expense or income
    pub kind: CategoryKind,

    /// Whether this category is archived (soft-deleted)
    pub archived: bool,

    /// When the category was created
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category
    pub fn new(family_id: FamilyId, name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: CategoryId::new(),
            family_id,
            name: name.into(),
            kind,
            archived: false,
            created_at: Utc::now(),
        }
    }

    /// Mark this category as archived
    pub fn archive(&mut self) {
        self.archived = true;
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        if self.name.len() > 64 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }
        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 64)", len)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new(FamilyId::new(), "Groceries", CategoryKind::Expense);
        assert_eq!(category.name, "Groceries");
        assert_eq!(category.kind, CategoryKind::Expense);
        assert!(!category.archived);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("expense".parse::<CategoryKind>(), Ok(CategoryKind::Expense));
        assert_eq!("Income".parse::<CategoryKind>(), Ok(CategoryKind::Income));
        assert!("other".parse::<CategoryKind>().is_err());
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new(FamilyId::new(), "Valid", CategoryKind::Expense);
        assert!(category.validate().is_ok());

        category.name = " ".to_string();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));
    }

    #[test]
    fn test_serialization() {
        let category = Category::new(FamilyId::new(), "Salary", CategoryKind::Income);
        let json = serde_json::to_string(&category).unwrap();
        assert!(json.contains("\"kind\":\"income\""));

        let deserialized: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(category.id, deserialized.id);
    }
}
