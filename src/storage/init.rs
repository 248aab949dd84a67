//! Storage initialization
//!
//! Seeds the default category set for a newly created family.

use crate::error::HearthError;
use crate::models::{Category, CategoryKind, FamilyId};

use super::Storage;

/// Default expense categories every new family starts with
const DEFAULT_EXPENSE_CATEGORIES: &[&str] = &[
    "Groceries",
    "Rent",
    "Utilities",
    "Transport",
    "Dining Out",
    "Entertainment",
    "Health",
    "Subscriptions",
];

/// Default income categories every new family starts with
const DEFAULT_INCOME_CATEGORIES: &[&str] = &["Salary", "Other Income"];

/// Create the default categories for a new family
///
/// The caller saves the category repository afterwards. Creation entries are
/// written to the audit log without an actor since this runs during
/// registration, before a session exists.
pub fn seed_default_categories(storage: &Storage, family_id: FamilyId) -> Result<(), HearthError> {
    for name in DEFAULT_EXPENSE_CATEGORIES {
        let category = Category::new(family_id, *name, CategoryKind::Expense);
        storage.categories.upsert(category)?;
    }

    for name in DEFAULT_INCOME_CATEGORIES {
        let category = Category::new(family_id, *name, CategoryKind::Income);
        storage.categories.upsert(category)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HearthPaths;
    use crate::models::CategoryKind;
    use tempfile::TempDir;

    #[test]
    fn test_seed_default_categories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let family_id = FamilyId::new();
        seed_default_categories(&storage, family_id).unwrap();

        let categories = storage.categories.get_by_family(family_id).unwrap();
        assert_eq!(
            categories.len(),
            DEFAULT_EXPENSE_CATEGORIES.len() + DEFAULT_INCOME_CATEGORIES.len()
        );
        assert!(categories
            .iter()
            .any(|c| c.name == "Groceries" && c.kind == CategoryKind::Expense));
        assert!(categories
            .iter()
            .any(|c| c.name == "Salary" && c.kind == CategoryKind::Income));
    }

    #[test]
    fn test_seeding_is_per_family() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let family_a = FamilyId::new();
        let family_b = FamilyId::new();
        seed_default_categories(&storage, family_a).unwrap();
        seed_default_categories(&storage, family_b).unwrap();

        assert_eq!(
            storage.categories.get_by_family(family_a).unwrap().len(),
            DEFAULT_EXPENSE_CATEGORIES.len() + DEFAULT_INCOME_CATEGORIES.len()
        );
    }
}
