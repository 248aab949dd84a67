//! Transaction service
//!
//! Business logic for posting, listing, editing, and deleting transactions.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{HearthError, HearthResult};
use crate::models::{
    Account, AccountId, Category, CategoryId, Money, Transaction, TransactionId,
    TransactionSource, User,
};
use crate::storage::Storage;

/// Filters for listing transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Restrict to one account
    pub account_id: Option<AccountId>,
    /// Restrict to one category
    pub category_id: Option<CategoryId>,
    /// Earliest date (inclusive)
    pub from: Option<NaiveDate>,
    /// Latest date (inclusive)
    pub to: Option<NaiveDate>,
    /// Restrict to one source (manual, scheduled, imported)
    pub source: Option<TransactionSource>,
    /// Maximum number of rows returned (newest first)
    pub limit: Option<usize>,
}

/// Fields that `edit` can change; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub account_id: Option<AccountId>,
    pub category_id: Option<Option<CategoryId>>,
    pub date: Option<NaiveDate>,
    pub amount: Option<Money>,
    pub payee: Option<String>,
    pub memo: Option<String>,
}

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
    user: &'a User,
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service acting as the given user
    pub fn new(storage: &'a Storage, user: &'a User) -> Self {
        Self { storage, user }
    }

    /// Post a manual transaction
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &self,
        account_id: AccountId,
        category_id: Option<CategoryId>,
        date: NaiveDate,
        amount: Money,
        payee: &str,
        memo: &str,
    ) -> HearthResult<Transaction> {
        let account = self.check_account(account_id)?;
        if account.archived {
            return Err(HearthError::Validation(format!(
                "Account '{}' is archived; unarchive it before posting to it",
                account.name
            )));
        }
        if let Some(category_id) = category_id {
            let category = self.check_category(category_id)?;
            if category.archived {
                return Err(HearthError::Validation(format!(
                    "Category '{}' is archived; unarchive it before using it",
                    category.name
                )));
            }
        }

        let mut txn = Transaction::new(self.user.family_id, account_id, date, amount);
        txn.category_id = category_id;
        txn.payee = payee.trim().to_string();
        txn.memo = memo.trim().to_string();

        txn.validate()
            .map_err(|e| HearthError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.payee.clone()),
            &txn,
        )?;

        Ok(txn)
    }

    /// Load a transaction by id, enforcing family ownership
    pub fn get(&self, id: TransactionId) -> HearthResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| HearthError::transaction_not_found(id.to_string()))?;

        if txn.family_id != self.user.family_id {
            return Err(HearthError::permission_denied(
                "Transaction",
                id.to_string(),
            ));
        }

        Ok(txn)
    }

    /// List the family's transactions, newest first, applying filters
    pub fn list(&self, filter: &TransactionFilter) -> HearthResult<Vec<Transaction>> {
        let mut txns = self.storage.transactions.get_by_family(self.user.family_id)?;

        if let Some(account_id) = filter.account_id {
            txns.retain(|t| t.account_id == account_id);
        }
        if let Some(category_id) = filter.category_id {
            txns.retain(|t| t.category_id == Some(category_id));
        }
        if let Some(from) = filter.from {
            txns.retain(|t| t.date >= from);
        }
        if let Some(to) = filter.to {
            txns.retain(|t| t.date <= to);
        }
        if let Some(source) = filter.source {
            txns.retain(|t| t.source == source);
        }
        if let Some(limit) = filter.limit {
            txns.truncate(limit);
        }

        Ok(txns)
    }

    /// Edit a transaction
    pub fn edit(&self, id: TransactionId, patch: TransactionPatch) -> HearthResult<Transaction> {
        let mut txn = self.get(id)?;
        let before = txn.clone();

        if let Some(account_id) = patch.account_id {
            self.check_account(account_id)?;
            txn.account_id = account_id;
        }
        if let Some(category_id) = patch.category_id {
            if let Some(category_id) = category_id {
                self.check_category(category_id)?;
            }
            txn.category_id = category_id;
        }
        if let Some(date) = patch.date {
            txn.date = date;
        }
        if let Some(amount) = patch.amount {
            txn.amount = amount;
        }
        if let Some(payee) = patch.payee {
            txn.payee = payee.trim().to_string();
        }
        if let Some(memo) = patch.memo {
            txn.memo = memo.trim().to_string();
        }

        txn.validate()
            .map_err(|e| HearthError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.payee.clone()),
            &before,
            &txn,
        )?;

        Ok(txn)
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> HearthResult<()> {
        let txn = self.get(id)?;

        self.storage.transactions.delete(id)?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.payee.clone()),
            &txn,
        )?;

        Ok(())
    }

    fn check_account(&self, account_id: AccountId) -> HearthResult<Account> {
        let account = self
            .storage
            .accounts
            .get(account_id)?
            .ok_or_else(|| HearthError::account_not_found(account_id.to_string()))?;

        if account.family_id != self.user.family_id {
            return Err(HearthError::permission_denied(
                "Account",
                account_id.to_string(),
            ));
        }

        Ok(account)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HearthPaths;
    use crate::models::{Account, AccountType, Category, CategoryKind, FamilyId};
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        storage: Storage,
        user: User,
        account_id: AccountId,
        category_id: CategoryId,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let user = User::new(FamilyId::new(), "kim@example.com", "Kim", "$argon2id$stub");
        let account = Account::new(
            user.family_id,
            "Checking",
            AccountType::Checking,
            Money::zero(),
        );
        let category = Category::new(user.family_id, "Groceries", CategoryKind::Expense);
        let account_id = account.id;
        let category_id = category.id;
        storage.accounts.upsert(account).unwrap();
        storage.categories.upsert(category).unwrap();

        Fixture {
            _temp_dir: temp_dir,
            storage,
            user,
            account_id,
            category_id,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_create_transaction() {
        let f = fixture();
        let service = TransactionService::new(&f.storage, &f.user);

        let txn = service
            .create(
                f.account_id,
                Some(f.category_id),
                date(2026, 1, 15),
                Money::from_cents(-4250),
                "Corner Store",
                "weekly shop",
            )
            .unwrap();

        assert_eq!(txn.payee, "Corner Store");
        assert_eq!(txn.family_id, f.user.family_id);
    }

    #[test]
    fn test_create_rejects_foreign_account() {
        let f = fixture();
        let service = TransactionService::new(&f.storage, &f.user);

        let foreign = Account::new(
            FamilyId::new(),
            "Foreign",
            AccountType::Checking,
            Money::zero(),
        );
        let foreign_id = foreign.id;
        f.storage.accounts.upsert(foreign).unwrap();

        let err = service
            .create(
                foreign_id,
                None,
                date(2026, 1, 1),
                Money::from_cents(-100),
                "",
                "",
            )
            .unwrap_err();
        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_create_rejects_archived_account() {
        let f = fixture();
        let service = TransactionService::new(&f.storage, &f.user);

        let mut account = f.storage.accounts.get(f.account_id).unwrap().unwrap();
        account.archive();
        f.storage.accounts.upsert(account).unwrap();

        let err = service
            .create(
                f.account_id,
                None,
                date(2026, 1, 1),
                Money::from_cents(-100),
                "Store",
                "",
            )
            .unwrap_err();
        assert!(matches!(err, HearthError::Validation(ref msg) if msg.contains("archived")));
    }

    #[test]
    fn test_create_rejects_archived_category() {
        let f = fixture();
        let service = TransactionService::new(&f.storage, &f.user);

        let mut category = f.storage.categories.get(f.category_id).unwrap().unwrap();
        category.archive();
        f.storage.categories.upsert(category).unwrap();

        let err = service
            .create(
                f.account_id,
                Some(f.category_id),
                date(2026, 1, 1),
                Money::from_cents(-100),
                "Store",
                "",
            )
            .unwrap_err();
        assert!(matches!(err, HearthError::Validation(ref msg) if msg.contains("archived")));
    }

    #[test]
    fn test_edit_keeps_archived_category_reachable() {
        // Archiving a category must not lock its history; edits that touch
        // other fields still succeed.
        let f = fixture();
        let service = TransactionService::new(&f.storage, &f.user);

        let txn = service
            .create(
                f.account_id,
                Some(f.category_id),
                date(2026, 1, 15),
                Money::from_cents(-4250),
                "Corner Store",
                "",
            )
            .unwrap();

        let mut category = f.storage.categories.get(f.category_id).unwrap().unwrap();
        category.archive();
        f.storage.categories.upsert(category).unwrap();

        let edited = service
            .edit(
                txn.id,
                TransactionPatch {
                    memo: Some("late receipt".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(edited.memo, "late receipt");
        assert_eq!(edited.category_id, Some(f.category_id));
    }

    #[test]
    fn test_list_filters() {
        let f = fixture();
        let service = TransactionService::new(&f.storage, &f.user);

        for day in [5, 10, 15] {
            service
                .create(
                    f.account_id,
                    Some(f.category_id),
                    date(2026, 1, day),
                    Money::from_cents(-1000),
                    "Store",
                    "",
                )
                .unwrap();
        }

        let all = service.list(&TransactionFilter::default()).unwrap();
        assert_eq!(all.len(), 3);
        // Newest first
        assert_eq!(all[0].date, date(2026, 1, 15));

        let filtered = service
            .list(&TransactionFilter {
                from: Some(date(2026, 1, 8)),
                to: Some(date(2026, 1, 12)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].date, date(2026, 1, 10));

        let limited = service
            .list(&TransactionFilter {
                limit: Some(2),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_edit() {
        let f = fixture();
        let service = TransactionService::new(&f.storage, &f.user);

        let txn = service
            .create(
                f.account_id,
                Some(f.category_id),
                date(2026, 1, 15),
                Money::from_cents(-4250),
                "Corner Store",
                "",
            )
            .unwrap();

        let edited = service
            .edit(
                txn.id,
                TransactionPatch {
                    amount: Some(Money::from_cents(-5000)),
                    category_id: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(edited.amount.cents(), -5000);
        assert!(edited.category_id.is_none());
        assert_eq!(edited.payee, "Corner Store");
    }

    #[test]
    fn test_delete() {
        let f = fixture();
        let service = TransactionService::new(&f.storage, &f.user);

        let txn = service
            .create(
                f.account_id,
                None,
                date(2026, 1, 15),
                Money::from_cents(-100),
                "X",
                "",
            )
            .unwrap();

        service.delete(txn.id).unwrap();
        assert!(service.get(txn.id).unwrap_err().is_not_found());
    }
}
