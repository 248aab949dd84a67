//! Account service
//!
//! Business logic for account management: CRUD, balance calculation, and
//! validation. Every operation is scoped to the acting user's family.

use crate::audit::EntityType;
use crate::error::{HearthError, HearthResult};
use crate::models::{Account, AccountId, AccountType, Money, User};
use crate::storage::Storage;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
    user: &'a User,
}

/// An account with its computed balance
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub account: Account,
    /// Current balance (starting balance + all transactions)
    pub balance: Money,
    /// Number of transactions posted to the account
    pub transaction_count: usize,
}

impl<'a> AccountService<'a> {
    /// Create a new account service acting as the given user
    pub fn new(storage: &'a Storage, user: &'a User) -> Self {
        Self { storage, user }
    }

    /// Create a new account
    pub fn create(
        &self,
        name: &str,
        account_type: AccountType,
        starting_balance: Money,
    ) -> HearthResult<Account> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HearthError::Validation(
                "Account name cannot be empty".into(),
            ));
        }

        if self
            .storage
            .accounts
            .name_exists(self.user.family_id, name, None)?
        {
            return Err(HearthError::Duplicate {
                entity_type: "Account",
                identifier: name.to_string(),
            });
        }

        let account = Account::new(self.user.family_id, name, account_type, starting_balance);

        account
            .validate()
            .map_err(|e| HearthError::Validation(e.to_string()))?;

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        self.storage.log_create(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &account,
        )?;

        Ok(account)
    }

    /// Load an account by id, enforcing family ownership
    pub fn get(&self, id: AccountId) -> HearthResult<Account> {
        let account = self
            .storage
            .accounts
            .get(id)?
            .ok_or_else(|| HearthError::account_not_found(id.to_string()))?;

        if account.family_id != self.user.family_id {
            return Err(HearthError::permission_denied("Account", id.to_string()));
        }

        Ok(account)
    }

    /// Find an account within the family by name or ID string
    pub fn find(&self, identifier: &str) -> HearthResult<Account> {
        if let Some(account) = self
            .storage
            .accounts
            .get_by_name(self.user.family_id, identifier)?
        {
            return Ok(account);
        }

        if let Ok(id) = identifier.parse::<AccountId>() {
            return self.get(id);
        }

        Err(HearthError::account_not_found(identifier))
    }

    /// List the family's accounts
    pub fn list(&self, include_archived: bool) -> HearthResult<Vec<Account>> {
        if include_archived {
            self.storage.accounts.get_by_family(self.user.family_id)
        } else {
            self.storage.accounts.get_active(self.user.family_id)
        }
    }

    /// List the family's accounts with computed balances
    pub fn list_with_balances(&self, include_archived: bool) -> HearthResult<Vec<AccountSummary>> {
        let accounts = self.list(include_archived)?;
        let mut summaries = Vec::with_capacity(accounts.len());

        for account in accounts {
            summaries.push(self.summarize(&account)?);
        }

        Ok(summaries)
    }

    /// Compute the summary for one account
    pub fn summarize(&self, account: &Account) -> HearthResult<AccountSummary> {
        let transactions = self.storage.transactions.get_by_account(account.id)?;
        let transaction_total: Money = transactions.iter().map(|t| t.amount).sum();

        Ok(AccountSummary {
            balance: account.starting_balance + transaction_total,
            transaction_count: transactions.len(),
            account: account.clone(),
        })
    }

    /// Calculate the current balance for an account
    pub fn balance(&self, id: AccountId) -> HearthResult<Money> {
        let account = self.get(id)?;
        Ok(self.summarize(&account)?.balance)
    }

    /// Rename an account
    pub fn rename(&self, id: AccountId, new_name: &str) -> HearthResult<Account> {
        let mut account = self.get(id)?;

        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(HearthError::Validation(
                "Account name cannot be empty".into(),
            ));
        }

        if self
            .storage
            .accounts
            .name_exists(self.user.family_id, new_name, Some(id))?
        {
            return Err(HearthError::Duplicate {
                entity_type: "Account",
                identifier: new_name.to_string(),
            });
        }

        let before = account.clone();
        account.name = new_name.to_string();

        account
            .validate()
            .map_err(|e| HearthError::Validation(e.to_string()))?;

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        self.storage.log_update(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &before,
            &account,
        )?;

        Ok(account)
    }

    /// Archive an account (soft delete)
    pub fn archive(&self, id: AccountId) -> HearthResult<Account> {
        let mut account = self.get(id)?;

        if account.archived {
            return Err(HearthError::Validation(
                "Account is already archived".into(),
            ));
        }

        let before = account.clone();
        account.archive();

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        self.storage.log_update(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &before,
            &account,
        )?;

        Ok(account)
    }

    /// Unarchive an account
    pub fn unarchive(&self, id: AccountId) -> HearthResult<Account> {
        let mut account = self.get(id)?;

        if !account.archived {
            return Err(HearthError::Validation("Account is not archived".into()));
        }

        let before = account.clone();
        account.unarchive();

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        self.storage.log_update(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &before,
            &account,
        )?;

        Ok(account)
    }
}
