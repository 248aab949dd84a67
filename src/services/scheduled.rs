//! Scheduled transaction service
//!
//! The scheduling engine: creating schedules, advancing them (posting the
//! pending occurrence as a real transaction), skipping, pausing, resuming,
//! and expanding upcoming occurrences for preview windows and the calendar.
//!
//! Occurrence accounting: both `advance` and `skip` consume an occurrence
//! against a `Count` end condition. Occurrences that fall due while a
//! schedule is paused are dropped on resume and do not consume the count.

use chrono::{Duration, NaiveDate};

use crate::audit::EntityType;
use crate::error::{HearthError, HearthResult};
use crate::models::{
    Account, AccountId, Category, CategoryId, Money, RecurrenceRule, ScheduledId,
    ScheduledStatus, ScheduledTransaction, Transaction, TransactionSource, User,
};
use crate::storage::Storage;

/// One future occurrence of a schedule, produced by window expansion
#[derive(Debug, Clone)]
pub struct UpcomingOccurrence {
    pub scheduled_id: ScheduledId,
    pub name: String,
    pub account_id: AccountId,
    pub category_id: Option<CategoryId>,
    pub amount: Money,
    pub date: NaiveDate,
}

/// Result of advancing a schedule: the posted transaction and the schedule's
/// new state
#[derive(Debug, Clone)]
pub struct AdvanceOutcome {
    pub transaction: Transaction,
    pub schedule: ScheduledTransaction,
}

/// Fields that `edit` can change; `None` leaves the field untouched.
///
/// Changing the start date or recurrence rule rebases the schedule: the
/// pending occurrence is recomputed from the new anchor. The occurrence
/// counter is preserved, so a `Count` end condition keeps counting what was
/// already posted or skipped.
#[derive(Debug, Clone, Default)]
pub struct ScheduledPatch {
    pub name: Option<String>,
    pub account_id: Option<AccountId>,
    pub category_id: Option<Option<CategoryId>>,
    pub amount: Option<Money>,
    pub payee: Option<String>,
    pub memo: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub recurrence: Option<Option<RecurrenceRule>>,
}

/// Service for scheduled transaction management
pub struct ScheduledService<'a> {
    storage: &'a Storage,
    user: &'a User,
}

impl<'a> ScheduledService<'a> {
    /// Create a new scheduled transaction service acting as the given user
    pub fn new(storage: &'a Storage, user: &'a User) -> Self {
        Self { storage, user }
    }

    /// Create a schedule. With a recurrence rule the pending occurrence is
    /// the rule's first occurrence on/after the start date; without one the
    /// schedule is a one-shot pending on the start date itself.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &self,
        name: &str,
        account_id: AccountId,
        category_id: Option<CategoryId>,
        amount: Money,
        payee: &str,
        memo: &str,
        start_date: NaiveDate,
        recurrence: Option<RecurrenceRule>,
    ) -> HearthResult<ScheduledTransaction> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HearthError::Validation(
                "Schedule name cannot be empty".into(),
            ));
        }

        if self
            .storage
            .scheduled
            .name_exists(self.user.family_id, name, None)?
        {
            return Err(HearthError::Duplicate {
                entity_type: "Scheduled transaction",
                identifier: name.to_string(),
            });
        }

        let account = self.check_account(account_id)?;
        if account.archived {
            return Err(HearthError::Validation(format!(
                "Account '{}' is archived; unarchive it before scheduling against it",
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

        let mut sched = ScheduledTransaction::new(
            self.user.family_id,
            account_id,
            name,
            amount,
            start_date,
            recurrence,
        );
        sched.category_id = category_id;
        sched.payee = payee.trim().to_string();
        sched.memo = memo.trim().to_string();

        if let Some(rule) = &sched.recurrence {
            rule.validate(start_date)
                .map_err(HearthError::from)?;
            match rule.first_occurrence(start_date)? {
                Some(first) => sched.next_date = Some(first),
                // The end condition rules out every occurrence
                None => sched.finish(),
            }
        }

        sched
            .validate()
            .map_err(|e| HearthError::Validation(e.to_string()))?;

        self.storage.scheduled.upsert(sched.clone())?;
        self.storage.scheduled.save()?;

        self.storage.log_create(
            EntityType::Scheduled,
            sched.id.to_string(),
            Some(sched.name.clone()),
            &sched,
        )?;

        Ok(sched)
    }

    /// Load a schedule by id, enforcing family ownership
    pub fn get(&self, id: ScheduledId) -> HearthResult<ScheduledTransaction> {
        let sched = self
            .storage
            .scheduled
            .get(id)?
            .ok_or_else(|| HearthError::scheduled_not_found(id.to_string()))?;

        if sched.family_id != self.user.family_id {
            return Err(HearthError::permission_denied(
                "Scheduled transaction",
                id.to_string(),
            ));
        }

        Ok(sched)
    }

    /// Find a schedule within the family by name or ID string
    pub fn find(&self, identifier: &str) -> HearthResult<ScheduledTransaction> {
        if let Some(sched) = self
            .storage
            .scheduled
            .get_by_name(self.user.family_id, identifier)?
        {
            return Ok(sched);
        }

        if let Ok(id) = identifier.parse::<ScheduledId>() {
            return self.get(id);
        }

        Err(HearthError::scheduled_not_found(identifier))
    }

    /// List the family's schedules, soonest pending occurrence first
    pub fn list(&self) -> HearthResult<Vec<ScheduledTransaction>> {
        self.storage.scheduled.get_by_family(self.user.family_id)
    }

    /// Edit a schedule
    pub fn edit(&self, id: ScheduledId, patch: ScheduledPatch) -> HearthResult<ScheduledTransaction> {
        let mut sched = self.get(id)?;
        if sched.status == ScheduledStatus::Finished {
            return Err(HearthError::Scheduled(
                "Cannot edit a finished schedule".into(),
            ));
        }
        let before = sched.clone();

        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(HearthError::Validation(
                    "Schedule name cannot be empty".into(),
                ));
            }
            if self
                .storage
                .scheduled
                .name_exists(self.user.family_id, &name, Some(id))?
            {
                return Err(HearthError::Duplicate {
                    entity_type: "Scheduled transaction",
                    identifier: name,
                });
            }
            sched.name = name;
        }
        if let Some(account_id) = patch.account_id {
            self.check_account(account_id)?;
            sched.account_id = account_id;
        }
        if let Some(category_id) = patch.category_id {
            if let Some(category_id) = category_id {
                self.check_category(category_id)?;
            }
            sched.category_id = category_id;
        }
        if let Some(amount) = patch.amount {
            sched.amount = amount;
        }
        if let Some(payee) = patch.payee {
            sched.payee = payee.trim().to_string();
        }
        if let Some(memo) = patch.memo {
            sched.memo = memo.trim().to_string();
        }

        let rebase = patch.start_date.is_some() || patch.recurrence.is_some();
        if let Some(start_date) = patch.start_date {
            sched.start_date = start_date;
        }
        if let Some(recurrence) = patch.recurrence {
            sched.recurrence = recurrence;
        }

        if rebase {
            sched.status = ScheduledStatus::Active;
            match &sched.recurrence {
                Some(rule) => {
                    rule.validate(sched.start_date).map_err(HearthError::from)?;
                    // The new anchor does not forgive occurrences already
                    // consumed against a Count end condition
                    let next = rule.occurrence_after(
                        sched.start_date,
                        sched.start_date - Duration::days(1),
                        sched.occurrences_posted,
                    )?;
                    match next {
                        Some(first) => sched.next_date = Some(first),
                        None => sched.finish(),
                    }
                }
                None => sched.next_date = Some(sched.start_date),
            }
        }

        sched
            .validate()
            .map_err(|e| HearthError::Validation(e.to_string()))?;

        self.storage.scheduled.upsert(sched.clone())?;
        self.storage.scheduled.save()?;

        self.storage.log_update(
            EntityType::Scheduled,
            sched.id.to_string(),
            Some(sched.name.clone()),
            &before,
            &sched,
        )?;

        Ok(sched)
    }

    /// Post the pending occurrence as a real transaction and move the
    /// schedule to its next occurrence (or finish it).
    ///
    /// The transaction file is saved before the schedule file. If the
    /// process dies between the two writes, the schedule still points at the
    /// posted occurrence; the double-posting guard then refuses to post it
    /// again, and `skip` moves the schedule past it without a second
    /// transaction.
    pub fn advance(&self, id: ScheduledId) -> HearthResult<AdvanceOutcome> {
        let mut sched = self.get(id)?;

        if sched.status != ScheduledStatus::Active {
            return Err(HearthError::Scheduled(format!(
                "Cannot advance '{}': schedule is {}",
                sched.name, sched.status
            )));
        }
        let occurrence_date = sched
            .next_date
            .ok_or_else(|| HearthError::Scheduled("Schedule has no pending occurrence".into()))?;

        // Double-posting guard: one transaction per schedule per occurrence date
        if self
            .storage
            .transactions
            .exists_for_occurrence(sched.id, occurrence_date)?
        {
            return Err(HearthError::Scheduled(format!(
                "'{}' already has a posted transaction for {}; \
                 run `hearth scheduled skip {}` to move past it",
                sched.name, occurrence_date, sched.name
            )));
        }

        let mut txn = Transaction::new(
            sched.family_id,
            sched.account_id,
            occurrence_date,
            sched.amount,
        );
        txn.category_id = sched.category_id;
        txn.payee = if sched.payee.is_empty() {
            sched.name.clone()
        } else {
            sched.payee.clone()
        };
        txn.memo = sched.memo.clone();
        txn.source = TransactionSource::Scheduled;
        txn.scheduled_id = Some(sched.id);

        let before = sched.clone();
        sched.occurrences_posted += 1;
        self.move_to_next(&mut sched, occurrence_date)?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.scheduled.upsert(sched.clone())?;
        self.storage.transactions.save()?;
        self.storage.scheduled.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.payee.clone()),
            &txn,
        )?;
        self.storage.log_update(
            EntityType::Scheduled,
            sched.id.to_string(),
            Some(sched.name.clone()),
            &before,
            &sched,
        )?;

        Ok(AdvanceOutcome {
            transaction: txn,
            schedule: sched,
        })
    }

    /// Consume the pending occurrence without posting a transaction. The
    /// skipped occurrence still counts against a `Count` end condition.
    pub fn skip(&self, id: ScheduledId) -> HearthResult<ScheduledTransaction> {
        let mut sched = self.get(id)?;

        if sched.status != ScheduledStatus::Active {
            return Err(HearthError::Scheduled(format!(
                "Cannot skip '{}': schedule is {}",
                sched.name, sched.status
            )));
        }
        let occurrence_date = sched
            .next_date
            .ok_or_else(|| HearthError::Scheduled("Schedule has no pending occurrence".into()))?;

        let before = sched.clone();
        sched.occurrences_posted += 1;
        self.move_to_next(&mut sched, occurrence_date)?;

        self.storage.scheduled.upsert(sched.clone())?;
        self.storage.scheduled.save()?;

        self.storage.log_update(
            EntityType::Scheduled,
            sched.id.to_string(),
            Some(sched.name.clone()),
            &before,
            &sched,
        )?;

        Ok(sched)
    }

    /// Suspend an active schedule
    pub fn pause(&self, id: ScheduledId) -> HearthResult<ScheduledTransaction> {
        let mut sched = self.get(id)?;

        if sched.status != ScheduledStatus::Active {
            return Err(HearthError::Scheduled(format!(
                "Cannot pause '{}': schedule is {}",
                sched.name, sched.status
            )));
        }

        let before = sched.clone();
        sched.status = ScheduledStatus::Paused;

        self.storage.scheduled.upsert(sched.clone())?;
        self.storage.scheduled.save()?;

        self.storage.log_update(
            EntityType::Scheduled,
            sched.id.to_string(),
            Some(sched.name.clone()),
            &before,
            &sched,
        )?;

        Ok(sched)
    }

    /// Reactivate a paused schedule as of `today`. Occurrences that fell due
    /// while paused are dropped: the pending occurrence becomes the first
    /// one on/after `today`, and the dropped ones do not consume a `Count`.
    pub fn resume(&self, id: ScheduledId, today: NaiveDate) -> HearthResult<ScheduledTransaction> {
        let mut sched = self.get(id)?;

        if sched.status != ScheduledStatus::Paused {
            return Err(HearthError::Scheduled(format!(
                "Cannot resume '{}': schedule is {}",
                sched.name, sched.status
            )));
        }

        let before = sched.clone();
        sched.status = ScheduledStatus::Active;

        let pending = sched.next_date;
        match (&sched.recurrence, pending) {
            // Pending occurrence still in the future: nothing was missed
            (_, Some(date)) if date >= today => {}
            // One-shot whose date passed while paused
            (None, _) => sched.finish(),
            (Some(rule), _) => {
                let next = rule.occurrence_after(
                    sched.start_date,
                    today - Duration::days(1),
                    sched.occurrences_posted,
                )?;
                match next {
                    Some(date) => sched.next_date = Some(date),
                    None => sched.finish(),
                }
            }
        }

        self.storage.scheduled.upsert(sched.clone())?;
        self.storage.scheduled.save()?;

        self.storage.log_update(
            EntityType::Scheduled,
            sched.id.to_string(),
            Some(sched.name.clone()),
            &before,
            &sched,
        )?;

        Ok(sched)
    }

    /// Delete a schedule. Transactions already posted from it keep their
    /// schedule reference.
    pub fn delete(&self, id: ScheduledId) -> HearthResult<()> {
        let sched = self.get(id)?;

        self.storage.scheduled.delete(id)?;
        self.storage.scheduled.save()?;

        self.storage.log_delete(
            EntityType::Scheduled,
            sched.id.to_string(),
            Some(sched.name.clone()),
            &sched,
        )?;

        Ok(())
    }

    /// All schedules of the family that are due on or before `today`
    pub fn due(&self, today: NaiveDate) -> HearthResult<Vec<ScheduledTransaction>> {
        let active = self.storage.scheduled.get_active(self.user.family_id)?;
        Ok(active
            .into_iter()
            .filter(|s| matches!(s.next_date, Some(d) if d <= today))
            .collect())
    }

    /// Expand every active schedule over the window `[today, today + days]`,
    /// ascending by date. Overdue pending occurrences are included so they
    /// never silently vanish from the preview.
    pub fn upcoming(&self, today: NaiveDate, days: u32) -> HearthResult<Vec<UpcomingOccurrence>> {
        let range_end = today + Duration::days(days as i64);
        self.expand_window(today, range_end, true)
    }

    /// Expand every active schedule over one calendar month
    pub fn calendar(&self, year: i32, month: u32) -> HearthResult<Vec<UpcomingOccurrence>> {
        let range_start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| HearthError::Validation(format!("Invalid month: {}-{}", year, month)))?;
        let range_end = last_day_of_month(year, month)
            .ok_or_else(|| HearthError::Validation(format!("Invalid month: {}-{}", year, month)))?;
        self.expand_window(range_start, range_end, false)
    }

    fn expand_window(
        &self,
        range_start: NaiveDate,
        range_end: NaiveDate,
        include_overdue: bool,
    ) -> HearthResult<Vec<UpcomingOccurrence>> {
        const PER_SCHEDULE_LIMIT: usize = 100;

        let active = self.storage.scheduled.get_active(self.user.family_id)?;
        let mut out = Vec::new();

        for sched in active {
            let pending = match sched.next_date {
                Some(date) => date,
                None => continue,
            };

            match &sched.recurrence {
                None => {
                    let in_window = pending >= range_start && pending <= range_end;
                    let overdue = include_overdue && pending < range_start;
                    if in_window || overdue {
                        out.push(occurrence(&sched, pending));
                    }
                }
                Some(rule) => {
                    // Expansion starts at the pending occurrence so Count
                    // accounting lines up with occurrences_posted; an overdue
                    // pending shown separately consumes one slot itself
                    let mut occurrences_done = sched.occurrences_posted;
                    if include_overdue && pending < range_start {
                        out.push(occurrence(&sched, pending));
                        occurrences_done += 1;
                    }
                    let start = pending.max(range_start);
                    if start > range_end {
                        continue;
                    }
                    let dates = rule.occurrences_between(
                        sched.start_date,
                        start,
                        range_end,
                        occurrences_done,
                        PER_SCHEDULE_LIMIT,
                    )?;
                    out.extend(dates.into_iter().map(|d| occurrence(&sched, d)));
                }
            }
        }

        out.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
        Ok(out)
    }

    /// Compute the occurrence after `current` and either set it as pending
    /// or finish the schedule
    fn move_to_next(
        &self,
        sched: &mut ScheduledTransaction,
        current: NaiveDate,
    ) -> HearthResult<()> {
        match &sched.recurrence {
            None => sched.finish(),
            Some(rule) => {
                match rule.occurrence_after(sched.start_date, current, sched.occurrences_posted)? {
                    Some(next) => sched.next_date = Some(next),
                    None => sched.finish(),
                }
            }
        }
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

fn occurrence(sched: &ScheduledTransaction, date: NaiveDate) -> UpcomingOccurrence {
    UpcomingOccurrence {
        scheduled_id: sched.id,
        name: sched.name.clone(),
        account_id: sched.account_id,
        category_id: sched.category_id,
        amount: sched.amount,
        date,
    }
}

/// Last day of the given month, `None` for invalid months
fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).map(|d| d - Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HearthPaths;
    use crate::models::{
        Account, AccountType, CategoryKind, FamilyId, Frequency, RecurrenceEnd,
    };
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        storage: Storage,
        user: User,
        account_id: AccountId,
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
        let account_id = account.id;
        storage.accounts.upsert(account).unwrap();

        Fixture {
            _temp_dir: temp_dir,
            storage,
            user,
            account_id,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_rent(f: &Fixture, service: &ScheduledService) -> ScheduledTransaction {
        service
            .create(
                "Rent",
                f.account_id,
                None,
                Money::from_cents(-120000),
                "Landlord",
                "",
                date(2026, 2, 1),
                Some(RecurrenceRule::new(Frequency::Monthly, 1)),
            )
            .unwrap()
    }

    #[test]
    fn test_create_sets_first_occurrence() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);

        let sched = monthly_rent(&f, &service);
        assert_eq!(sched.next_date, Some(date(2026, 2, 1)));
        assert_eq!(sched.status, ScheduledStatus::Active);
    }

    #[test]
    fn test_create_constrained_first_occurrence_after_start() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);

        let mut rule = RecurrenceRule::new(Frequency::Monthly, 1);
        rule.by_monthday = Some(10);
        let sched = service
            .create(
                "Gym",
                f.account_id,
                None,
                Money::from_cents(-3000),
                "",
                "",
                date(2026, 1, 15),
                Some(rule),
            )
            .unwrap();

        // Jan 10 precedes the start date, so the series opens on Feb 10
        assert_eq!(sched.next_date, Some(date(2026, 2, 10)));
    }

    #[test]
    fn test_advance_posts_and_moves_on() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);
        let sched = monthly_rent(&f, &service);

        let outcome = service.advance(sched.id).unwrap();
        assert_eq!(outcome.transaction.date, date(2026, 2, 1));
        assert_eq!(outcome.transaction.amount.cents(), -120000);
        assert_eq!(outcome.transaction.source, TransactionSource::Scheduled);
        assert_eq!(outcome.transaction.scheduled_id, Some(sched.id));
        assert_eq!(outcome.transaction.payee, "Landlord");

        assert_eq!(outcome.schedule.next_date, Some(date(2026, 3, 1)));
        assert_eq!(outcome.schedule.occurrences_posted, 1);
    }

    #[test]
    fn test_advance_guards_double_posting() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);
        let sched = monthly_rent(&f, &service);

        service.advance(sched.id).unwrap();

        // Roll the schedule back to the already-posted occurrence
        let mut rolled_back = f.storage.scheduled.get(sched.id).unwrap().unwrap();
        rolled_back.next_date = Some(date(2026, 2, 1));
        f.storage.scheduled.upsert(rolled_back).unwrap();

        let err = service.advance(sched.id).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("already has a posted transaction"));
        // The error tells the user how to get unstuck
        assert!(msg.contains("skip"));

        // And skip does move the schedule past the posted occurrence
        let skipped = service.skip(sched.id).unwrap();
        assert_eq!(skipped.next_date, Some(date(2026, 3, 1)));
    }

    #[test]
    fn test_one_shot_finishes_after_advance() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);

        let sched = service
            .create(
                "Car Repair",
                f.account_id,
                None,
                Money::from_cents(-45000),
                "",
                "",
                date(2026, 3, 15),
                None,
            )
            .unwrap();

        let outcome = service.advance(sched.id).unwrap();
        assert_eq!(outcome.schedule.status, ScheduledStatus::Finished);
        assert!(outcome.schedule.next_date.is_none());

        assert!(service.advance(sched.id).is_err());
    }

    #[test]
    fn test_count_exhausts_after_advances_and_skips() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);

        let mut rule = RecurrenceRule::new(Frequency::Monthly, 1);
        rule.end = RecurrenceEnd::Count(3);
        let sched = service
            .create(
                "Installments",
                f.account_id,
                None,
                Money::from_cents(-10000),
                "",
                "",
                date(2026, 1, 5),
                Some(rule),
            )
            .unwrap();

        service.advance(sched.id).unwrap();
        // A skip consumes an occurrence just like an advance
        let after_skip = service.skip(sched.id).unwrap();
        assert_eq!(after_skip.occurrences_posted, 2);
        assert_eq!(after_skip.next_date, Some(date(2026, 3, 5)));

        let outcome = service.advance(sched.id).unwrap();
        assert_eq!(outcome.schedule.status, ScheduledStatus::Finished);
        assert!(outcome.schedule.next_date.is_none());
    }

    #[test]
    fn test_pause_blocks_advance() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);
        let sched = monthly_rent(&f, &service);

        service.pause(sched.id).unwrap();
        assert!(service.advance(sched.id).is_err());
        assert!(service.skip(sched.id).is_err());
        // Pausing twice fails
        assert!(service.pause(sched.id).is_err());
    }

    #[test]
    fn test_resume_drops_missed_occurrences() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);
        let sched = monthly_rent(&f, &service);

        service.pause(sched.id).unwrap();

        // Months go by; Feb through May fell due while paused
        let resumed = service.resume(sched.id, date(2026, 6, 15)).unwrap();
        assert_eq!(resumed.status, ScheduledStatus::Active);
        assert_eq!(resumed.next_date, Some(date(2026, 7, 1)));
        // Dropped occurrences did not consume the counter
        assert_eq!(resumed.occurrences_posted, 0);
    }

    #[test]
    fn test_resume_keeps_future_pending() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);
        let sched = monthly_rent(&f, &service);

        service.pause(sched.id).unwrap();
        let resumed = service.resume(sched.id, date(2026, 1, 20)).unwrap();
        assert_eq!(resumed.next_date, Some(date(2026, 2, 1)));
    }

    #[test]
    fn test_resume_occurrence_due_today_stays_pending() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);
        let sched = monthly_rent(&f, &service);

        service.pause(sched.id).unwrap();
        let resumed = service.resume(sched.id, date(2026, 2, 1)).unwrap();
        assert_eq!(resumed.next_date, Some(date(2026, 2, 1)));
    }

    #[test]
    fn test_resume_finishes_expired_one_shot() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);

        let sched = service
            .create(
                "Car Repair",
                f.account_id,
                None,
                Money::from_cents(-45000),
                "",
                "",
                date(2026, 3, 15),
                None,
            )
            .unwrap();

        service.pause(sched.id).unwrap();
        let resumed = service.resume(sched.id, date(2026, 4, 1)).unwrap();
        assert_eq!(resumed.status, ScheduledStatus::Finished);
    }

    #[test]
    fn test_upcoming_window() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);
        monthly_rent(&f, &service);

        let mut weekly = RecurrenceRule::new(Frequency::Weekly, 1);
        weekly.by_weekday = vec![chrono::Weekday::Mon];
        service
            .create(
                "Allowance",
                f.account_id,
                None,
                Money::from_cents(-2000),
                "",
                "",
                date(2026, 2, 2),
                Some(weekly),
            )
            .unwrap();

        // Window Feb 1-28: rent on the 1st, allowance Mondays 2/9/16/23
        let upcoming = service.upcoming(date(2026, 2, 1), 27).unwrap();
        let dates: Vec<(String, NaiveDate)> = upcoming
            .iter()
            .map(|o| (o.name.clone(), o.date))
            .collect();
        assert_eq!(
            dates,
            vec![
                ("Rent".to_string(), date(2026, 2, 1)),
                ("Allowance".to_string(), date(2026, 2, 2)),
                ("Allowance".to_string(), date(2026, 2, 9)),
                ("Allowance".to_string(), date(2026, 2, 16)),
                ("Allowance".to_string(), date(2026, 2, 23)),
            ]
        );
    }

    #[test]
    fn test_upcoming_includes_overdue_pending() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);
        monthly_rent(&f, &service);

        // Asking mid-February: the Feb 1 occurrence is overdue but shown
        let upcoming = service.upcoming(date(2026, 2, 10), 30).unwrap();
        assert_eq!(upcoming[0].date, date(2026, 2, 1));
        assert_eq!(upcoming[1].date, date(2026, 3, 1));
    }

    #[test]
    fn test_upcoming_skips_paused() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);
        let sched = monthly_rent(&f, &service);
        service.pause(sched.id).unwrap();

        assert!(service.upcoming(date(2026, 2, 1), 60).unwrap().is_empty());
    }

    #[test]
    fn test_calendar_month_expansion() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);
        monthly_rent(&f, &service);

        let march = service.calendar(2026, 3).unwrap();
        assert_eq!(march.len(), 1);
        assert_eq!(march[0].date, date(2026, 3, 1));

        assert!(service.calendar(2026, 13).is_err());
    }

    #[test]
    fn test_due_lists_overdue_and_today() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);
        monthly_rent(&f, &service);

        assert!(service.due(date(2026, 1, 31)).unwrap().is_empty());
        assert_eq!(service.due(date(2026, 2, 1)).unwrap().len(), 1);
        assert_eq!(service.due(date(2026, 2, 15)).unwrap().len(), 1);
    }

    #[test]
    fn test_edit_rebases_on_recurrence_change() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);
        let sched = monthly_rent(&f, &service);
        service.advance(sched.id).unwrap();

        let mut rule = RecurrenceRule::new(Frequency::Monthly, 1);
        rule.by_monthday = Some(15);
        let edited = service
            .edit(
                sched.id,
                ScheduledPatch {
                    recurrence: Some(Some(rule)),
                    start_date: Some(date(2026, 4, 1)),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(edited.next_date, Some(date(2026, 4, 15)));
        // Rebasing never forgets what was already posted
        assert_eq!(edited.occurrences_posted, 1);
    }

    #[test]
    fn test_edit_rebase_keeps_count_accounting() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);

        let mut rule = RecurrenceRule::new(Frequency::Monthly, 1);
        rule.end = RecurrenceEnd::Count(3);
        let sched = service
            .create(
                "Installments",
                f.account_id,
                None,
                Money::from_cents(-10000),
                "",
                "",
                date(2026, 1, 5),
                Some(rule),
            )
            .unwrap();

        service.advance(sched.id).unwrap();
        service.advance(sched.id).unwrap();

        // Moving the anchor leaves one occurrence, not three
        let mut rule = RecurrenceRule::new(Frequency::Monthly, 1);
        rule.end = RecurrenceEnd::Count(3);
        let edited = service
            .edit(
                sched.id,
                ScheduledPatch {
                    start_date: Some(date(2026, 6, 1)),
                    recurrence: Some(Some(rule)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(edited.occurrences_posted, 2);
        assert_eq!(edited.next_date, Some(date(2026, 6, 1)));

        let outcome = service.advance(sched.id).unwrap();
        assert_eq!(outcome.schedule.status, ScheduledStatus::Finished);
        assert!(outcome.schedule.next_date.is_none());
    }

    #[test]
    fn test_create_rejects_archived_account() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);

        let mut account = f.storage.accounts.get(f.account_id).unwrap().unwrap();
        account.archive();
        f.storage.accounts.upsert(account).unwrap();

        let err = service
            .create(
                "Rent",
                f.account_id,
                None,
                Money::from_cents(-120000),
                "",
                "",
                date(2026, 2, 1),
                Some(RecurrenceRule::new(Frequency::Monthly, 1)),
            )
            .unwrap_err();
        assert!(matches!(err, HearthError::Validation(ref msg) if msg.contains("archived")));
    }

    #[test]
    fn test_create_rejects_archived_category() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);

        let mut category = Category::new(f.user.family_id, "Rent", CategoryKind::Expense);
        category.archive();
        let category_id = category.id;
        f.storage.categories.upsert(category).unwrap();

        let err = service
            .create(
                "Rent",
                f.account_id,
                Some(category_id),
                Money::from_cents(-120000),
                "",
                "",
                date(2026, 2, 1),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, HearthError::Validation(ref msg) if msg.contains("archived")));
    }

    #[test]
    fn test_upcoming_overdue_counts_against_count_rule() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);

        let mut rule = RecurrenceRule::new(Frequency::Monthly, 1);
        rule.end = RecurrenceEnd::Count(2);
        service
            .create(
                "Installments",
                f.account_id,
                None,
                Money::from_cents(-10000),
                "",
                "",
                date(2026, 2, 1),
                Some(rule),
            )
            .unwrap();

        // Feb 1 is overdue by Feb 10; only Mar 1 remains of the two
        let upcoming = service.upcoming(date(2026, 2, 10), 120).unwrap();
        let dates: Vec<NaiveDate> = upcoming.iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![date(2026, 2, 1), date(2026, 3, 1)]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);
        monthly_rent(&f, &service);

        let result = service.create(
            "rent",
            f.account_id,
            None,
            Money::from_cents(-1000),
            "",
            "",
            date(2026, 2, 1),
            None,
        );
        assert!(matches!(result, Err(HearthError::Duplicate { .. })));
    }

    #[test]
    fn test_foreign_schedule_is_permission_denied() {
        let f = fixture();
        let service = ScheduledService::new(&f.storage, &f.user);

        let foreign = ScheduledTransaction::new(
            FamilyId::new(),
            AccountId::new(),
            "Foreign",
            Money::from_cents(-1000),
            date(2026, 1, 1),
            None,
        );
        let foreign_id = foreign.id;
        f.storage.scheduled.upsert(foreign).unwrap();

        assert!(service.get(foreign_id).unwrap_err().is_permission_denied());
        assert!(service.get(ScheduledId::new()).unwrap_err().is_not_found());
    }
}
