//! Scheduled transaction repository for JSON storage
//!
//! Manages loading and saving scheduled transactions to scheduled.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::HearthError;
use crate::models::{FamilyId, ScheduledId, ScheduledStatus, ScheduledTransaction};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct ScheduledData {
    scheduled: Vec<ScheduledTransaction>,
}

/// Repository for scheduled transaction persistence
pub struct ScheduledRepository {
    path: PathBuf,
    data: RwLock<HashMap<ScheduledId, ScheduledTransaction>>,
}

impl ScheduledRepository {
    /// Create a new scheduled transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load scheduled transactions from disk
    pub fn load(&self) -> Result<(), HearthError> {
        let file_data: ScheduledData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for sched in file_data.scheduled {
            data.insert(sched.id, sched);
        }

        Ok(())
    }

    /// Save scheduled transactions to disk
    pub fn save(&self) -> Result<(), HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = ScheduledData {
            scheduled: data.values().cloned().collect(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get a scheduled transaction by ID
    pub fn get(&self, id: ScheduledId) -> Result<Option<ScheduledTransaction>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all schedules of a family, soonest next occurrence first;
    /// finished schedules sort last
    pub fn get_by_family(
        &self,
        family_id: FamilyId,
    ) -> Result<Vec<ScheduledTransaction>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut scheds: Vec<_> = data
            .values()
            .filter(|s| s.family_id == family_id)
            .cloned()
            .collect();
        scheds.sort_by(|a, b| match (a.next_date, b.next_date) {
            (Some(x), Some(y)) => x.cmp(&y).then(a.name.cmp(&b.name)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.name.cmp(&b.name),
        });
        Ok(scheds)
    }

    /// Get all active schedules of a family
    pub fn get_active(&self, family_id: FamilyId) -> Result<Vec<ScheduledTransaction>, HearthError> {
        let all = self.get_by_family(family_id)?;
        Ok(all
            .into_iter()
            .filter(|s| s.status == ScheduledStatus::Active)
            .collect())
    }

    /// Get a schedule by name within a family (case-insensitive)
    pub fn get_by_name(
        &self,
        family_id: FamilyId,
        name: &str,
    ) -> Result<Option<ScheduledTransaction>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name_lower = name.to_lowercase();
        Ok(data
            .values()
            .find(|s| s.family_id == family_id && s.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Check if a schedule name is already taken within a family
    pub fn name_exists(
        &self,
        family_id: FamilyId,
        name: &str,
        exclude_id: Option<ScheduledId>,
    ) -> Result<bool, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name_lower = name.to_lowercase();
        Ok(data.values().any(|s| {
            s.family_id == family_id
                && s.name.to_lowercase() == name_lower
                && Some(s.id) != exclude_id
        }))
    }

    /// Insert or update a scheduled transaction
    pub fn upsert(&self, sched: ScheduledTransaction) -> Result<(), HearthError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(sched.id, sched);
        Ok(())
    }

    /// Delete a scheduled transaction
    pub fn delete(&self, id: ScheduledId) -> Result<bool, HearthError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    /// Count scheduled transactions
    pub fn count(&self) -> Result<usize, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn test_repo() -> (TempDir, ScheduledRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ScheduledRepository::new(temp_dir.path().join("scheduled.json"));
        (temp_dir, repo)
    }

    fn sched(family: FamilyId, name: &str, day: u32) -> ScheduledTransaction {
        ScheduledTransaction::new(
            family,
            AccountId::new(),
            name,
            Money::from_cents(-1000),
            NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            None,
        )
    }

    #[test]
    fn test_ordering_by_next_date_finished_last() {
        let (_temp_dir, repo) = test_repo();
        repo.load().unwrap();

        let family = FamilyId::new();
        repo.upsert(sched(family, "Later", 20)).unwrap();
        repo.upsert(sched(family, "Sooner", 5)).unwrap();
        let mut done = sched(family, "Done", 1);
        done.finish();
        repo.upsert(done).unwrap();

        let all = repo.get_by_family(family).unwrap();
        assert_eq!(all[0].name, "Sooner");
        assert_eq!(all[1].name, "Later");
        assert_eq!(all[2].name, "Done");
    }

    #[test]
    fn test_get_active_excludes_paused_and_finished() {
        let (_temp_dir, repo) = test_repo();
        repo.load().unwrap();

        let family = FamilyId::new();
        repo.upsert(sched(family, "Rent", 1)).unwrap();
        let mut paused = sched(family, "Gym", 2);
        paused.status = ScheduledStatus::Paused;
        repo.upsert(paused).unwrap();
        let mut finished = sched(family, "Old Loan", 3);
        finished.finish();
        repo.upsert(finished).unwrap();

        let active = repo.get_active(family).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Rent");
    }

    #[test]
    fn test_get_by_name_scoped_to_family() {
        let (_temp_dir, repo) = test_repo();
        repo.load().unwrap();

        let family = FamilyId::new();
        repo.upsert(sched(family, "Netflix", 10)).unwrap();

        assert!(repo.get_by_name(family, "netflix").unwrap().is_some());
        assert!(repo.get_by_name(FamilyId::new(), "netflix").unwrap().is_none());
        assert!(repo.name_exists(family, "NETFLIX", None).unwrap());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = test_repo();
        repo.load().unwrap();

        let s = sched(FamilyId::new(), "Insurance", 15);
        let id = s.id;
        repo.upsert(s).unwrap();
        repo.save().unwrap();

        let repo2 = ScheduledRepository::new(temp_dir.path().join("scheduled.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(id).unwrap().unwrap().name, "Insurance");
    }
}
