//! User repository for JSON storage
//!
//! Manages loading and saving users to users.json. Emails are unique
//! case-insensitively across the whole store.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::HearthError;
use crate::models::{FamilyId, User, UserId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct UserData {
    users: Vec<User>,
}

/// Repository for user persistence
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, User>>,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load users from disk
    pub fn load(&self) -> Result<(), HearthError> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for user in file_data.users {
            data.insert(user.id, user);
        }

        Ok(())
    }

    /// Save users to disk
    pub fn save(&self) -> Result<(), HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = UserData {
            users: data.values().cloned().collect(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get a user by ID
    pub fn get(&self, id: UserId) -> Result<Option<User>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Look up a user by email (case-insensitive)
    pub fn get_by_email(&self, email: &str) -> Result<Option<User>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let email_lower = email.trim().to_lowercase();
        Ok(data.values().find(|u| u.email == email_lower).cloned())
    }

    /// Get all members of a family, sorted by name
    pub fn get_by_family(&self, family_id: FamilyId) -> Result<Vec<User>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut users: Vec<_> = data
            .values()
            .filter(|u| u.family_id == family_id)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    /// Check if an email is already registered
    pub fn email_exists(&self, email: &str) -> Result<bool, HearthError> {
        Ok(self.get_by_email(email)?.is_some())
    }

    /// Insert or update a user
    pub fn upsert(&self, user: User) -> Result<(), HearthError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(user.id, user);
        Ok(())
    }

    /// Count users
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
    use tempfile::TempDir;

    fn test_repo() -> (TempDir, UserRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = UserRepository::new(temp_dir.path().join("users.json"));
        (temp_dir, repo)
    }

    fn user(family_id: FamilyId, email: &str, name: &str) -> User {
        User::new(family_id, email, name, "$argon2id$stub")
    }

    #[test]
    fn test_get_by_email_is_case_insensitive() {
        let (_temp_dir, repo) = test_repo();
        repo.load().unwrap();

        repo.upsert(user(FamilyId::new(), "Kim@Example.com", "Kim"))
            .unwrap();

        assert!(repo.get_by_email("kim@example.com").unwrap().is_some());
        assert!(repo.get_by_email("KIM@EXAMPLE.COM").unwrap().is_some());
        assert!(repo.get_by_email("other@example.com").unwrap().is_none());
    }

    #[test]
    fn test_get_by_family_filters_and_sorts() {
        let (_temp_dir, repo) = test_repo();
        repo.load().unwrap();

        let family = FamilyId::new();
        let other = FamilyId::new();
        repo.upsert(user(family, "b@example.com", "Ben")).unwrap();
        repo.upsert(user(family, "a@example.com", "Ada")).unwrap();
        repo.upsert(user(other, "c@example.com", "Cam")).unwrap();

        let members = repo.get_by_family(family).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "Ada");
        assert_eq!(members[1].name, "Ben");
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = test_repo();
        repo.load().unwrap();

        let u = user(FamilyId::new(), "kim@example.com", "Kim");
        let id = u.id;
        repo.upsert(u).unwrap();
        repo.save().unwrap();

        let repo2 = UserRepository::new(temp_dir.path().join("users.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(id).unwrap().unwrap().email, "kim@example.com");
    }
}
