//! Family repository for JSON storage
//!
//! Manages loading and saving families to families.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::HearthError;
use crate::models::{Family, FamilyId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct FamilyData {
    families: Vec<Family>,
}

/// Repository for family persistence
pub struct FamilyRepository {
    path: PathBuf,
    data: RwLock<HashMap<FamilyId, Family>>,
}

impl FamilyRepository {
    /// Create a new family repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load families from disk
    pub fn load(&self) -> Result<(), HearthError> {
        let file_data: FamilyData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for family in file_data.families {
            data.insert(family.id, family);
        }

        Ok(())
    }

    /// Save families to disk
    pub fn save(&self) -> Result<(), HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = FamilyData {
            families: data.values().cloned().collect(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get a family by ID
    pub fn get(&self, id: FamilyId) -> Result<Option<Family>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Look up a family by its invite code
    pub fn get_by_invite_code(&self, code: &str) -> Result<Option<Family>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().find(|f| f.invite_code == code).cloned())
    }

    /// Insert or update a family
    pub fn upsert(&self, family: Family) -> Result<(), HearthError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(family.id, family);
        Ok(())
    }

    /// Check if a family exists
    pub fn exists(&self, id: FamilyId) -> Result<bool, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.contains_key(&id))
    }

    /// Count families
    pub fn count(&self) -> Result<usize, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
