//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::HearthError;
use crate::models::{Category, CategoryId, CategoryKind, FamilyId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct CategoryData {
    categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    data: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), HearthError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for category in file_data.categories {
            data.insert(category.id, category);
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = CategoryData {
            categories: data.values().cloned().collect(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all categories of a family, income first then expenses, sorted by name
    pub fn get_by_family(&self, family_id: FamilyId) -> Result<Vec<Category>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut categories: Vec<_> = data
            .values()
            .filter(|c| c.family_id == family_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| {
            (a.kind == CategoryKind::Expense)
                .cmp(&(b.kind == CategoryKind::Expense))
                .then(a.name.cmp(&b.name))
        });
        Ok(categories)
    }

    /// Get all active (non-archived) categories of a family
    pub fn get_active(&self, family_id: FamilyId) -> Result<Vec<Category>, HearthError> {
        let all = self.get_by_family(family_id)?;
        Ok(all.into_iter().filter(|c| !c.archived).collect())
    }

    /// Get a category by name within a family (case-insensitive)
    pub fn get_by_name(
        &self,
        family_id: FamilyId,
        name: &str,
    ) -> Result<Option<Category>, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name_lower = name.to_lowercase();
        Ok(data
            .values()
            .find(|c| c.family_id == family_id && c.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Check if a category name is already taken within a family
    pub fn name_exists(
        &self,
        family_id: FamilyId,
        name: &str,
        exclude_id: Option<CategoryId>,
    ) -> Result<bool, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name_lower = name.to_lowercase();
        Ok(data.values().any(|c| {
            c.family_id == family_id
                && c.name.to_lowercase() == name_lower
                && Some(c.id) != exclude_id
        }))
    }

    /// Insert or update a category
    pub fn upsert(&self, category: Category) -> Result<(), HearthError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(category.id, category);
        Ok(())
    }

    /// Check if a category exists
    pub fn exists(&self, id: CategoryId) -> Result<bool, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.contains_key(&id))
    }

    /// Count categories
    pub fn count(&self) -> Result<usize, HearthError> {
        let data = self
            .data
            .read()
            .map_err(|e| HearthError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
