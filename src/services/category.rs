//! Category service
//!
//! Business logic for category management within a family.

use crate::audit::EntityType;
use crate::error::{HearthError, HearthResult};
use crate::models::{Category, CategoryId, CategoryKind, User};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
    user: &'a User,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service acting as the given user
    pub fn new(storage: &'a Storage, user: &'a User) -> Self {
        Self { storage, user }
    }

    /// Create a new category
    pub fn create(&self, name: &str, kind: CategoryKind) -> HearthResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HearthError::Validation(
                "Category name cannot be empty".into(),
            ));
        }

        if self
            .storage
            .categories
            .name_exists(self.user.family_id, name, None)?
        {
            return Err(HearthError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let category = Category::new(self.user.family_id, name, kind);

        category
            .validate()
            .map_err(|e| HearthError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }

    /// Load a category by id, enforcing family ownership
    pub fn get(&self, id: CategoryId) -> HearthResult<Category> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| HearthError::category_not_found(id.to_string()))?;

        if category.family_id != self.user.family_id {
            return Err(HearthError::permission_denied("Category", id.to_string()));
        }

        Ok(category)
    }

    /// Find a category within the family by name or ID string
    pub fn find(&self, identifier: &str) -> HearthResult<Category> {
        if let Some(category) = self
            .storage
            .categories
            .get_by_name(self.user.family_id, identifier)?
        {
            return Ok(category);
        }

        if let Ok(id) = identifier.parse::<CategoryId>() {
            return self.get(id);
        }

        Err(HearthError::category_not_found(identifier))
    }

    /// List the family's categories
    pub fn list(&self, include_archived: bool) -> HearthResult<Vec<Category>> {
        if include_archived {
            self.storage.categories.get_by_family(self.user.family_id)
        } else {
            self.storage.categories.get_active(self.user.family_id)
        }
    }

    /// Rename a category
    pub fn rename(&self, id: CategoryId, new_name: &str) -> HearthResult<Category> {
        let mut category = self.get(id)?;

        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(HearthError::Validation(
                "Category name cannot be empty".into(),
            ));
        }

        if self
            .storage
            .categories
            .name_exists(self.user.family_id, new_name, Some(id))?
        {
            return Err(HearthError::Duplicate {
                entity_type: "Category",
                identifier: new_name.to_string(),
            });
        }

        let before = category.clone();
        category.name = new_name.to_string();

        category
            .validate()
            .map_err(|e| HearthError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;

        Ok(category)
    }

    /// Archive a category (soft delete). Existing transactions keep the
    /// category; it just stops being offered for new ones.
    pub fn archive(&self, id: CategoryId) -> HearthResult<Category> {
        let mut category = self.get(id)?;

        if category.archived {
            return Err(HearthError::Validation(
                "Category is already archived".into(),
            ));
        }

        let before = category.clone();
        category.archive();

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;

        Ok(category)
    }
}
