//! Family service
//!
//! Showing family details and members, renaming, and rotating the invite
//! code.

use crate::audit::EntityType;
use crate::error::{HearthError, HearthResult};
use crate::models::{Family, User};
use crate::storage::Storage;

/// A family together with its members
#[derive(Debug, Clone)]
pub struct FamilyDetails {
    pub family: Family,
    pub members: Vec<User>,
}

/// Service for family management
pub struct FamilyService<'a> {
    storage: &'a Storage,
    user: &'a User,
}

impl<'a> FamilyService<'a> {
    /// Create a new family service acting as the given user
    pub fn new(storage: &'a Storage, user: &'a User) -> Self {
        Self { storage, user }
    }

    /// The acting user's family and its members, sorted by name
    pub fn show(&self) -> HearthResult<FamilyDetails> {
        let family = self.own_family()?;
        let members = self.storage.users.get_by_family(family.id)?;
        Ok(FamilyDetails { family, members })
    }

    /// Rename the family
    pub fn rename(&self, new_name: &str) -> HearthResult<Family> {
        let mut family = self.own_family()?;

        let before = family.clone();
        family.name = new_name.trim().to_string();
        family
            .validate()
            .map_err(|e| HearthError::Validation(e.to_string()))?;

        self.storage.families.upsert(family.clone())?;
        self.storage.families.save()?;

        self.storage.log_update(
            EntityType::Family,
            family.id.to_string(),
            Some(family.name.clone()),
            &before,
            &family,
        )?;

        Ok(family)
    }

    /// Rotate the invite code, invalidating the old one
    pub fn regenerate_invite(&self) -> HearthResult<Family> {
        let mut family = self.own_family()?;

        let before = family.clone();
        family.regenerate_invite_code();

        self.storage.families.upsert(family.clone())?;
        self.storage.families.save()?;

        self.storage.log_update(
            EntityType::Family,
            family.id.to_string(),
            Some(family.name.clone()),
            &before,
            &family,
        )?;

        Ok(family)
    }

    fn own_family(&self) -> HearthResult<Family> {
        self.storage
            .families
            .get(self.user.family_id)?
            .ok_or_else(|| HearthError::family_not_found(self.user.family_id.to_string()))
    }
}
