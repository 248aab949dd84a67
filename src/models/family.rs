//! Family model
//!
//! The family is the multi-tenant ownership boundary: every account, category,
//! transaction, budget, and scheduled transaction belongs to exactly one family,
//! and every service operation checks resource ownership against the current
//! user's family.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::FamilyId;

/// A family sharing one set of finance data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
    /// Unique identifier
    pub id: FamilyId,

    /// Family name (e.g., "The Riveras")
    pub name: String,

    /// Invite code other users present when registering into this family
    pub invite_code: String,

    /// When the family was created
    pub created_at: DateTime<Utc>,
}

impl Family {
    /// Create a new family with a fresh invite code
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: FamilyId::new(),
            name: name.into(),
            invite_code: generate_invite_code(),
            created_at: Utc::now(),
        }
    }

    /// Replace the invite code, invalidating the old one
    pub fn regenerate_invite_code(&mut self) {
        self.invite_code = generate_invite_code();
    }

    /// Validate the family
    pub fn validate(&self) -> Result<(), FamilyValidationError> {
        if self.name.trim().is_empty() {
            return Err(FamilyValidationError::EmptyName);
        }
        if self.name.len() > 64 {
            return Err(FamilyValidationError::NameTooLong(self.name.len()));
        }
        Ok(())
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Generate a short url-safe invite code
fn generate_invite_code() -> String {
    use argon2::password_hash::rand_core::{OsRng, RngCore};

    let mut bytes = [0u8; 9];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Validation errors for families
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilyValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for FamilyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Family name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Family name too long ({} chars, max 64)", len)
            }
        }
    }
}

impl std::error::Error for FamilyValidationError {}
