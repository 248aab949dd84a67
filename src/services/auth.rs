//! Authentication service
//!
//! Registration, login, logout, and password changes. Login failures are
//! deliberately vague: a wrong email and a wrong password produce the same
//! error so the CLI never confirms which emails are registered.

use crate::audit::{AuditActor, EntityType};
use crate::auth::{generate_token, hash_password, verify_password, Session};
use crate::error::{HearthError, HearthResult};
use crate::models::{Family, User};
use crate::storage::{seed_default_categories, Storage};

/// Where a new registration lands: a brand-new family or an existing one
/// joined by invite code
#[derive(Debug, Clone)]
pub enum RegisterTarget {
    NewFamily { family_name: String },
    JoinFamily { invite_code: String },
}

/// Service for authentication. Unlike the data services it acts without a
/// logged-in user.
pub struct AuthService<'a> {
    storage: &'a Storage,
}

impl<'a> AuthService<'a> {
    /// Create a new auth service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a user, creating or joining a family, and log them in
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        target: RegisterTarget,
    ) -> HearthResult<(User, Family)> {
        if self.storage.users.email_exists(email)? {
            return Err(HearthError::Duplicate {
                entity_type: "User",
                identifier: email.trim().to_lowercase(),
            });
        }

        let password_hash = hash_password(password)?;

        let (family, is_new_family) = match target {
            RegisterTarget::NewFamily { family_name } => {
                let family = Family::new(family_name.trim());
                family
                    .validate()
                    .map_err(|e| HearthError::Validation(e.to_string()))?;
                (family, true)
            }
            RegisterTarget::JoinFamily { invite_code } => {
                let family = self
                    .storage
                    .families
                    .get_by_invite_code(invite_code.trim())?
                    .ok_or_else(|| HearthError::Auth("Invalid invite code".into()))?;
                (family, false)
            }
        };

        let user = User::new(family.id, email, name.trim(), password_hash);
        user.validate()
            .map_err(|e| HearthError::Validation(e.to_string()))?;

        if is_new_family {
            self.storage.families.upsert(family.clone())?;
            seed_default_categories(self.storage, family.id)?;
        }
        self.storage.users.upsert(user.clone())?;

        self.storage.families.save()?;
        self.storage.users.save()?;
        self.storage.categories.save()?;

        // The new user is the actor for their own registration entries
        self.storage.set_actor(Some(AuditActor {
            user_id: user.id.to_string(),
            email: user.email.clone(),
        }))?;
        if is_new_family {
            self.storage.log_create(
                EntityType::Family,
                family.id.to_string(),
                Some(family.name.clone()),
                &family,
            )?;
        }
        self.storage.log_create(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &user,
        )?;

        let session = Session::new(user.id, generate_token());
        session.save(self.storage.paths())?;

        Ok((user, family))
    }

    /// Log in with email and password, writing a fresh session
    pub fn login(&self, email: &str, password: &str) -> HearthResult<User> {
        let user = self
            .storage
            .users
            .get_by_email(email)?
            .ok_or_else(|| HearthError::Auth("Invalid email or password".into()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(HearthError::Auth("Invalid email or password".into()));
        }

        let session = Session::new(user.id, generate_token());
        session.save(self.storage.paths())?;

        Ok(user)
    }

    /// Remove the current session, if any
    pub fn logout(&self) -> HearthResult<()> {
        Session::delete(self.storage.paths())
    }

    /// Resolve the current session to a user. A session pointing at a user
    /// that no longer exists is treated as no session.
    pub fn current_user(&self) -> HearthResult<Option<User>> {
        let session = match Session::load(self.storage.paths())? {
            Some(session) => session,
            None => return Ok(None),
        };

        self.storage.users.get(session.user_id)
    }

    /// Change the acting user's password, verifying the current one first
    pub fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> HearthResult<User> {
        if !verify_password(current_password, &user.password_hash)? {
            return Err(HearthError::Auth("Current password is incorrect".into()));
        }

        let before = user.clone();
        let mut updated = user.clone();
        updated.password_hash = hash_password(new_password)?;

        self.storage.users.upsert(updated.clone())?;
        self.storage.users.save()?;

        self.storage.log_update(
            EntityType::User,
            updated.id.to_string(),
            Some(updated.name.clone()),
            &before,
            &updated,
        )?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HearthPaths;
    use tempfile::TempDir;

    fn test_setup() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn register_kim(storage: &Storage) -> (User, Family) {
        AuthService::new(storage)
            .register(
                "Kim",
                "kim@example.com",
                "correct horse",
                RegisterTarget::NewFamily {
                    family_name: "The Riveras".to_string(),
                },
            )
            .unwrap()
    }

    #[test]
    fn test_register_creates_family_with_default_categories() {
        let (_temp_dir, storage) = test_setup();

        let (user, family) = register_kim(&storage);
        assert_eq!(user.family_id, family.id);
        assert_eq!(user.email, "kim@example.com");

        // New families get the starter categories
        let categories = storage.categories.get_by_family(family.id).unwrap();
        assert!(categories.iter().any(|c| c.name == "Groceries"));
        assert!(categories.iter().any(|c| c.name == "Salary"));

        // And the registration logs the user in
        let current = AuthService::new(&storage).current_user().unwrap();
        assert_eq!(current.unwrap().id, user.id);
    }

    #[test]
    fn test_register_join_by_invite_code() {
        let (_temp_dir, storage) = test_setup();
        let (_, family) = register_kim(&storage);
        let service = AuthService::new(&storage);

        let (joined, joined_family) = service
            .register(
                "Ana",
                "ana@example.com",
                "another pass",
                RegisterTarget::JoinFamily {
                    invite_code: family.invite_code.clone(),
                },
            )
            .unwrap();

        assert_eq!(joined_family.id, family.id);
        assert_eq!(joined.family_id, family.id);
        assert_eq!(storage.users.get_by_family(family.id).unwrap().len(), 2);
    }

    #[test]
    fn test_register_rejects_bad_invite_code() {
        let (_temp_dir, storage) = test_setup();
        let service = AuthService::new(&storage);

        let result = service.register(
            "Ana",
            "ana@example.com",
            "some password",
            RegisterTarget::JoinFamily {
                invite_code: "not-a-code".to_string(),
            },
        );
        assert!(matches!(result, Err(HearthError::Auth(_))));
    }

    #[test]
    fn test_register_rejects_duplicate_email() {
        let (_temp_dir, storage) = test_setup();
        register_kim(&storage);
        let service = AuthService::new(&storage);

        let result = service.register(
            "Kim Again",
            "KIM@example.com",
            "other password",
            RegisterTarget::NewFamily {
                family_name: "Other".to_string(),
            },
        );
        assert!(matches!(result, Err(HearthError::Duplicate { .. })));
    }

    #[test]
    fn test_register_rejects_short_password() {
        let (_temp_dir, storage) = test_setup();
        let service = AuthService::new(&storage);

        let result = service.register(
            "Kim",
            "kim@example.com",
            "short",
            RegisterTarget::NewFamily {
                family_name: "The Riveras".to_string(),
            },
        );
        assert!(matches!(result, Err(HearthError::Auth(_))));
    }

    #[test]
    fn test_login_and_logout() {
        let (_temp_dir, storage) = test_setup();
        let (user, _) = register_kim(&storage);
        let service = AuthService::new(&storage);
        service.logout().unwrap();

        assert!(service.current_user().unwrap().is_none());

        let logged_in = service.login("Kim@Example.com", "correct horse").unwrap();
        assert_eq!(logged_in.id, user.id);
        assert!(service.current_user().unwrap().is_some());

        service.logout().unwrap();
        assert!(service.current_user().unwrap().is_none());
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let (_temp_dir, storage) = test_setup();
        register_kim(&storage);
        let service = AuthService::new(&storage);

        let wrong_password = service
            .login("kim@example.com", "wrong")
            .unwrap_err()
            .to_string();
        let wrong_email = service
            .login("nobody@example.com", "correct horse")
            .unwrap_err()
            .to_string();
        assert_eq!(wrong_password, wrong_email);
    }

    #[test]
    fn test_change_password() {
        let (_temp_dir, storage) = test_setup();
        let (user, _) = register_kim(&storage);
        let service = AuthService::new(&storage);

        assert!(service
            .change_password(&user, "wrong", "new password!")
            .is_err());

        service
            .change_password(&user, "correct horse", "new password!")
            .unwrap();

        assert!(service.login("kim@example.com", "correct horse").is_err());
        assert!(service.login("kim@example.com", "new password!").is_ok());
    }
}
