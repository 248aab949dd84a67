//! Session persistence
//!
//! The current login is a small JSON file in the config directory. On unix
//! it is written with owner-only permissions.

use std::fs;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths::HearthPaths;
use crate::error::HearthError;
use crate::models::UserId;

/// A logged-in session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The logged-in user
    pub user_id: UserId,

    /// Random token identifying this login
    pub token: String,

    /// When the session was created
    pub issued_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session for a user
    pub fn new(user_id: UserId, token: String) -> Self {
        Self {
            user_id,
            token,
            issued_at: Utc::now(),
        }
    }

    /// Persist the session to the session file
    pub fn save(&self, paths: &HearthPaths) -> Result<(), HearthError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| HearthError::Auth(format!("Failed to serialize session: {}", e)))?;

        let path = paths.session_file();
        fs::write(&path, contents)
            .map_err(|e| HearthError::Io(format!("Failed to write session file: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))
                .map_err(|e| HearthError::Io(format!("Failed to set session permissions: {}", e)))?;
        }

        Ok(())
    }

    /// Load the current session, if one exists
    pub fn load(paths: &HearthPaths) -> Result<Option<Session>, HearthError> {
        let path = paths.session_file();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| HearthError::Io(format!("Failed to read session file: {}", e)))?;

        let session: Session = serde_json::from_str(&contents)
            .map_err(|e| HearthError::Auth(format!("Session file is corrupt: {}", e)))?;

        Ok(Some(session))
    }

    /// Remove the session file (logout)
    pub fn delete(paths: &HearthPaths) -> Result<(), HearthError> {
        let path = paths.session_file();
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| HearthError::Io(format!("Failed to remove session file: {}", e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_paths() -> (TempDir, HearthPaths) {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, paths)
    }

    #[test]
    fn test_save_and_load() {
        let (_temp_dir, paths) = test_paths();

        let session = Session::new(UserId::new(), "token-abc".to_string());
        session.save(&paths).unwrap();

        let loaded = Session::load(&paths).unwrap().unwrap();
        assert_eq!(loaded.user_id, session.user_id);
        assert_eq!(loaded.token, "token-abc");
    }

    #[test]
    fn test_load_without_session() {
        let (_temp_dir, paths) = test_paths();
        assert!(Session::load(&paths).unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, paths) = test_paths();

        let session = Session::new(UserId::new(), "token".to_string());
        session.save(&paths).unwrap();

        Session::delete(&paths).unwrap();
        assert!(Session::load(&paths).unwrap().is_none());

        // Deleting again is not an error
        Session::delete(&paths).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let (_temp_dir, paths) = test_paths();
        let session = Session::new(UserId::new(), "token".to_string());
        session.save(&paths).unwrap();

        let mode = std::fs::metadata(paths.session_file())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
