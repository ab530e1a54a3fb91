//! Editor session manager.
//!
//! A session is a single `{ expiresAt }` record in the key-value store.
//! Expired or unreadable records are deleted when they are looked up.

use chrono::{DateTime, Utc};

use crate::domain::{AdminConfig, AppError, EditorSession, Result};
use crate::infrastructure::KeyValueStore;

/// Storage key holding the serialized session.
pub const SESSION_KEY: &str = "tco-admin";

/// Creates, checks and clears editor sessions.
pub struct SessionManager<S: KeyValueStore> {
    kv: S,
    admin: AdminConfig,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Create a session manager using the given credentials and lifetime.
    #[must_use]
    pub const fn new(kv: S, admin: AdminConfig) -> Self {
        Self { kv, admin }
    }

    /// Checks the credentials and opens a session on success.
    ///
    /// # Errors
    /// Returns `AppError::Config` when no credentials are configured,
    /// `AppError::Auth` on mismatch, or a storage error.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<EditorSession> {
        self.authenticate_at(username, password, Utc::now())
    }

    /// [`authenticate`](Self::authenticate) with an explicit clock.
    ///
    /// # Errors
    /// See [`authenticate`](Self::authenticate).
    pub fn authenticate_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<EditorSession> {
        let (expected_user, expected_pass) =
            self.admin.credentials().ok_or_else(|| AppError::Config {
                message: "Editor credentials are not configured ([admin] username/password)"
                    .into(),
            })?;

        if username != expected_user || password != expected_pass {
            tracing::warn!(username, "Rejected editor login");
            return Err(AppError::Auth);
        }

        self.create_session_at(now)
    }

    /// Opens a session valid for the configured lifetime.
    ///
    /// # Errors
    /// Returns error if the session cannot be stored.
    pub fn create_session(&self) -> Result<EditorSession> {
        self.create_session_at(Utc::now())
    }

    /// [`create_session`](Self::create_session) with an explicit clock.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the configured lifetime overflows the
    /// clock, or error if the session cannot be stored.
    pub fn create_session_at(&self, now: DateTime<Utc>) -> Result<EditorSession> {
        let expires = now
            .checked_add_signed(self.admin.session_ttl())
            .ok_or_else(|| AppError::Config {
                message: format!(
                    "session_ttl_hours = {} is out of range",
                    self.admin.session_ttl_hours
                ),
            })?;
        let session = EditorSession::expiring_at(expires);
        let raw = serde_json::to_string(&session).map_err(AppError::json_parse)?;
        self.kv.set_item(SESSION_KEY, &raw)?;

        tracing::info!(expires_at = session.expires_at, "Editor session created");

        Ok(session)
    }

    /// Returns the current session, if any and not expired.
    ///
    /// # Errors
    /// Returns error only if the storage backend fails.
    pub fn get_session(&self) -> Result<Option<EditorSession>> {
        self.get_session_at(Utc::now())
    }

    /// [`get_session`](Self::get_session) with an explicit clock.
    ///
    /// # Errors
    /// Returns error only if the storage backend fails.
    pub fn get_session_at(&self, now: DateTime<Utc>) -> Result<Option<EditorSession>> {
        let Some(raw) = self.kv.get_item(SESSION_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str::<EditorSession>(&raw) {
            Ok(session) if !session.is_expired_at(now) => Ok(Some(session)),
            Ok(_) => {
                tracing::info!("Editor session expired");
                self.kv.remove_item(SESSION_KEY)?;
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable editor session: {}", e);
                self.kv.remove_item(SESSION_KEY)?;
                Ok(None)
            }
        }
    }

    /// Returns the current session or `AppError::SessionRequired`.
    ///
    /// # Errors
    /// Returns `AppError::SessionRequired` when no valid session exists.
    pub fn require_session(&self) -> Result<EditorSession> {
        self.get_session()?.ok_or(AppError::SessionRequired)
    }

    /// Deletes the stored session.
    ///
    /// # Errors
    /// Returns error if the storage backend fails.
    pub fn clear_session(&self) -> Result<()> {
        self.kv.remove_item(SESSION_KEY)?;
        tracing::info!("Editor session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chrono::Duration;

    use super::*;
    use crate::infrastructure::MemoryStorage;

    fn admin() -> AdminConfig {
        AdminConfig {
            username: Some("editora".into()),
            password: Some("clave-segura".into()),
            session_ttl_hours: 12,
        }
    }

    fn manager() -> (Rc<MemoryStorage>, SessionManager<Rc<MemoryStorage>>) {
        let kv = Rc::new(MemoryStorage::new());
        let manager = SessionManager::new(Rc::clone(&kv), admin());
        (kv, manager)
    }

    #[test]
    fn test_session_valid_until_ttl() {
        let (_, manager) = manager();
        let t = Utc::now();

        let created = manager.create_session_at(t).unwrap();
        assert_eq!(created.expires_at, (t + Duration::hours(12)).timestamp_millis());

        let later = t + Duration::hours(12);
        assert_eq!(manager.get_session_at(later).unwrap(), Some(created));
    }

    #[test]
    fn test_expired_session_is_absent_and_cleared() {
        let (kv, manager) = manager();
        let t = Utc::now();
        manager.create_session_at(t).unwrap();

        let expired = t + Duration::hours(12) + Duration::milliseconds(1);
        assert!(manager.get_session_at(expired).unwrap().is_none());
        assert!(kv.get_item(SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn test_unparsable_session_is_cleared() {
        let (kv, manager) = manager();
        kv.set_item(SESSION_KEY, "{oops").unwrap();

        assert!(manager.get_session().unwrap().is_none());
        assert!(kv.is_empty());
    }

    #[test]
    fn test_authenticate_exact_match_only() {
        let (kv, manager) = manager();

        assert!(matches!(
            manager.authenticate("editora", "Clave-segura"),
            Err(AppError::Auth)
        ));
        assert!(matches!(
            manager.authenticate("editora ", "clave-segura"),
            Err(AppError::Auth)
        ));
        assert!(kv.get_item(SESSION_KEY).unwrap().is_none());

        manager.authenticate("editora", "clave-segura").unwrap();
        assert!(manager.require_session().is_ok());
    }

    #[test]
    fn test_authenticate_without_credentials_fails() {
        let manager = SessionManager::new(MemoryStorage::new(), AdminConfig::default());
        assert!(matches!(
            manager.authenticate("", ""),
            Err(AppError::Config { .. })
        ));
    }

    #[test]
    fn test_clear_session() {
        let (_, manager) = manager();
        manager.create_session().unwrap();
        manager.clear_session().unwrap();
        manager.clear_session().unwrap();

        assert!(matches!(
            manager.require_session(),
            Err(AppError::SessionRequired)
        ));
    }

    #[test]
    fn test_custom_ttl() {
        let kv = MemoryStorage::new();
        let manager = SessionManager::new(
            &kv,
            AdminConfig {
                session_ttl_hours: 1,
                ..admin()
            },
        );
        let t = Utc::now();
        manager.create_session_at(t).unwrap();

        assert!(manager.get_session_at(t + Duration::minutes(59)).unwrap().is_some());
        assert!(manager.get_session_at(t + Duration::minutes(61)).unwrap().is_none());
    }

    #[test]
    fn test_huge_ttl_is_config_error() {
        let kv = MemoryStorage::new();
        let manager = SessionManager::new(
            &kv,
            AdminConfig {
                session_ttl_hours: u32::MAX,
                ..admin()
            },
        );

        assert!(matches!(
            manager.create_session(),
            Err(AppError::Config { .. })
        ));
        assert!(matches!(
            manager.authenticate("editora", "clave-segura"),
            Err(AppError::Config { .. })
        ));
        assert!(kv.is_empty());
    }
}
