//! Login session kept in client-side storage.
//!
//! The session is two storage entries: `token` (the bearer token) and
//! `user` (the JSON profile). A non-empty token means "logged in"; the
//! profile is informational and may be missing or unreadable without
//! affecting that.

use std::sync::Arc;

use secrecy::SecretString;

use crate::models::{Session, UserProfile};
use crate::presenter::{HOME_PAGE, NavLink, Presenter};
use crate::storage::{self, KeyValueStore, StorageError, keys};

/// Read/write access to the stored session.
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct AuthState {
    store: Arc<dyn KeyValueStore>,
    presenter: Arc<dyn Presenter>,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("logged_in", &self.is_logged_in())
            .finish_non_exhaustive()
    }
}

impl AuthState {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, presenter: Arc<dyn Presenter>) -> Self {
        Self { store, presenter }
    }

    /// True iff a non-empty token is stored.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    /// The stored bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.store
            .get_item(keys::TOKEN)
            .filter(|token| !token.is_empty())
            .map(SecretString::from)
    }

    /// The stored user profile. Missing and unreadable profiles both yield
    /// `None`.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        storage::read_json(self.store.as_ref(), keys::USER)
    }

    /// Store a freshly issued session.
    ///
    /// The profile is written before the token so a failure never leaves a
    /// token without its profile.
    ///
    /// # Errors
    ///
    /// Returns an error if either entry cannot be persisted.
    pub fn login(&self, session: &Session) -> Result<(), StorageError> {
        use secrecy::ExposeSecret;

        storage::write_json(self.store.as_ref(), keys::USER, &session.user)?;
        self.store
            .set_item(keys::TOKEN, session.token.expose_secret())?;

        tracing::info!(user_id = %session.user.id, "Logged in");
        Ok(())
    }

    /// Forget the session and send the user to the home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the entries cannot be removed; no navigation
    /// happens in that case.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.store.remove_item(keys::TOKEN)?;
        self.store.remove_item(keys::USER)?;

        tracing::info!("Logged out");
        self.presenter.navigate(HOME_PAGE);
        Ok(())
    }

    /// Account links for the navigation bar.
    #[must_use]
    pub fn nav_links(&self) -> Vec<NavLink> {
        if self.is_logged_in() {
            let full_name = self.user().map(|user| user.full_name).unwrap_or_default();
            vec![NavLink::Profile { full_name }, NavLink::Logout]
        } else {
            vec![NavLink::Login, NavLink::SignUp]
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::presenter::RecordingPresenter;
    use crate::storage::MemoryStore;
    use secrecy::ExposeSecret;
    use serde_json::json;

    fn setup() -> (AuthState, Arc<MemoryStore>, Arc<RecordingPresenter>) {
        let store = Arc::new(MemoryStore::new());
        let presenter = Arc::new(RecordingPresenter::new());
        let auth = AuthState::new(store.clone(), presenter.clone());
        (auth, store, presenter)
    }

    fn session() -> Session {
        Session {
            token: SecretString::from("jwt-123"),
            user: serde_json::from_value(json!({
                "id": 5,
                "email": "asha@example.com",
                "full_name": "Asha Rao"
            }))
            .unwrap(),
        }
    }

    #[test]
    fn test_logged_out_by_default() {
        let (auth, _, _) = setup();
        assert!(!auth.is_logged_in());
        assert!(auth.token().is_none());
        assert!(auth.user().is_none());
        assert_eq!(auth.nav_links(), vec![NavLink::Login, NavLink::SignUp]);
    }

    #[test]
    fn test_login_stores_token_and_profile() {
        let (auth, store, _) = setup();
        auth.login(&session()).unwrap();

        assert!(auth.is_logged_in());
        assert_eq!(auth.token().unwrap().expose_secret(), "jwt-123");
        assert_eq!(store.get_item(keys::TOKEN).as_deref(), Some("jwt-123"));
        assert_eq!(auth.user().unwrap().full_name, "Asha Rao");
        assert_eq!(
            auth.nav_links(),
            vec![
                NavLink::Profile {
                    full_name: "Asha Rao".to_string()
                },
                NavLink::Logout
            ]
        );
    }

    #[test]
    fn test_empty_token_is_logged_out() {
        let (auth, store, _) = setup();
        store.set_item(keys::TOKEN, "").unwrap();
        assert!(!auth.is_logged_in());
    }

    #[test]
    fn test_corrupt_profile_reads_as_none() {
        let (auth, store, _) = setup();
        store.set_item(keys::TOKEN, "jwt").unwrap();
        store.set_item(keys::USER, "{{{").unwrap();

        assert!(auth.is_logged_in());
        assert!(auth.user().is_none());
        assert_eq!(
            auth.nav_links().first(),
            Some(&NavLink::Profile {
                full_name: String::new()
            })
        );
    }

    #[test]
    fn test_logout_clears_and_navigates_home() {
        let (auth, store, presenter) = setup();
        auth.login(&session()).unwrap();
        auth.logout().unwrap();

        assert!(!auth.is_logged_in());
        assert_eq!(store.get_item(keys::USER), None);
        assert_eq!(presenter.navigations(), vec![HOME_PAGE.to_string()]);
    }
}
