//! Wiring shared by every command.

use std::sync::Arc;

use shopcart_client::{
    ApiClient, AuthState, CartManager, ClientConfig, ClientError, FileStore, KeyValueStore,
    Presenter,
};

use crate::console::ConsolePresenter;

/// Store, session, API client and cart, all backed by the configured
/// storage file.
pub struct Context {
    pub api: ApiClient,
    pub cart: CartManager,
}

impl Context {
    /// Open the store file and build the client stack on top of it.
    ///
    /// # Errors
    ///
    /// Returns error if the store file is unreadable or the HTTP client
    /// cannot be built.
    pub fn open(config: &ClientConfig) -> Result<Self, ClientError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage_path)?);
        let presenter: Arc<dyn Presenter> = Arc::new(ConsolePresenter);

        let auth = AuthState::new(store.clone(), presenter.clone());
        let api = ApiClient::new(config, auth)?;
        let cart = CartManager::load(store, api.clone(), presenter);

        tracing::debug!(
            storage = %config.storage_path.display(),
            api = %api.base_url(),
            "Client ready"
        );

        Ok(Self { api, cart })
    }

    pub fn auth(&self) -> &AuthState {
        self.api.auth()
    }

    /// Fail with `NotLoggedIn` unless a session is stored.
    pub fn require_login(&self) -> Result<(), ClientError> {
        if self.auth().is_logged_in() {
            Ok(())
        } else {
            Err(ClientError::NotLoggedIn)
        }
    }
}
