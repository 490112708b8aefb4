//! Shopcart client library.
//!
//! Client-side half of the shop: a persistent cart, the login session, and
//! a thin JSON client for the shop's REST backend.
//!
//! # Architecture
//!
//! - [`storage`] - `localStorage`-style key/value stores (in-memory and file)
//! - [`auth`] - session token and user profile kept in storage
//! - [`api`] - `reqwest` wrapper adding JSON and bearer-token headers
//! - [`cart`] - the cart itself, write-through persisted, best-effort synced
//! - [`presenter`] - sink for UI side effects (notifications, badge, navigation)
//!
//! Presenters and front ends call into [`cart::CartManager`] and
//! [`auth::AuthState`]; the cart calls [`api::ApiClient`] to sync. Nothing
//! calls back up the stack.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! let config = ClientConfig::from_env()?;
//! let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage_path)?);
//! let presenter: Arc<dyn Presenter> = Arc::new(TracingPresenter);
//! let auth = AuthState::new(Arc::clone(&store), Arc::clone(&presenter));
//! let api = ApiClient::new(&config, auth)?;
//! let mut cart = CartManager::load(store, api, presenter);
//!
//! let product = cart.api().product(ProductId::new(1)).await?;
//! cart.add_item(&product, 2)?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod config;
pub mod error;
pub mod models;
pub mod presenter;
pub mod storage;

pub use api::{ApiClient, ApiError};
pub use auth::AuthState;
pub use cart::{CartManager, SyncHandle, SyncReport};
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, Result};
pub use presenter::{
    CartBadge, NavLink, NoopPresenter, Notification, NotificationKind, Presenter,
    RecordingPresenter, TracingPresenter,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
