//! Cart and session surviving a restart through the file store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::SecretString;
use shopcart_client::models::Product;
use shopcart_client::{
    ApiClient, AuthState, CartManager, ClientConfig, FileStore, KeyValueStore, Presenter,
    RecordingPresenter, StorageError,
};
use shopcart_core::ProductId;
use shopcart_integration_tests::{MockBackend, TEST_EMAIL, TEST_PASSWORD, TEST_TOKEN};
use tempfile::TempDir;

struct App {
    cart: CartManager,
    auth: AuthState,
}

/// Build the client stack the way a front end does at startup.
fn start_app(backend: &MockBackend, dir: &TempDir) -> App {
    let config = ClientConfig::new(backend.base_url(), dir.path().join("storage.json"));
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage_path).unwrap());
    let presenter: Arc<dyn Presenter> = Arc::new(RecordingPresenter::new());

    let auth = AuthState::new(store.clone(), presenter.clone());
    let api = ApiClient::new(&config, auth.clone()).unwrap();
    App {
        cart: CartManager::load(store, api, presenter),
        auth,
    }
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let backend = MockBackend::start().await;
    let dir = TempDir::new().unwrap();

    let mut app = start_app(&backend, &dir);
    let laptop = app.cart.api().product(ProductId::new(1)).await.unwrap();
    let mug = Product::new(ProductId::new(42), "Mug", "249.50".parse().unwrap());
    app.cart.add_item(&laptop, 1).unwrap();
    app.cart.add_item(&mug, 2).unwrap();
    app.cart.update_quantity(ProductId::new(1), 2).unwrap();
    let before = app.cart.lines().to_vec();
    drop(app);

    let app = start_app(&backend, &dir);
    assert_eq!(app.cart.lines(), before.as_slice());
    assert_eq!(app.cart.total(), Decimal::from(90_499));
    assert_eq!(
        app.cart.line(ProductId::new(1)).unwrap().product.extra["specifications"]["ram"],
        "16GB"
    );
}

#[tokio::test]
async fn test_session_survives_restart() {
    let backend = MockBackend::start().await;
    let dir = TempDir::new().unwrap();

    let app = start_app(&backend, &dir);
    let session = app
        .cart
        .api()
        .login(TEST_EMAIL, &SecretString::from(TEST_PASSWORD))
        .await
        .unwrap()
        .into_session();
    app.auth.login(&session).unwrap();
    drop(app);

    let app = start_app(&backend, &dir);
    assert!(app.auth.is_logged_in());
    assert_eq!(app.auth.user().unwrap().full_name, "Test User");

    app.cart.api().me().await.unwrap();
    let last = backend.requests().pop().unwrap();
    assert_eq!(last.authorization, Some(format!("Bearer {TEST_TOKEN}")));
}

#[test]
fn test_corrupt_store_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = FileStore::open(&path).unwrap_err();
    assert!(matches!(err, StorageError::Corrupt { .. }));
}
