//! Cart sync against the mock backend.
//!
//! Run with: cargo test -p shopcart-integration-tests --test cart_sync

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::json;
use shopcart_client::SyncReport;
use shopcart_client::models::Session;
use shopcart_core::ProductId;
use shopcart_integration_tests::{MockBackend, TEST_TOKEN, TestClient, test_user};

#[tokio::test]
async fn test_add_pushes_every_line_in_order_with_bearer_token() {
    let backend = MockBackend::start().await;
    let client = TestClient::new(&backend);
    client.log_in();
    let mut cart = client.cart();

    let phone = client.api.product(ProductId::new(2)).await.unwrap();
    let laptop = client.api.product(ProductId::new(1)).await.unwrap();

    let handle = cart.add_item(&phone, 1).unwrap().unwrap();
    assert_eq!(handle.await.unwrap(), SyncReport::Completed { synced: 1 });

    let handle = cart.add_item(&laptop, 2).unwrap().unwrap();
    assert_eq!(handle.await.unwrap(), SyncReport::Completed { synced: 2 });

    let posts = backend.cart_posts();
    let bodies: Vec<_> = posts.iter().map(|p| p.body.clone().unwrap()).collect();
    assert_eq!(
        bodies,
        vec![
            json!({"product_id": 2, "quantity": 1}),
            json!({"product_id": 2, "quantity": 1}),
            json!({"product_id": 1, "quantity": 2}),
        ]
    );
    let expected_auth = format!("Bearer {TEST_TOKEN}");
    assert!(
        posts
            .iter()
            .all(|p| p.authorization.as_deref() == Some(expected_auth.as_str()))
    );
}

#[tokio::test]
async fn test_repeated_sync_adds_to_server_quantities() {
    let backend = MockBackend::start().await;
    let client = TestClient::new(&backend);
    client.log_in();
    let mut cart = client.cart();

    let phone = client.api.product(ProductId::new(2)).await.unwrap();
    cart.add_item(&phone, 1).unwrap().unwrap().await.unwrap();
    assert_eq!(cart.sync_with_backend().await, SyncReport::Completed { synced: 1 });

    // The upsert adds, so the server now holds more than the local cart
    assert_eq!(cart.item_count(), 1);
    assert_eq!(backend.server_cart(), vec![(2, 2)]);
}

#[tokio::test]
async fn test_sync_stops_at_first_failure() {
    let backend = MockBackend::start().await;
    let client = TestClient::new(&backend);
    let mut cart = client.cart();

    // Build the cart while logged out so nothing is pushed yet
    for id in [2, 1, 3] {
        let product = client.api.product(ProductId::new(id)).await.unwrap();
        assert!(cart.add_item(&product, 1).unwrap().is_none());
    }
    assert!(backend.cart_posts().is_empty());

    backend.fail_cart_for(1);
    client.log_in();

    let report = cart.sync_with_backend().await;
    assert_eq!(
        report,
        SyncReport::Aborted {
            synced: 1,
            failed: ProductId::new(1),
        }
    );

    let attempted: Vec<_> = backend
        .cart_posts()
        .iter()
        .map(|p| p.body.as_ref().unwrap()["product_id"].clone())
        .collect();
    assert_eq!(attempted, vec![json!(2), json!(1)]);
    assert_eq!(backend.server_cart(), vec![(2, 1)]);

    // Local cart is untouched by the failure
    assert_eq!(cart.lines().len(), 3);
    assert_eq!(cart.item_count(), 3);
}

#[tokio::test]
async fn test_nothing_is_sent_when_logged_out() {
    let backend = MockBackend::start().await;
    let client = TestClient::new(&backend);
    let mut cart = client.cart();

    let phone = client.api.product(ProductId::new(2)).await.unwrap();
    assert!(cart.add_item(&phone, 2).unwrap().is_none());
    assert_eq!(cart.sync_with_backend().await, SyncReport::Skipped);

    assert!(backend.cart_posts().is_empty());
    assert_eq!(cart.item_count(), 2);
}

#[tokio::test]
async fn test_rejected_token_aborts_sync_and_keeps_cart() {
    let backend = MockBackend::start().await;
    let client = TestClient::new(&backend);
    client
        .auth()
        .login(&Session {
            token: SecretString::from("expired-token"),
            user: test_user(),
        })
        .unwrap();
    let mut cart = client.cart();

    let phone = client.api.product(ProductId::new(2)).await.unwrap();
    let report = cart.add_item(&phone, 1).unwrap().unwrap().await.unwrap();

    assert_eq!(
        report,
        SyncReport::Aborted {
            synced: 0,
            failed: ProductId::new(2),
        }
    );
    assert_eq!(cart.item_count(), 1);
    assert!(backend.server_cart().is_empty());
}

#[tokio::test]
async fn test_add_notifies_even_when_sync_fails() {
    let backend = MockBackend::start().await;
    let client = TestClient::new(&backend);
    client.log_in();
    backend.fail_cart_for(2);
    let mut cart = client.cart();

    let phone = client.api.product(ProductId::new(2)).await.unwrap();
    cart.add_item(&phone, 1).unwrap().unwrap().await.unwrap();

    let messages: Vec<_> = client
        .presenter
        .notifications()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(messages, vec!["Product added to cart!".to_string()]);
}
