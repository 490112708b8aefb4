//! The shopping cart.
//!
//! [`CartManager`] owns the cart lines, writes them through to storage on
//! every change and, when a session exists, pushes them to the backend in
//! the background after an add.
//!
//! # Invariants
//!
//! - At most one line per product; adding an existing product merges into
//!   its line.
//! - Every line has a quantity of at least 1. Setting a quantity of 0
//!   removes the line.
//! - After any successful mutation the stored `cart` entry decodes to
//!   exactly [`CartManager::lines`].
//!
//! # Sync
//!
//! The sync is one-way and best effort: one `POST /cart` per line, each
//! awaited before the next, stopping at the first failure. Failures are
//! logged and reported in the returned [`SyncReport`], never raised, and
//! never retried.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use shopcart_core::ProductId;

use crate::api::ApiClient;
use crate::models::{CartLine, Product};
use crate::presenter::{CartBadge, Notification, Presenter};
use crate::storage::{self, KeyValueStore, StorageError, keys};

/// Message shown after a successful add.
pub const ADDED_TO_CART_MESSAGE: &str = "Product added to cart!";

/// Handle of a background sync. Dropping it does not cancel the sync.
pub type SyncHandle = JoinHandle<SyncReport>;

/// Result of pushing the cart to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncReport {
    /// No session, nothing was sent.
    Skipped,
    /// Every line was accepted.
    Completed { synced: usize },
    /// `failed` was rejected (or the request failed); the `synced` lines
    /// before it were accepted and the rest were not attempted.
    Aborted { synced: usize, failed: ProductId },
}

/// The cart, persisted under the `cart` storage key.
pub struct CartManager {
    lines: Vec<CartLine>,
    store: Arc<dyn KeyValueStore>,
    api: ApiClient,
    presenter: Arc<dyn Presenter>,
}

impl std::fmt::Debug for CartManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager")
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl CartManager {
    /// Load the cart from `store`. A missing or unreadable entry is an empty
    /// cart.
    #[must_use]
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        api: ApiClient,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        let lines: Vec<CartLine> = storage::read_json(store.as_ref(), keys::CART).unwrap_or_default();
        debug!(lines = lines.len(), "Cart loaded");

        Self {
            lines,
            store,
            api,
            presenter,
        }
    }

    /// Lines in the order their products were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id() == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Client the cart syncs through.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Add `quantity` of `product`, merging into an existing line.
    ///
    /// A new line snapshots every display field of `product`. After
    /// persisting, a success notification is shown and, with a session, a
    /// background sync is started; its handle is returned. Adding zero is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted. Memory is left
    /// unchanged in that case.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: u32,
    ) -> Result<Option<SyncHandle>, StorageError> {
        if quantity == 0 {
            return Ok(None);
        }

        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|line| line.product_id() == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => lines.push(CartLine::new(product.clone(), quantity)),
        }
        self.commit(lines)?;

        self.presenter
            .notify(&Notification::success(ADDED_TO_CART_MESSAGE));

        if self.api.auth().is_logged_in() {
            Ok(self.spawn_sync())
        } else {
            Ok(None)
        }
    }

    /// Drop the line for `product_id`. Unknown products are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<(), StorageError> {
        if self.line(product_id).is_none() {
            return Ok(());
        }

        let lines = self
            .lines
            .iter()
            .filter(|line| line.product_id() != product_id)
            .cloned()
            .collect();
        self.commit(lines)
    }

    /// Set the quantity of the line for `product_id`; 0 removes the line.
    /// Unknown products are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), StorageError> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        let mut lines = self.lines.clone();
        let Some(line) = lines.iter_mut().find(|line| line.product_id() == product_id) else {
            return Ok(());
        };
        line.quantity = quantity;
        self.commit(lines)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.commit(Vec::new())
    }

    /// Sum of `(discount_price or price) * quantity` over all lines,
    /// saturating at the `Decimal` bounds.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .fold(Decimal::ZERO, |total, line| total.saturating_add(line.line_total()))
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn badge(&self) -> CartBadge {
        CartBadge {
            count: self.item_count(),
        }
    }

    /// Push every line to the backend and wait for the result.
    ///
    /// Never fails; see [`SyncReport`].
    pub async fn sync_with_backend(&self) -> SyncReport {
        push_lines(&self.api, &self.lines).await
    }

    /// Persist `lines`, then adopt them and refresh the badge.
    fn commit(&mut self, lines: Vec<CartLine>) -> Result<(), StorageError> {
        storage::write_json(self.store.as_ref(), keys::CART, &lines)?;
        self.lines = lines;

        debug!(
            lines = self.lines.len(),
            items = self.item_count(),
            "Cart saved"
        );
        self.presenter.cart_badge(self.badge());
        Ok(())
    }

    /// Start a background sync of a snapshot of the current lines.
    fn spawn_sync(&self) -> Option<SyncHandle> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime available; skipping cart sync");
            return None;
        };

        let api = self.api.clone();
        let lines = self.lines.clone();
        Some(runtime.spawn(async move { push_lines(&api, &lines).await }))
    }
}

/// Upsert `lines` one at a time, stopping at the first failure.
async fn push_lines(api: &ApiClient, lines: &[CartLine]) -> SyncReport {
    if !api.auth().is_logged_in() {
        return SyncReport::Skipped;
    }

    let mut synced = 0;
    for line in lines {
        if let Err(e) = api.add_cart_item(line.product_id(), line.quantity).await {
            warn!(
                error = %e,
                product_id = %line.product_id(),
                synced,
                remaining = lines.len() - synced,
                "Failed to sync cart"
            );
            return SyncReport::Aborted {
                synced,
                failed: line.product_id(),
            };
        }
        synced += 1;
    }

    info!(synced, "Cart synced");
    SyncReport::Completed { synced }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::AuthState;
    use crate::config::ClientConfig;
    use crate::models::Session;
    use crate::presenter::RecordingPresenter;
    use crate::storage::MemoryStore;
    use secrecy::SecretString;
    use serde_json::json;

    struct Harness {
        cart: CartManager,
        store: Arc<MemoryStore>,
        presenter: Arc<RecordingPresenter>,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_store(Arc::new(MemoryStore::new()))
        }

        fn with_store(store: Arc<MemoryStore>) -> Self {
            let presenter = Arc::new(RecordingPresenter::new());
            let auth = AuthState::new(store.clone(), presenter.clone());
            // Nothing listens here; logged-out tests never send requests
            let config = ClientConfig::new(
                url::Url::parse("http://127.0.0.1:9/api").unwrap(),
                "unused.json",
            );
            let api = ApiClient::new(&config, auth).unwrap();
            let cart = CartManager::load(store.clone(), api, presenter.clone());
            Self {
                cart,
                store,
                presenter,
            }
        }

        /// Re-read the cart from the same store.
        fn reload(&self) -> CartManager {
            Self::with_store(self.store.clone()).cart
        }
    }

    fn product(id: i32, price: i64) -> Product {
        Product::new(ProductId::new(id), format!("Product {id}"), Decimal::from(price))
    }

    #[test]
    fn test_adding_same_product_merges_quantities() {
        let mut h = Harness::new();
        h.cart.add_item(&product(1, 100), 2).unwrap();
        h.cart.add_item(&product(1, 100), 3).unwrap();

        assert_eq!(h.cart.lines().len(), 1);
        assert_eq!(h.cart.line(ProductId::new(1)).unwrap().quantity, 5);
        assert_eq!(h.cart.total(), Decimal::from(500));
        assert_eq!(h.cart.item_count(), 5);
    }

    #[test]
    fn test_total_uses_discount_price() {
        let mut h = Harness::new();
        let discounted = product(2, 200).with_discount_price(Decimal::from(150));
        h.cart.add_item(&discounted, 1).unwrap();
        assert_eq!(h.cart.total(), Decimal::from(150));

        h.cart.add_item(&product(3, 40), 2).unwrap();
        assert_eq!(h.cart.total(), Decimal::from(230));
        assert_eq!(h.cart.item_count(), 3);
    }

    #[test]
    fn test_total_is_exact_decimal() {
        let mut h = Harness::new();
        let cheap = Product::new(ProductId::new(4), "Cable", "0.1".parse().unwrap());
        let cheaper = Product::new(ProductId::new(5), "Clip", "0.2".parse().unwrap());
        h.cart.add_item(&cheap, 1).unwrap();
        h.cart.add_item(&cheaper, 1).unwrap();
        assert_eq!(h.cart.total(), "0.3".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_lines_keep_first_added_order() {
        let mut h = Harness::new();
        h.cart.add_item(&product(3, 10), 1).unwrap();
        h.cart.add_item(&product(1, 10), 1).unwrap();
        h.cart.add_item(&product(3, 10), 1).unwrap();

        let ids: Vec<i32> = h.cart.lines().iter().map(|l| l.product_id().as_i32()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_new_line_copies_display_fields() {
        let mut h = Harness::new();
        let mut phone = product(7, 15_000);
        phone.brand = Some("Acme".to_string());
        phone.extra.insert("specifications".to_string(), json!({"ram": "8GB"}));
        h.cart.add_item(&phone, 1).unwrap();

        let line = h.cart.line(ProductId::new(7)).unwrap();
        assert_eq!(line.product, phone);
    }

    #[test]
    fn test_adding_zero_is_noop() {
        let mut h = Harness::new();
        assert!(h.cart.add_item(&product(1, 100), 0).unwrap().is_none());
        assert!(h.cart.is_empty());
        assert!(h.presenter.notifications().is_empty());
    }

    #[test]
    fn test_add_notifies_and_updates_badge() {
        let mut h = Harness::new();
        h.cart.add_item(&product(1, 100), 2).unwrap();

        let notifications = h.presenter.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].message, ADDED_TO_CART_MESSAGE);
        assert_eq!(h.presenter.last_badge(), Some(CartBadge { count: 2 }));
    }

    #[test]
    fn test_remove_missing_product_leaves_cart_unchanged() {
        let mut h = Harness::new();
        h.cart.add_item(&product(1, 100), 1).unwrap();
        let before = h.cart.lines().to_vec();

        h.cart.remove_item(ProductId::new(99)).unwrap();
        assert_eq!(h.cart.lines(), before.as_slice());
    }

    #[test]
    fn test_remove_item() {
        let mut h = Harness::new();
        h.cart.add_item(&product(1, 100), 1).unwrap();
        h.cart.add_item(&product(2, 50), 1).unwrap();

        h.cart.remove_item(ProductId::new(1)).unwrap();
        assert!(h.cart.line(ProductId::new(1)).is_none());
        assert_eq!(h.cart.total(), Decimal::from(50));
    }

    #[test]
    fn test_update_quantity() {
        let mut h = Harness::new();
        h.cart.add_item(&product(1, 100), 1).unwrap();

        h.cart.update_quantity(ProductId::new(1), 4).unwrap();
        assert_eq!(h.cart.item_count(), 4);

        // Unknown product: no-op
        h.cart.update_quantity(ProductId::new(2), 9).unwrap();
        assert_eq!(h.cart.lines().len(), 1);
    }

    #[test]
    fn test_update_quantity_to_zero_removes_line() {
        let mut h = Harness::new();
        h.cart.add_item(&product(1, 100), 3).unwrap();
        h.cart.update_quantity(ProductId::new(1), 0).unwrap();

        assert!(h.cart.is_empty());
        assert_eq!(h.presenter.last_badge(), Some(CartBadge { count: 0 }));
    }

    #[test]
    fn test_clear_cart() {
        let mut h = Harness::new();
        h.cart.add_item(&product(1, 100), 3).unwrap();
        h.cart.add_item(&product(2, 100), 1).unwrap();
        h.cart.clear().unwrap();

        assert_eq!(h.cart.item_count(), 0);
        assert_eq!(h.cart.total(), Decimal::ZERO);
        assert!(!h.cart.badge().visible());
    }

    #[test]
    fn test_every_mutation_round_trips_through_storage() {
        let mut h = Harness::new();
        let discounted = product(2, 200).with_discount_price(Decimal::from(150));

        h.cart.add_item(&product(1, 100), 2).unwrap();
        assert_eq!(h.reload().lines(), h.cart.lines());

        h.cart.add_item(&discounted, 1).unwrap();
        assert_eq!(h.reload().lines(), h.cart.lines());

        h.cart.update_quantity(ProductId::new(1), 7).unwrap();
        assert_eq!(h.reload().lines(), h.cart.lines());

        h.cart.remove_item(ProductId::new(2)).unwrap();
        assert_eq!(h.reload().lines(), h.cart.lines());

        h.cart.clear().unwrap();
        assert!(h.reload().is_empty());
    }

    #[test]
    fn test_load_ignores_corrupt_cart() {
        let store = Arc::new(MemoryStore::new());
        store.set_item(keys::CART, "definitely not json").unwrap();

        let h = Harness::with_store(store);
        assert!(h.cart.is_empty());
    }

    #[test]
    fn test_load_reads_existing_cart() {
        let store = Arc::new(MemoryStore::new());
        store
            .set_item(
                keys::CART,
                r#"[{"id":1,"name":"Laptop","price":100,"brand":"Acme","quantity":2}]"#,
            )
            .unwrap();

        let h = Harness::with_store(store);
        let line = h.cart.line(ProductId::new(1)).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.product.brand.as_deref(), Some("Acme"));
        assert_eq!(h.cart.total(), Decimal::from(200));
    }

    #[test]
    fn test_logged_out_add_does_not_sync() {
        let mut h = Harness::new();
        assert!(h.cart.add_item(&product(1, 100), 1).unwrap().is_none());
    }

    #[test]
    fn test_logged_in_add_without_runtime_skips_sync() {
        let mut h = Harness::new();
        h.cart
            .api()
            .auth()
            .login(&Session {
                token: SecretString::from("jwt"),
                user: serde_json::from_value(json!({"id": 1, "full_name": "A"})).unwrap(),
            })
            .unwrap();

        // Plain #[test]: no tokio runtime to spawn on
        assert!(h.cart.add_item(&product(1, 100), 1).unwrap().is_none());
        assert_eq!(h.cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_sync_skipped_when_logged_out() {
        let h = Harness::new();
        assert_eq!(h.cart.sync_with_backend().await, SyncReport::Skipped);
    }

    #[test]
    fn test_total_saturates_on_huge_stored_price() {
        let store = Arc::new(MemoryStore::new());
        store
            .set_item(
                keys::CART,
                r#"[{"id":1,"name":"X","price":"79228162514264337593543950335","quantity":2},
                    {"id":2,"name":"Y","price":"10","quantity":1}]"#,
            )
            .unwrap();

        let h = Harness::with_store(store);
        assert_eq!(h.cart.lines().len(), 2);
        assert_eq!(h.cart.total(), Decimal::MAX);
        assert_eq!(h.cart.item_count(), 3);
    }

    #[test]
    fn test_item_count_saturates() {
        let mut h = Harness::new();
        h.cart.add_item(&product(1, 1), u32::MAX).unwrap();
        h.cart.add_item(&product(1, 1), 5).unwrap();
        assert_eq!(h.cart.item_count(), u32::MAX);
    }
}
