//! Server-side cart endpoints. All of them require a session.
//!
//! `POST /cart` is an upsert that *adds* to the stored quantity of an
//! existing row; it is what the local cart's sync uses.

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use shopcart_core::{CartItemId, ProductId};

use super::{ApiClient, ApiError};
use crate::models::{CartItemCreated, MessageResponse, RemoteCart};

/// Body of `POST /cart`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartItemUpsert {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Serialize)]
struct QuantityUpdate {
    quantity: u32,
}

impl ApiClient {
    /// Add `quantity` of a product to the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 for an unknown product, 400 for
    /// insufficient stock, 401 without a session.
    #[instrument(skip(self))]
    pub async fn add_cart_item(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItemCreated, ApiError> {
        let body = CartItemUpsert {
            product_id,
            quantity,
        };
        self.call_as("/cart", Method::POST, Some(&body), true).await
    }

    /// The server-side cart with its computed total.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 401 without a session.
    pub async fn remote_cart(&self) -> Result<RemoteCart, ApiError> {
        self.get("/cart", true).await
    }

    /// Set the quantity of a server-side cart row (must be at least 1).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 400 for a zero quantity.
    #[instrument(skip(self))]
    pub async fn update_cart_item(
        &self,
        cart_id: CartItemId,
        quantity: u32,
    ) -> Result<MessageResponse, ApiError> {
        let body = QuantityUpdate { quantity };
        self.call_as(&format!("/cart/{cart_id}"), Method::PUT, Some(&body), true)
            .await
    }

    /// Delete a server-side cart row.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn remove_cart_item(&self, cart_id: CartItemId) -> Result<MessageResponse, ApiError> {
        self.call_as::<_, ()>(&format!("/cart/{cart_id}"), Method::DELETE, None, true)
            .await
    }
}
