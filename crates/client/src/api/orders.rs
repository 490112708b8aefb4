//! Order endpoints. All of them require a session.

use reqwest::Method;
use tracing::instrument;

use shopcart_core::OrderId;

use super::{ApiClient, ApiError};
use crate::models::{NewOrder, Order, OrderCreated};

impl ApiClient {
    /// Place an order for everything in the server-side cart. The backend
    /// empties that cart on success.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 400 when the server-side cart is
    /// empty or the address is missing.
    #[instrument(skip(self, order))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<OrderCreated, ApiError> {
        self.call_as("/orders", Method::POST, Some(order), true)
            .await
    }

    /// The user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response is malformed.
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get("/orders", true).await
    }

    /// One order with its items.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 for an order that is not the
    /// user's.
    pub async fn order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.get(&format!("/orders/{id}"), true).await
    }
}
