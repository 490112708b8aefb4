//! Data types exchanged with the backend and kept in storage.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod session;

pub use cart::{CartItemCreated, CartLine, RemoteCart, RemoteCartItem};
pub use catalog::{Category, Health, Product, ProductPage, ProductQuery};
pub use order::{NewOrder, Order, OrderCreated, OrderItem};
pub use session::{AuthResponse, Session, SignupRequest, UserProfile};

use serde::{Deserialize, Serialize};

/// Generic `{"message": "..."}` acknowledgement returned by mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
