//! Order types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shopcart_core::{OrderId, ProductId};

/// Payment method the backend assumes when none is given (cash on delivery).
pub const DEFAULT_PAYMENT_METHOD: &str = "cod";

/// Body of `POST /orders`. The backend builds the order from the
/// server-side cart, so only delivery details are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub shipping_address: String,
    pub payment_method: String,
}

impl NewOrder {
    /// Cash-on-delivery order to `shipping_address`.
    #[must_use]
    pub fn cash_on_delivery(shipping_address: impl Into<String>) -> Self {
        Self {
            shipping_address: shipping_address.into(),
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
        }
    }
}

/// Response of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub message: String,
    pub order_id: OrderId,
    pub total: Decimal,
}

/// An order as listed by `GET /orders`; `items` is only populated by
/// `GET /orders/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<String>,
    /// Timestamp exactly as the backend formats it.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One line of a placed order, priced at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}
