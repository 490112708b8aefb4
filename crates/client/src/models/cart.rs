//! Cart types: the locally persisted line and the backend's cart rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopcart_core::{CartItemId, ProductId};

use super::Product;

/// One product in the local cart.
///
/// Serialized flat: the product's own fields plus `quantity`, e.g.
/// `{"id": 1, "name": "...", "price": "100", "quantity": 2}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Snapshot of the product taken when it was first added.
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub const fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Price charged per unit.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.product.unit_price()
    }

    /// `unit_price * quantity`, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price().saturating_mul(Decimal::from(self.quantity))
    }
}

/// Response of `POST /cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemCreated {
    pub message: String,
    /// Row ID; the backend may report none when it merged into an existing row.
    #[serde(default)]
    pub cart_id: Option<CartItemId>,
}

/// A row of the server-side cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCartItem {
    /// Cart row ID, used by `PUT`/`DELETE /cart/{id}`.
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub discount_price: Option<Decimal>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
}

/// Response of `GET /cart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCart {
    pub items: Vec<RemoteCartItem>,
    pub total: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_line_total_saturates() {
        let line = CartLine::new(Product::new(ProductId::new(1), "X", Decimal::MAX), 2);
        assert_eq!(line.line_total(), Decimal::MAX);

        let line = CartLine::new(Product::new(ProductId::new(2), "Y", Decimal::from(25)), 4);
        assert_eq!(line.line_total(), Decimal::from(100));
    }

    #[test]
    fn test_cart_line_serializes_flat() {
        let mut product = Product::new(ProductId::new(1), "Laptop", Decimal::from(100));
        product.extra.insert("specifications".to_string(), json!({"ram": "16GB"}));
        let line = CartLine::new(product, 2);

        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["quantity"], 2);
        assert_eq!(value["specifications"]["ram"], "16GB");
        assert!(value.get("product").is_none());

        let back: CartLine = serde_json::from_value(value).unwrap();
        assert_eq!(back, line);
        assert!(!back.product.extra.contains_key("quantity"));
    }

    #[test]
    fn test_line_total_uses_discount_price() {
        let product = Product::new(ProductId::new(2), "Tablet", Decimal::from(200))
            .with_discount_price(Decimal::from(150));
        let line = CartLine::new(product, 3);
        assert_eq!(line.line_total(), Decimal::from(450));
    }

    #[test]
    fn test_remote_cart_parses_backend_rows() {
        let cart: RemoteCart = serde_json::from_value(json!({
            "items": [{
                "id": 11,
                "user_id": 4,
                "product_id": 2,
                "quantity": 1,
                "added_at": "Tue, 13 Oct 2026 10:00:00 GMT",
                "name": "Tablet",
                "price": "200.00",
                "discount_price": "150.00",
                "image_url": null,
                "brand": "Acme",
                "stock_quantity": 12
            }],
            "total": 150.0
        }))
        .unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].id, CartItemId::new(11));
        assert_eq!(cart.total, Decimal::from(150));
    }
}
