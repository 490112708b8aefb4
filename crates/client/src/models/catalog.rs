//! Catalog types: products, categories, listing queries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shopcart_core::{CategoryId, Price, ProductId, discount_percent};

/// A product as returned by the backend.
///
/// Only the fields the client reasons about are typed; every other display
/// field (`specifications`, `is_featured`, timestamps, ...) is kept verbatim
/// in `extra` so it survives being copied into the cart and persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Minimal product with no optional display fields.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            discount_price: None,
            brand: None,
            image_url: None,
            category_id: None,
            category_name: None,
            description: None,
            stock_quantity: None,
            extra: Map::new(),
        }
    }

    /// Builder-style setter for the discounted price.
    #[must_use]
    pub fn with_discount_price(mut self, discount_price: Decimal) -> Self {
        self.discount_price = Some(discount_price);
        self
    }

    /// Price actually charged: the discounted price when there is one.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.discount_price.unwrap_or(self.price)
    }

    /// Whole-percent saving of the discounted price over the list price.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        discount_percent(self.price, self.discount_price)
    }

    /// Charged price in the store currency, for display.
    #[must_use]
    pub fn display_price(&self) -> Price {
        Price::from_amount(self.unit_price())
    }
}

/// One page of `GET /products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub page: u32,
    pub limit: u32,
}

/// Filters for `GET /products`. Unset fields use the backend defaults
/// (page 1, 12 per page, no filtering).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category_id: Option<CategoryId>,
    pub search: Option<String>,
    pub brand: Option<String>,
}

impl ProductQuery {
    /// URL-encoded query string without the leading `?`; empty when no
    /// filter is set.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if let Some(page) = self.page {
            query.append_pair("page", &page.to_string());
        }
        if let Some(limit) = self.limit {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(category_id) = self.category_id {
            query.append_pair("category_id", &category_id.to_string());
        }
        if let Some(search) = &self.search {
            query.append_pair("search", search);
        }
        if let Some(brand) = &self.brand {
            query.append_pair("brand", brand);
        }
        query.finish()
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /health` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}
