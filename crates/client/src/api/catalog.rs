//! Catalog endpoints: products, categories, health.

use shopcart_core::ProductId;

use super::{ApiClient, ApiError};
use crate::models::{Category, Health, Product, ProductPage, ProductQuery};

impl ApiClient {
    /// One page of products matching `query`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response is malformed.
    pub async fn products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let query_string = query.to_query_string();
        let endpoint = if query_string.is_empty() {
            "/products".to_string()
        } else {
            format!("/products?{query_string}")
        };
        self.get(&endpoint, false).await
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 for an unknown product.
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.get(&format!("/products/{id}"), false).await
    }

    /// Featured products, newest first; the backend defaults to 6.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response is malformed.
    pub async fn featured_products(&self, limit: Option<u32>) -> Result<Vec<Product>, ApiError> {
        let endpoint = match limit {
            Some(limit) => format!("/products/featured?limit={limit}"),
            None => "/products/featured".to_string(),
        };
        self.get(&endpoint, false).await
    }

    /// All categories, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response is malformed.
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("/categories", false).await
    }

    /// Backend liveness check.
    ///
    /// # Errors
    ///
    /// Returns error if the backend is unreachable.
    pub async fn health(&self) -> Result<Health, ApiError> {
        self.get("/health", false).await
    }
}
