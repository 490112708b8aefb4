//! Integration test support for shopcart.
//!
//! [`MockBackend`] is an in-process axum server that speaks the shop's REST
//! API closely enough for the client to be driven end to end: login, the
//! catalog, the server-side cart and orders. Every request it receives is
//! recorded so tests can assert on what the client actually sent.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopcart-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = MockBackend::start().await;
//! let client = TestClient::new(&backend);
//! client.log_in();
//!
//! let mut cart = client.cart();
//! let product = client.api.product(ProductId::new(2)).await?;
//! cart.add_item(&product, 1)?.unwrap().await?;
//!
//! assert_eq!(backend.cart_posts().len(), 1);
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::body::Body;
use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use shopcart_client::models::{Session, UserProfile};
use shopcart_client::{ApiClient, AuthState, CartManager, ClientConfig, MemoryStore, RecordingPresenter};
use tokio::task::JoinHandle;
use url::Url;

/// Token the mock issues on login and expects as bearer auth.
pub const TEST_TOKEN: &str = "test-token";
/// Credentials the mock accepts.
pub const TEST_EMAIL: &str = "user@example.com";
pub const TEST_PASSWORD: &str = "secret";

/// A request as received by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    /// JSON body, if the request had one.
    pub body: Option<Value>,
}

#[derive(Default)]
struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    failing_products: Mutex<HashSet<i32>>,
    /// `(product_id, quantity)` rows in insertion order; row id is index + 1.
    server_cart: Mutex<Vec<(i32, u32)>>,
    orders: Mutex<Vec<Value>>,
    users: Mutex<Vec<String>>,
}

/// In-process REST backend bound to an ephemeral localhost port.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Bind and start serving.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock backend failed");
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// `http://127.0.0.1:<port>/api`
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/api", self.addr)).expect("Invalid mock URL")
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }

    /// `POST /api/cart` requests received so far, oldest first.
    pub fn cart_posts(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST" && r.path == "/api/cart")
            .collect()
    }

    /// Make `POST /cart` fail with a 500 for `product_id`.
    pub fn fail_cart_for(&self, product_id: i32) {
        lock(&self.state.failing_products).insert(product_id);
    }

    /// Server-side cart as `(product_id, quantity)` rows.
    pub fn server_cart(&self) -> Vec<(i32, u32)> {
        lock(&self.state.server_cart).clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// A client stack wired to a [`MockBackend`] over an in-memory store.
pub struct TestClient {
    pub store: Arc<MemoryStore>,
    pub presenter: Arc<RecordingPresenter>,
    pub api: ApiClient,
}

impl TestClient {
    pub fn new(backend: &MockBackend) -> Self {
        let store = Arc::new(MemoryStore::new());
        let presenter = Arc::new(RecordingPresenter::new());
        let auth = AuthState::new(store.clone(), presenter.clone());
        let config = ClientConfig::new(backend.base_url(), "unused.json");
        let api = ApiClient::new(&config, auth).expect("Failed to build API client");

        Self {
            store,
            presenter,
            api,
        }
    }

    pub fn auth(&self) -> &AuthState {
        self.api.auth()
    }

    /// Cart loaded from this client's store.
    pub fn cart(&self) -> CartManager {
        CartManager::load(self.store.clone(), self.api.clone(), self.presenter.clone())
    }

    /// Store the session the mock's login would issue, without a request.
    pub fn log_in(&self) {
        self.auth()
            .login(&Session {
                token: TEST_TOKEN.to_string().into(),
                user: test_user(),
            })
            .expect("Failed to store session");
    }
}

/// Profile of the mock's only user.
pub fn test_user() -> UserProfile {
    serde_json::from_value(user_json()).expect("Invalid test user")
}

fn user_json() -> Value {
    json!({
        "id": 7,
        "full_name": "Test User",
        "email": TEST_EMAIL,
        "phone": "9999999999",
        "address": "12 MG Road, Bengaluru",
    })
}

fn catalog() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "name": "Laptop",
            "price": "50000.00",
            "discount_price": "45000.00",
            "brand": "Acme",
            "category_id": 1,
            "category_name": "Electronics",
            "stock_quantity": 10,
            "is_featured": 1,
            "specifications": {"ram": "16GB"},
        }),
        json!({
            "id": 2,
            "name": "Phone",
            "price": 200,
            "discount_price": 150,
            "brand": "Acme",
            "category_id": 1,
            "category_name": "Electronics",
            "stock_quantity": 5,
            "is_featured": 1,
        }),
        json!({
            "id": 3,
            "name": "Headphones",
            "price": 100,
            "discount_price": null,
            "brand": "Sonic",
            "category_id": 2,
            "category_name": "Audio",
            "stock_quantity": 0,
            "is_featured": 0,
        }),
    ]
}

fn find_product(id: i32) -> Option<Value> {
    catalog().into_iter().find(|p| p["id"] == id)
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/me", get(me))
        .route("/api/products", get(products))
        .route("/api/products/featured", get(featured))
        .route("/api/products/{id}", get(product))
        .route("/api/categories", get(categories))
        .route("/api/cart", post(add_to_cart).get(view_cart))
        .route("/api/cart/{id}", put(update_cart_row).delete(delete_cart_row))
        .route("/api/orders", post(create_order).get(list_orders))
        .route("/api/orders/{id}", get(order))
        .route("/api/broken", get(broken))
        .route("/api/teapot", get(teapot))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), record))
        .with_state(state)
}

async fn record(State(state): State<Arc<MockState>>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    lock(&state.requests).push(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&bytes).ok(),
    });

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

type JsonResponse = (StatusCode, Json<Value>);

fn error(status: StatusCode, message: &str) -> JsonResponse {
    (status, Json(json!({ "error": message })))
}

fn authorized(headers: &HeaderMap) -> Result<(), JsonResponse> {
    let expected = format!("Bearer {TEST_TOKEN}");
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        Some(_) => Err(error(StatusCode::UNAUTHORIZED, "Token is invalid")),
        None => Err(error(StatusCode::UNAUTHORIZED, "Token is missing")),
    }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "message": "API is running"}))
}

async fn login(Json(body): Json<Value>) -> JsonResponse {
    if body["email"] == TEST_EMAIL && body["password"] == TEST_PASSWORD {
        (
            StatusCode::OK,
            Json(json!({
                "message": "Login successful",
                "token": TEST_TOKEN,
                "user": user_json(),
            })),
        )
    } else {
        error(StatusCode::UNAUTHORIZED, "Invalid email or password")
    }
}

async fn signup(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> JsonResponse {
    let (Some(email), Some(_), Some(full_name)) = (
        body["email"].as_str(),
        body["password"].as_str(),
        body["full_name"].as_str(),
    ) else {
        return error(StatusCode::BAD_REQUEST, "Missing required fields");
    };

    let mut users = lock(&state.users);
    if email == TEST_EMAIL || users.iter().any(|u| u == email) {
        return error(StatusCode::CONFLICT, "Email already registered");
    }
    users.push(email.to_string());

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "token": TEST_TOKEN,
            "user": {"id": 100 + users.len(), "full_name": full_name, "email": email},
        })),
    )
}

async fn me(headers: HeaderMap) -> JsonResponse {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    (StatusCode::OK, Json(user_json()))
}

async fn products(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: u32 = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(12);
    let search = params.get("search").map(|s| s.to_lowercase());

    let products: Vec<Value> = catalog()
        .into_iter()
        .filter(|p| {
            search.as_ref().is_none_or(|s| {
                p["name"]
                    .as_str()
                    .is_some_and(|name| name.to_lowercase().contains(s))
            })
        })
        .collect();

    Json(json!({"products": products, "page": page, "limit": limit}))
}

async fn featured() -> Json<Value> {
    let featured: Vec<Value> = catalog()
        .into_iter()
        .filter(|p| p["is_featured"] == 1)
        .collect();
    Json(Value::Array(featured))
}

async fn product(Path(id): Path<i32>) -> JsonResponse {
    find_product(id).map_or_else(
        || error(StatusCode::NOT_FOUND, "Product not found"),
        |p| (StatusCode::OK, Json(p)),
    )
}

async fn categories() -> Json<Value> {
    Json(json!([
        {"id": 2, "name": "Audio", "description": "Headphones and speakers"},
        {"id": 1, "name": "Electronics", "description": null},
    ]))
}

async fn add_to_cart(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> JsonResponse {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }

    let (Some(product_id), Some(quantity)) = (body["product_id"].as_i64(), body["quantity"].as_u64())
    else {
        return error(StatusCode::BAD_REQUEST, "Product ID is required");
    };
    let (Ok(product_id), Ok(quantity)) = (i32::try_from(product_id), u32::try_from(quantity)) else {
        return error(StatusCode::BAD_REQUEST, "Invalid cart item");
    };

    if lock(&state.failing_products).contains(&product_id) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Database error");
    }
    let Some(product) = find_product(product_id) else {
        return error(StatusCode::NOT_FOUND, "Product not found");
    };
    if product["stock_quantity"].as_u64().unwrap_or(0) < u64::from(quantity) {
        return error(StatusCode::BAD_REQUEST, "Insufficient stock");
    }

    let mut cart = lock(&state.server_cart);
    let cart_id = match cart.iter().position(|(id, _)| *id == product_id) {
        Some(index) => {
            if let Some(row) = cart.get_mut(index) {
                row.1 += quantity;
            }
            index + 1
        }
        None => {
            cart.push((product_id, quantity));
            cart.len()
        }
    };

    (
        StatusCode::CREATED,
        Json(json!({"message": "Item added to cart", "cart_id": cart_id})),
    )
}

async fn view_cart(State(state): State<Arc<MockState>>, headers: HeaderMap) -> JsonResponse {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }

    let (items, total) = cart_contents(&lock(&state.server_cart));
    (StatusCode::OK, Json(json!({"items": items, "total": total})))
}

/// Server cart rows joined with the catalog, plus the total in whole units.
fn cart_contents(rows: &[(i32, u32)]) -> (Vec<Value>, i64) {
    let mut total = 0;
    let items = rows
        .iter()
        .enumerate()
        .filter_map(|(index, &(product_id, quantity))| {
            let product = find_product(product_id)?;
            let unit = whole_units(&product["discount_price"])
                .or_else(|| whole_units(&product["price"]))
                .unwrap_or(0);
            total += unit * i64::from(quantity);
            Some(json!({
                "id": index + 1,
                "product_id": product_id,
                "quantity": quantity,
                "name": product["name"],
                "price": product["price"],
                "discount_price": product["discount_price"],
                "brand": product["brand"],
                "stock_quantity": product["stock_quantity"],
            }))
        })
        .collect();
    (items, total)
}

async fn update_cart_row(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<usize>,
    Json(body): Json<Value>,
) -> JsonResponse {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    let Some(quantity) = body["quantity"]
        .as_u64()
        .and_then(|q| u32::try_from(q).ok())
        .filter(|q| *q >= 1)
    else {
        return error(StatusCode::BAD_REQUEST, "Quantity must be at least 1");
    };

    let mut cart = lock(&state.server_cart);
    match id.checked_sub(1).and_then(|index| cart.get_mut(index)) {
        Some(row) => {
            row.1 = quantity;
            (StatusCode::OK, Json(json!({"message": "Cart updated"})))
        }
        None => error(StatusCode::NOT_FOUND, "Cart item not found"),
    }
}

async fn delete_cart_row(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<usize>,
) -> JsonResponse {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }

    let mut cart = lock(&state.server_cart);
    match id.checked_sub(1).filter(|index| *index < cart.len()) {
        Some(index) => {
            cart.remove(index);
            (StatusCode::OK, Json(json!({"message": "Item removed from cart"})))
        }
        None => error(StatusCode::NOT_FOUND, "Cart item not found"),
    }
}

/// Integer part of a price given as a JSON number or decimal string.
fn whole_units(price: &Value) -> Option<i64> {
    price.as_i64().or_else(|| {
        price
            .as_str()
            .and_then(|s| s.split('.').next())
            .and_then(|units| units.parse().ok())
    })
}

async fn create_order(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> JsonResponse {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    let Some(address) = body["shipping_address"].as_str().filter(|a| !a.is_empty()) else {
        return error(StatusCode::BAD_REQUEST, "Shipping address is required");
    };

    let mut cart = lock(&state.server_cart);
    if cart.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Cart is empty");
    }
    let (items, total) = cart_contents(&cart);
    cart.clear();

    let mut orders = lock(&state.orders);
    let order_id = orders.len() + 1;
    orders.push(json!({
        "id": order_id,
        "total_amount": total,
        "status": "pending",
        "payment_status": "pending",
        "payment_method": body["payment_method"],
        "shipping_address": address,
        "created_at": "2026-01-01 10:00:00",
        "items": items,
    }));

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Order placed successfully",
            "order_id": order_id,
            "total": total,
        })),
    )
}

async fn list_orders(State(state): State<Arc<MockState>>, headers: HeaderMap) -> JsonResponse {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    let orders = lock(&state.orders).iter().rev().cloned().collect();
    (StatusCode::OK, Json(Value::Array(orders)))
}

async fn order(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<usize>,
) -> JsonResponse {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    let found = id
        .checked_sub(1)
        .and_then(|index| lock(&state.orders).get(index).cloned());
    found.map_or_else(
        || error(StatusCode::NOT_FOUND, "Order not found"),
        |o| (StatusCode::OK, Json(o)),
    )
}

/// Non-JSON error page, as a misconfigured proxy would return.
async fn broken() -> impl IntoResponse {
    (
        StatusCode::BAD_GATEWAY,
        "<html><body>502 Bad Gateway</body></html>",
    )
}

/// JSON error without an `error` field.
async fn teapot() -> JsonResponse {
    (StatusCode::IM_A_TEAPOT, Json(json!({"detail": "short and stout"})))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
