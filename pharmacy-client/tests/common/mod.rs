//! In-process mock of the pharmacy REST API
//!
//! Backs the integration tests with a real HTTP boundary: an axum router
//! implementing the envelope convention (and one deliberately bare-shaped
//! endpoint), plus failure injection for the error-path tests.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use shared::models::{ArticleCommentRequest, OrderItemRequest};
use shared::{
    ApiResponse, Article, ArticleComment, Cart, CartItem, Medicine, Order, OrderItem, OrderStatus,
    UserInfo, UserSummary, UserType,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub struct MockPharmacy {
    pub base_url: String,
    pub state: Arc<MockState>,
}

#[derive(Default)]
pub struct MockState {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    medicines: Vec<Medicine>,
    cart_items: Vec<CartItem>,
    orders: Vec<Order>,
    articles: Vec<Article>,
    order_calls: u32,
    fail_next_add: bool,
    fail_next_order: bool,
    fail_remove_ids: HashSet<String>,
}

impl MockState {
    pub fn seed_medicine(&self, id: &str, name: &str, price: &str, prescription: bool) {
        let now = Utc::now();
        let mut inner = self.inner.lock().unwrap();
        inner.medicines.push(Medicine {
            id: id.to_string(),
            name: name.to_string(),
            manufacturer: "Acme Pharma".to_string(),
            price: price.parse().unwrap(),
            stock_quantity: 100,
            category: "General".to_string(),
            prescription_required: prescription,
            description: format!("{name} tablets"),
            manufacturing_date: now,
            expiry_date: now,
            active_ingredients: vec![],
            side_effects: vec![],
            dosage_instructions: String::new(),
            images: vec![],
            created_at: now,
            updated_at: now,
        });
    }

    pub fn seed_article(&self, id: &str, title: &str) {
        let now = Utc::now();
        let mut inner = self.inner.lock().unwrap();
        inner.articles.push(Article {
            id: id.to_string(),
            doctor: UserSummary {
                first_name: "Greg".to_string(),
                last_name: "House".to_string(),
                image_url: String::new(),
            },
            title: title.to_string(),
            content: "...".to_string(),
            poster_url: None,
            image_url: None,
            category: "Health".to_string(),
            tags: vec![],
            status: "PUBLISHED".to_string(),
            views: 0,
            created_at: now,
            updated_at: now,
        });
    }

    /// Make the next add-to-cart call fail with a 500
    pub fn fail_next_add(&self) {
        self.inner.lock().unwrap().fail_next_add = true;
    }

    /// Make the next order creation fail with a 500
    pub fn fail_next_order(&self) {
        self.inner.lock().unwrap().fail_next_order = true;
    }

    /// Make every remove call for this medicine id fail with a 500
    pub fn fail_remove(&self, medicine_id: &str) {
        self.inner
            .lock()
            .unwrap()
            .fail_remove_ids
            .insert(medicine_id.to_string());
    }

    pub fn clear_remove_failures(&self) {
        self.inner.lock().unwrap().fail_remove_ids.clear();
    }

    /// How many order creation calls reached the server
    pub fn order_calls(&self) -> u32 {
        self.inner.lock().unwrap().order_calls
    }

    /// Items currently in the server-side cart
    pub fn server_cart_len(&self) -> usize {
        self.inner.lock().unwrap().cart_items.len()
    }

    fn cart_snapshot(inner: &Inner) -> Cart {
        let now = Utc::now();
        let mut cart = Cart {
            id: "cart-1".to_string(),
            user: UserSummary {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                image_url: String::new(),
            },
            items: inner.cart_items.clone(),
            total_items: 0,
            total_amount: rust_decimal::Decimal::ZERO,
            created_at: now,
            updated_at: now,
        };
        cart.recompute_totals();
        cart
    }
}

fn server_error(message: &str) -> (StatusCode, Json<ApiResponse<Value>>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(message)),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartItemRequest {
    medicine_id: String,
    quantity: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderRequest {
    shipping_address: String,
    payment_method: String,
    #[serde(default)]
    items: Option<Vec<OrderItemRequest>>,
}

#[derive(Deserialize)]
struct SearchParams {
    query: String,
}

#[derive(Deserialize)]
struct FilterParams {
    category: String,
}

// ========== Medicine handlers ==========

async fn get_medicines(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    let inner = state.inner.lock().unwrap();
    Json(ApiResponse::ok(inner.medicines.clone()))
}

async fn search_medicines(
    State(state): State<Arc<MockState>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let query = params.query.to_lowercase();
    let inner = state.inner.lock().unwrap();
    let hits: Vec<Medicine> = inner
        .medicines
        .iter()
        .filter(|m| m.name.to_lowercase().contains(&query))
        .cloned()
        .collect();
    Json(ApiResponse::ok(hits))
}

async fn filter_medicines(
    State(state): State<Arc<MockState>>,
    Query(params): Query<FilterParams>,
) -> impl IntoResponse {
    let inner = state.inner.lock().unwrap();
    let hits: Vec<Medicine> = inner
        .medicines
        .iter()
        .filter(|m| m.category == params.category)
        .cloned()
        .collect();
    Json(ApiResponse::ok(hits))
}

/// Accepts the uploaded file and answers with the whole catalog
async fn upload_prescription(
    State(state): State<Arc<MockState>>,
    mut multipart: axum::extract::Multipart,
) -> axum::response::Response {
    let mut saw_file = false;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            saw_file = !field.bytes().await.unwrap_or_default().is_empty();
        }
    }
    if !saw_file {
        return server_error("No prescription file attached").into_response();
    }
    let inner = state.inner.lock().unwrap();
    Json(ApiResponse::ok(inner.medicines.clone())).into_response()
}

/// Deliberately envelope-less, mirroring the one inconsistent endpoint
async fn get_medicine_by_id(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let inner = state.inner.lock().unwrap();
    match inner.medicines.iter().find(|m| m.id == id) {
        Some(medicine) => Json(medicine.clone()).into_response(),
        None => server_error("Medicine not found").into_response(),
    }
}

// ========== Cart handlers ==========

async fn get_cart(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    let inner = state.inner.lock().unwrap();
    Json(ApiResponse::ok(MockState::cart_snapshot(&inner)))
}

async fn add_to_cart(
    State(state): State<Arc<MockState>>,
    Json(request): Json<CartItemRequest>,
) -> axum::response::Response {
    let mut inner = state.inner.lock().unwrap();
    if std::mem::take(&mut inner.fail_next_add) {
        return server_error("Injected add failure").into_response();
    }

    let Some(medicine) = inner
        .medicines
        .iter()
        .find(|m| m.id == request.medicine_id)
        .cloned()
    else {
        return server_error("Medicine not found").into_response();
    };

    if let Some(item) = inner
        .cart_items
        .iter_mut()
        .find(|item| item.medicine_id == request.medicine_id)
    {
        item.quantity += request.quantity;
    } else {
        inner.cart_items.push(CartItem {
            id: format!("ci-{}", uuid::Uuid::new_v4()),
            medicine_id: medicine.id.clone(),
            medicine_name: medicine.name.clone(),
            medicine_image: None,
            quantity: request.quantity,
            price: medicine.price,
            prescription_required: medicine.prescription_required,
        });
    }

    Json(ApiResponse::ok(MockState::cart_snapshot(&inner))).into_response()
}

async fn update_cart(
    State(state): State<Arc<MockState>>,
    Json(request): Json<CartItemRequest>,
) -> axum::response::Response {
    let mut inner = state.inner.lock().unwrap();
    match inner
        .cart_items
        .iter_mut()
        .find(|item| item.medicine_id == request.medicine_id)
    {
        Some(item) => item.quantity = request.quantity,
        None => return server_error("Item not in cart").into_response(),
    }
    Json(ApiResponse::ok(MockState::cart_snapshot(&inner))).into_response()
}

/// Returns a generic acknowledgement, not the updated cart
async fn remove_from_cart(
    State(state): State<Arc<MockState>>,
    Path(medicine_id): Path<String>,
) -> axum::response::Response {
    let mut inner = state.inner.lock().unwrap();
    if inner.fail_remove_ids.contains(&medicine_id) {
        return server_error("Injected remove failure").into_response();
    }
    inner
        .cart_items
        .retain(|item| item.medicine_id != medicine_id);
    Json(ApiResponse::ok("Item removed from cart".to_string())).into_response()
}

// ========== Order handlers ==========

async fn create_order_from_cart(
    State(state): State<Arc<MockState>>,
    Json(request): Json<CreateOrderRequest>,
) -> axum::response::Response {
    let mut inner = state.inner.lock().unwrap();
    inner.order_calls += 1;

    if std::mem::take(&mut inner.fail_next_order) {
        return server_error("Injected order failure").into_response();
    }
    if inner.cart_items.is_empty() {
        return server_error("Cart is empty").into_response();
    }

    let now = Utc::now();
    let items: Vec<OrderItem> = inner
        .cart_items
        .iter()
        .map(|item| OrderItem {
            id: format!("oi-{}", uuid::Uuid::new_v4()),
            medicine_id: item.medicine_id.clone(),
            medicine_name: item.medicine_name.clone(),
            medicine_image: item.medicine_image.clone(),
            quantity: item.quantity,
            price: item.price,
            subtotal: item.subtotal(),
        })
        .collect();

    let order = Order {
        id: format!("order-{}", uuid::Uuid::new_v4()),
        user_id: "u-1".to_string(),
        order_number: format!("ORD-{:06}", inner.orders.len() + 1),
        total_items: items.iter().map(|item| item.quantity).sum(),
        total_amount: items.iter().map(|item| item.subtotal).sum(),
        items,
        shipping_address: request.shipping_address,
        payment_method: request.payment_method,
        status: OrderStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    // The from-cart contract consumes the server-side cart.
    inner.cart_items.clear();
    inner.orders.push(order.clone());

    Json(ApiResponse::ok(order)).into_response()
}

/// Explicit-item creation; the cart is left alone
async fn create_order(
    State(state): State<Arc<MockState>>,
    Json(request): Json<CreateOrderRequest>,
) -> axum::response::Response {
    let mut inner = state.inner.lock().unwrap();
    inner.order_calls += 1;

    let Some(requested) = request.items.filter(|items| !items.is_empty()) else {
        return server_error("No items in request").into_response();
    };

    let mut items = Vec::new();
    for entry in &requested {
        let Some(medicine) = inner.medicines.iter().find(|m| m.id == entry.medicine_id) else {
            return server_error("Medicine not found").into_response();
        };
        items.push(OrderItem {
            id: format!("oi-{}", uuid::Uuid::new_v4()),
            medicine_id: medicine.id.clone(),
            medicine_name: medicine.name.clone(),
            medicine_image: None,
            quantity: entry.quantity,
            price: medicine.price,
            subtotal: medicine.price * rust_decimal::Decimal::from(entry.quantity),
        });
    }

    let now = Utc::now();
    let order = Order {
        id: format!("order-{}", uuid::Uuid::new_v4()),
        user_id: "u-1".to_string(),
        order_number: format!("ORD-{:06}", inner.orders.len() + 1),
        total_items: items.iter().map(|item| item.quantity).sum(),
        total_amount: items.iter().map(|item| item.subtotal).sum(),
        items,
        shipping_address: request.shipping_address,
        payment_method: request.payment_method,
        status: OrderStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    inner.orders.push(order.clone());

    Json(ApiResponse::ok(order)).into_response()
}

async fn get_order(
    State(state): State<Arc<MockState>>,
    Path(order_id): Path<String>,
) -> axum::response::Response {
    let inner = state.inner.lock().unwrap();
    match inner.orders.iter().find(|order| order.id == order_id) {
        Some(order) => Json(ApiResponse::ok(order.clone())).into_response(),
        None => server_error("Order not found").into_response(),
    }
}

async fn my_orders(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    let inner = state.inner.lock().unwrap();
    Json(ApiResponse::ok(inner.orders.clone()))
}

// ========== Article and auth handlers ==========

async fn list_articles(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    let inner = state.inner.lock().unwrap();
    Json(ApiResponse::ok(inner.articles.clone()))
}

async fn get_article(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let inner = state.inner.lock().unwrap();
    match inner.articles.iter().find(|a| a.id == id) {
        Some(article) => Json(ApiResponse::ok(article.clone())).into_response(),
        None => server_error("Article not found").into_response(),
    }
}

async fn like_article(Path(_id): Path<String>) -> impl IntoResponse {
    Json(ApiResponse::<Value>::ok_with_message(Value::Null, "Liked"))
}

async fn add_comment(
    Path(_id): Path<String>,
    Json(request): Json<ArticleCommentRequest>,
) -> impl IntoResponse {
    Json(ApiResponse::ok(ArticleComment {
        id: format!("c-{}", uuid::Uuid::new_v4()),
        user: UserSummary {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            image_url: String::new(),
        },
        comment: request.comment,
        created_at: Utc::now(),
    }))
}

fn signed_in_user() -> UserInfo {
    UserInfo {
        id: "u-1".to_string(),
        email: "jane@example.com".to_string(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        user_type: UserType::Patient,
    }
}

async fn patient_login(Json(_request): Json<Value>) -> impl IntoResponse {
    Json(ApiResponse::ok(signed_in_user()))
}

async fn me() -> impl IntoResponse {
    Json(ApiResponse::ok(signed_in_user()))
}

async fn logout() -> impl IntoResponse {
    Json(ApiResponse::<Value>::ok_with_message(Value::Null, "Logged out"))
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/v1/pharmacy/medicine", get(get_medicines))
        .route("/api/v1/pharmacy/medicine/search", get(search_medicines))
        .route("/api/v1/pharmacy/medicine/filter", get(filter_medicines))
        .route(
            "/api/v1/pharmacy/medicine/upload-prescription",
            post(upload_prescription),
        )
        .route("/api/v1/pharmacy/medicine/{id}", get(get_medicine_by_id))
        .route("/api/v1/pharmacy/cart", get(get_cart))
        .route("/api/v1/pharmacy/cart/add", post(add_to_cart))
        .route("/api/v1/pharmacy/cart/update", put(update_cart))
        .route(
            "/api/v1/pharmacy/cart/remove/{medicine_id}",
            delete(remove_from_cart),
        )
        .route("/api/v1/pharmacy/order", post(create_order))
        .route("/api/v1/pharmacy/order/from-cart", post(create_order_from_cart))
        .route("/api/v1/pharmacy/order/me", get(my_orders))
        .route("/api/v1/pharmacy/order/{order_id}", get(get_order))
        .route("/api/v1/article/core", get(list_articles))
        .route("/api/v1/article/core/{id}", get(get_article))
        .route("/api/v1/article/core/{id}/like", post(like_article))
        .route("/api/v1/article/core/{id}/comment", post(add_comment))
        .route("/api/v1/auth/patient/login", post(patient_login))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/auth/logout", post(logout))
        .with_state(state)
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Start the mock API on an ephemeral port
pub async fn spawn() -> MockPharmacy {
    spawn_with_options(false).await
}

/// Start the mock API, optionally dropping the first TCP connection before
/// serving (simulates a transient network failure for the retry tests).
pub async fn spawn_with_options(drop_first_connection: bool) -> MockPharmacy {
    init_tracing();
    let state = Arc::new(MockState::default());
    let app = router(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if drop_first_connection {
            if let Ok((stream, _)) = listener.accept().await {
                drop(stream);
            }
        }
        axum::serve(listener, app).await.unwrap();
    });

    MockPharmacy {
        base_url: format!("http://{addr}"),
        state,
    }
}
