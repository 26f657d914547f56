//! Cart endpoints
//!
//! Note the asymmetric contract: `add` and `update` return the full updated
//! cart, while `remove` returns only a generic acknowledgement. The cart
//! service compensates with a local recompute after removals.

use crate::error::ClientResult;
use crate::http::HttpClient;
use serde::Serialize;
use shared::Cart;

const BASE: &str = "api/v1/pharmacy/cart";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartItemRequest<'a> {
    medicine_id: &'a str,
    quantity: u32,
}

/// Client for `/api/v1/pharmacy/cart`
#[derive(Debug, Clone)]
pub struct CartApi {
    http: HttpClient,
}

impl CartApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Fetch the current user's cart
    pub async fn get(&self) -> ClientResult<Cart> {
        self.http.get(BASE).await
    }

    /// Add an item; returns the server's authoritative updated cart
    pub async fn add(&self, medicine_id: &str, quantity: u32) -> ClientResult<Cart> {
        let body = CartItemRequest {
            medicine_id,
            quantity,
        };
        self.http.post(&format!("{BASE}/add"), &body).await
    }

    /// Change an item's quantity; returns the updated cart
    pub async fn update(&self, medicine_id: &str, quantity: u32) -> ClientResult<Cart> {
        let body = CartItemRequest {
            medicine_id,
            quantity,
        };
        self.http.put(&format!("{BASE}/update"), &body).await
    }

    /// Remove an item; the endpoint acknowledges without returning the cart
    pub async fn remove(&self, medicine_id: &str) -> ClientResult<String> {
        self.http.delete(&format!("{BASE}/remove/{medicine_id}")).await
    }
}
