//! Order endpoints

use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use shared::{Order, OrderCreationRequest};

const BASE: &str = "api/v1/pharmacy/order";

/// Client for `/api/v1/pharmacy/order`
#[derive(Debug, Clone)]
pub struct OrderApi {
    http: HttpClient,
}

impl OrderApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Fetch the current user's order history
    pub async fn my_orders(&self) -> ClientResult<Vec<Order>> {
        self.http.get(&format!("{BASE}/me")).await
    }

    /// Fetch a single order by id
    ///
    /// The confirmation view uses this to refetch the order fresh after
    /// creation rather than reusing the creation response.
    pub async fn get(&self, order_id: &str) -> ClientResult<Order> {
        if order_id.is_empty() {
            return Err(ClientError::Validation("order id is empty".into()));
        }
        self.http.get(&format!("{BASE}/{order_id}")).await
    }

    /// Create an order with an explicit item list
    pub async fn create(&self, request: &OrderCreationRequest) -> ClientResult<Order> {
        self.http.post(BASE, request).await
    }

    /// Create an order from the user's existing server-side cart
    ///
    /// Items are supplied by the server from the cart; the client sends
    /// only the formatted shipping address and the payment method.
    pub async fn create_from_cart(
        &self,
        shipping_address: &str,
        payment_method: &str,
    ) -> ClientResult<Order> {
        let request = OrderCreationRequest {
            shipping_address: shipping_address.to_string(),
            payment_method: payment_method.to_string(),
            items: None,
        };
        self.http.post(&format!("{BASE}/from-cart"), &request).await
    }
}
