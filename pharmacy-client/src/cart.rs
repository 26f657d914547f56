//! Cart synchronization service
//!
//! Single source of truth for the cart on the client. Every consumer
//! (header badge, cart page, checkout summary) reads from one shared
//! mirror, and every mutation goes through the remote cart API.
//!
//! All server round trips are serialized through one sync lock, so a late
//! response can never overwrite a newer mirror — two rapid quantity bumps
//! are applied in order, not last-response-wins.

use crate::api::CartApi;
use crate::error::{ClientError, ClientResult};
use futures::future::join_all;
use rust_decimal::Decimal;
use shared::Cart;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Observable state shared by all cart consumers
#[derive(Debug, Default)]
pub struct CartState {
    /// Local mirror of the server-owned cart
    pub cart: Option<Cart>,
    /// Whether a round trip is in flight
    pub loading: bool,
    /// Last user-visible error, cleared on the next successful operation
    pub error: Option<String>,
}

struct Inner {
    api: CartApi,
    state: RwLock<CartState>,
    /// Serializes every server round trip (single-flight)
    sync_lock: Mutex<()>,
}

/// Handle to the one cart mirror of the session
///
/// Cloning is cheap and every clone observes the same state. Mutation
/// failures leave the last-known-good mirror intact and surface the error
/// both as a return value and in the shared error slot.
#[derive(Clone)]
pub struct CartService {
    inner: Arc<Inner>,
}

impl CartService {
    /// Create a cart service over the given cart API
    pub fn new(api: CartApi) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                state: RwLock::new(CartState::default()),
                sync_lock: Mutex::new(()),
            }),
        }
    }

    // ========== Sync operations ==========

    /// Load the current cart from the server, replacing the mirror wholesale.
    ///
    /// On failure the mirror is left unchanged; the caller gets the error
    /// and the error slot is set so the UI can show a retry affordance.
    pub async fn fetch_cart(&self) -> ClientResult<()> {
        let _guard = self.inner.sync_lock.lock().await;
        self.begin().await;
        match self.inner.api.get().await {
            Ok(cart) => {
                self.replace(cart).await;
                Ok(())
            }
            Err(err) => {
                self.fail("Failed to load your cart. Please try again.", &err)
                    .await;
                Err(err)
            }
        }
    }

    /// Explicit manual sync point; same contract as [`Self::fetch_cart`]
    pub async fn refresh_cart(&self) -> ClientResult<()> {
        self.fetch_cart().await
    }

    /// Add an item to the cart.
    ///
    /// The mirror is replaced with the server's authoritative returned cart;
    /// price and stock are never computed locally on add.
    pub async fn add_item(&self, medicine_id: &str, quantity: u32) -> ClientResult<()> {
        if medicine_id.is_empty() {
            return Err(ClientError::Validation("medicine id is empty".into()));
        }
        if quantity < 1 {
            return Err(ClientError::Validation(
                "quantity must be at least 1".into(),
            ));
        }

        let _guard = self.inner.sync_lock.lock().await;
        self.begin().await;
        match self.inner.api.add(medicine_id, quantity).await {
            Ok(cart) => {
                self.replace(cart).await;
                Ok(())
            }
            Err(err) => {
                self.fail("Failed to add item to cart. Please try again.", &err)
                    .await;
                Err(err)
            }
        }
    }

    /// Change an item's quantity.
    ///
    /// Quantities below 1 are rejected outright; reducing an item to zero is
    /// expressed as [`Self::remove_item`], never as an update.
    pub async fn update_item(&self, medicine_id: &str, quantity: u32) -> ClientResult<()> {
        if quantity < 1 {
            return Err(ClientError::Validation(
                "quantity must be at least 1; remove the item instead".into(),
            ));
        }

        let _guard = self.inner.sync_lock.lock().await;
        self.begin().await;
        match self.inner.api.update(medicine_id, quantity).await {
            Ok(cart) => {
                self.replace(cart).await;
                Ok(())
            }
            Err(err) => {
                self.fail("Failed to update cart item. Please try again.", &err)
                    .await;
                Err(err)
            }
        }
    }

    /// Remove an item from the cart.
    ///
    /// The remove endpoint returns a generic acknowledgement rather than the
    /// updated cart, so the mirror is recomputed locally: the item is
    /// filtered out and the totals are rebuilt from the remaining items.
    pub async fn remove_item(&self, medicine_id: &str) -> ClientResult<()> {
        let _guard = self.inner.sync_lock.lock().await;
        self.begin().await;
        match self.inner.api.remove(medicine_id).await {
            Ok(_ack) => {
                let mut state = self.inner.state.write().await;
                if let Some(cart) = state.cart.as_mut() {
                    cart.items.retain(|item| item.medicine_id != medicine_id);
                    cart.recompute_totals();
                }
                state.loading = false;
                state.error = None;
                Ok(())
            }
            Err(err) => {
                self.fail("Failed to remove item from cart. Please try again.", &err)
                    .await;
                Err(err)
            }
        }
    }

    /// Remove every item from the cart.
    ///
    /// Issues one remove call per item concurrently. Items that removed
    /// successfully are dropped from the mirror even when others fail; the
    /// ids that failed to clear are reported in
    /// [`ClientError::PartialFailure`].
    pub async fn clear_items(&self) -> ClientResult<()> {
        let _guard = self.inner.sync_lock.lock().await;
        self.begin().await;

        let medicine_ids: Vec<String> = {
            let state = self.inner.state.read().await;
            state
                .cart
                .as_ref()
                .map(|cart| {
                    cart.items
                        .iter()
                        .map(|item| item.medicine_id.clone())
                        .collect()
                })
                .unwrap_or_default()
        };

        if medicine_ids.is_empty() {
            let mut state = self.inner.state.write().await;
            state.loading = false;
            state.error = None;
            return Ok(());
        }

        let results = join_all(
            medicine_ids
                .iter()
                .map(|medicine_id| self.inner.api.remove(medicine_id)),
        )
        .await;

        let mut failed = Vec::new();
        for (medicine_id, result) in medicine_ids.iter().zip(results) {
            if let Err(err) = result {
                tracing::warn!("Failed to clear cart item {}: {}", medicine_id, err);
                failed.push(medicine_id.clone());
            }
        }

        let mut state = self.inner.state.write().await;
        if let Some(cart) = state.cart.as_mut() {
            if failed.is_empty() {
                cart.items.clear();
            } else {
                cart.items.retain(|item| failed.contains(&item.medicine_id));
            }
            cart.recompute_totals();
        }
        state.loading = false;

        if failed.is_empty() {
            state.error = None;
            Ok(())
        } else {
            state.error = Some("Failed to clear some items from your cart.".to_string());
            Err(ClientError::PartialFailure { failed })
        }
    }

    // ========== Read model ==========

    /// Snapshot of the current cart mirror
    pub async fn cart(&self) -> Option<Cart> {
        self.inner.state.read().await.cart.clone()
    }

    /// Whether a round trip is currently in flight
    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.loading
    }

    /// Last user-visible error, if any
    pub async fn error(&self) -> Option<String> {
        self.inner.state.read().await.error.clone()
    }

    /// Total quantity across all items (0 when no cart is loaded)
    pub async fn total_items(&self) -> u32 {
        self.inner
            .state
            .read()
            .await
            .cart
            .as_ref()
            .map(|cart| cart.total_items)
            .unwrap_or(0)
    }

    /// Total amount across all items (0 when no cart is loaded)
    pub async fn total_amount(&self) -> Decimal {
        self.inner
            .state
            .read()
            .await
            .cart
            .as_ref()
            .map(|cart| cart.total_amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Whether the cart is empty or not yet loaded
    pub async fn is_empty(&self) -> bool {
        self.inner
            .state
            .read()
            .await
            .cart
            .as_ref()
            .map(Cart::is_empty)
            .unwrap_or(true)
    }

    /// Whether any item in the cart requires a prescription
    pub async fn requires_prescription(&self) -> bool {
        self.inner
            .state
            .read()
            .await
            .cart
            .as_ref()
            .map(Cart::requires_prescription)
            .unwrap_or(false)
    }

    // ========== Internal state transitions ==========

    async fn begin(&self) {
        let mut state = self.inner.state.write().await;
        state.loading = true;
        state.error = None;
    }

    async fn replace(&self, cart: Cart) {
        let mut state = self.inner.state.write().await;
        state.cart = Some(cart);
        state.loading = false;
        state.error = None;
    }

    async fn fail(&self, message: &str, err: &ClientError) {
        tracing::error!("{} ({})", message, err);
        let mut state = self.inner.state.write().await;
        state.loading = false;
        state.error = Some(message.to_string());
    }
}
