//! Cart model
//!
//! Server-owned aggregate mirrored locally by the cart service. The totals
//! must always equal the aggregate of the current items; helpers here keep
//! that invariant when the client has to recompute locally.

use super::user::UserSummary;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single line in the cart
///
/// `price` is the unit price captured at add time; it is not live-synced
/// to the current catalog price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub medicine_id: String,
    pub medicine_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medicine_image: Option<String>,
    pub quantity: u32,
    pub price: Decimal,
    pub prescription_required: bool,
}

impl CartItem {
    /// Line total (unit price x quantity)
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Shopping cart aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    pub user: UserSummary,
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Whether the cart has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any item in the cart requires a prescription
    pub fn requires_prescription(&self) -> bool {
        self.items.iter().any(|item| item.prescription_required)
    }

    /// Recompute `total_items` and `total_amount` from the current items.
    ///
    /// Used after local-only mutations (item removal) where the server
    /// returns a generic acknowledgement instead of the updated cart.
    pub fn recompute_totals(&mut self) {
        self.total_items = self.items.iter().map(|item| item.quantity).sum();
        self.total_amount = self.items.iter().map(CartItem::subtotal).sum();
    }
}
