//! Medicine catalog model
//!
//! Read-only catalog entity owned by the server. The client never mutates
//! a medicine; it only filters, sorts and pages the fetched list.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Medicine entity as returned by `/api/v1/pharmacy/medicine`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: String,
    pub name: String,
    pub manufacturer: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category: String,
    pub prescription_required: bool,
    pub description: String,
    pub manufacturing_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    #[serde(default)]
    pub active_ingredients: Vec<String>,
    #[serde(default)]
    pub side_effects: Vec<String>,
    #[serde(default)]
    pub dosage_instructions: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Medicine {
    /// Whether the medicine can currently be added to a cart
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}
