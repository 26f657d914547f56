//! Shared types for the pharmacy platform client
//!
//! Wire-format data model used across the SDK: catalog, cart, order and
//! article entities plus the standard API response envelope.

pub mod models;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    Article, ArticleComment, Cart, CartItem, Medicine, Order, OrderCreationRequest, OrderItem,
    OrderStatus, UserInfo, UserSummary, UserType,
};
pub use response::ApiResponse;
