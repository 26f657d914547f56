//! Data models for the pharmacy platform

pub mod article;
pub mod cart;
pub mod medicine;
pub mod order;
pub mod user;

pub use article::{Article, ArticleComment, ArticleCommentRequest};
pub use cart::{Cart, CartItem};
pub use medicine::Medicine;
pub use order::{Order, OrderCreationRequest, OrderItem, OrderItemRequest, OrderStatus};
pub use user::{UserInfo, UserSummary, UserType};
