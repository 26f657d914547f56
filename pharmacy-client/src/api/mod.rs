//! Typed wrappers over the platform REST endpoints
//!
//! Each wrapper is a thin, cheaply-cloneable facade over [`HttpClient`]
//! scoped to one resource family under `/api/v1`.

pub mod article;
pub mod auth;
pub mod cart;
pub mod medicine;
pub mod order;

pub use article::ArticleApi;
pub use auth::AuthApi;
pub use cart::CartApi;
pub use medicine::MedicineApi;
pub use order::OrderApi;
