//! Client SDK for the pharmacy platform
//!
//! All business logic (persistence, pricing, inventory, authentication,
//! order processing) lives behind the remote REST API; this crate implements
//! the client side of it:
//!
//! - [`cart::CartService`] — single source of truth for the shopping cart,
//!   mediating every mutation through the remote cart API.
//! - [`catalog`] — pure filter/sort/paginate pipeline over the fetched
//!   medicine list, no network round-trips per filter change.
//! - [`checkout::CheckoutFlow`] — two-step shipping/payment state machine
//!   that validates forms, enforces prescription upload and drives the
//!   order-creation call.
//! - [`api`] — typed wrappers over the REST endpoints.

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use api::{ArticleApi, AuthApi, CartApi, MedicineApi, OrderApi};
pub use cart::{CartService, CartState};
pub use catalog::{FilterOptions, SearchMode, SortKey};
pub use checkout::{CheckoutFlow, CheckoutForm, CheckoutStep, PaymentMethod};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use session::Session;
