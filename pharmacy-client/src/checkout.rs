//! Checkout orchestrator
//!
//! Drives the two-step checkout flow: shipping details, then payment and
//! review, with validation guards on every forward transition. Submission
//! creates the order from the server-side cart, clears the local cart
//! mirror on success, and keeps the user on the payment step with a
//! retryable error on failure.

use crate::api::OrderApi;
use crate::cart::CartService;
use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use shared::Order;
use std::collections::BTreeMap;

// ============================================================================
// Form state
// ============================================================================

/// Accepted payment methods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    Paypal,
    CashOnDelivery,
}

impl PaymentMethod {
    /// Wire representation sent to the order API
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::Paypal => "PAYPAL",
            PaymentMethod::CashOnDelivery => "CASH_ON_DELIVERY",
        }
    }
}

/// Shipping form fields
#[derive(Debug, Clone, Default)]
pub struct ShippingDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Conditional card sub-fields, only validated for `CREDIT_CARD`
#[derive(Debug, Clone, Default)]
pub struct CardDetails {
    pub number: String,
    /// MM/YY
    pub expiry: String,
    pub cvv: String,
}

/// Prescription file attached during checkout
#[derive(Debug, Clone)]
pub struct PrescriptionFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Transient multi-step checkout form; discarded on success or navigation
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub shipping: ShippingDetails,
    pub payment_method: PaymentMethod,
    pub card: CardDetails,
    pub prescription: Option<PrescriptionFile>,
}

/// Step state machine for the checkout flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutStep {
    /// Initial step: shipping details
    Shipping,
    /// Payment method, card fields, prescription upload and order review
    PaymentReview,
    /// Order creation call in flight; re-entrant submission is rejected
    Submitting,
    /// Order placed; the confirmation view refetches it by id
    Completed { order_id: String },
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Checkout flow over the shared cart mirror and the order API
pub struct CheckoutFlow {
    cart: CartService,
    orders: OrderApi,
    pub form: CheckoutForm,
    step: CheckoutStep,
    requires_prescription: bool,
    field_errors: BTreeMap<String, String>,
    submit_error: Option<String>,
}

impl CheckoutFlow {
    /// Start a checkout over the given cart and order API
    pub fn new(cart: CartService, orders: OrderApi) -> Self {
        Self {
            cart,
            orders,
            form: CheckoutForm::default(),
            step: CheckoutStep::Shipping,
            requires_prescription: false,
            field_errors: BTreeMap::new(),
            submit_error: None,
        }
    }

    /// Current step
    pub fn step(&self) -> &CheckoutStep {
        &self.step
    }

    /// Per-field validation errors from the last failed guard
    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.field_errors
    }

    /// Submit-level error from the last failed order creation
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Whether the prescription upload panel is mandatory
    ///
    /// Derived from the cart contents when entering the payment step.
    pub fn requires_prescription(&self) -> bool {
        self.requires_prescription
    }

    /// Order id after a successful submission
    pub fn order_id(&self) -> Option<&str> {
        match &self.step {
            CheckoutStep::Completed { order_id } => Some(order_id),
            _ => None,
        }
    }

    /// Advance from shipping to payment/review.
    ///
    /// Guarded by shipping validation; on failure the step is unchanged and
    /// the per-field errors are populated. Entering the payment step also
    /// determines whether a prescription upload is mandatory.
    pub async fn next_step(&mut self) -> bool {
        if self.step != CheckoutStep::Shipping {
            return false;
        }

        self.field_errors = validate_shipping(&self.form.shipping);
        if !self.field_errors.is_empty() {
            return false;
        }

        self.requires_prescription = self.cart.requires_prescription().await;
        self.step = CheckoutStep::PaymentReview;
        true
    }

    /// Go back to the shipping step. Always available from payment/review;
    /// already-entered payment fields are retained.
    pub fn previous_step(&mut self) {
        if self.step == CheckoutStep::PaymentReview {
            self.step = CheckoutStep::Shipping;
            self.field_errors.clear();
        }
    }

    /// Submit the order.
    ///
    /// Guarded by payment validation (and the prescription requirement);
    /// guard failures return a `Validation` error without any network call.
    /// On API failure the flow returns to the payment step with the cart
    /// intact so the user can retry. On success the cart is cleared and the
    /// flow completes with the new order id.
    pub async fn submit(&mut self) -> ClientResult<Order> {
        match &self.step {
            CheckoutStep::PaymentReview => {}
            CheckoutStep::Submitting => {
                return Err(ClientError::Validation("submission already in flight".into()));
            }
            _ => {
                return Err(ClientError::Validation(
                    "checkout is not at the payment step".into(),
                ));
            }
        }

        self.field_errors = validate_payment(&self.form, self.requires_prescription);
        if !self.field_errors.is_empty() {
            return Err(ClientError::Validation(
                "payment details failed validation".into(),
            ));
        }

        if self.cart.is_empty().await {
            return Err(ClientError::Validation("cart is empty".into()));
        }

        self.step = CheckoutStep::Submitting;
        self.submit_error = None;

        let shipping_address = format_shipping_address(&self.form.shipping);
        match self
            .orders
            .create_from_cart(&shipping_address, self.form.payment_method.as_str())
            .await
        {
            Ok(order) => {
                // The order now owns the items; a failed clear only leaves a
                // stale mirror, which the next fetch repairs.
                if let Err(err) = self.cart.clear_items().await {
                    tracing::warn!("Cart clear after order {} failed: {}", order.id, err);
                }
                self.step = CheckoutStep::Completed {
                    order_id: order.id.clone(),
                };
                Ok(order)
            }
            Err(err) => {
                tracing::error!("Order creation failed: {}", err);
                self.step = CheckoutStep::PaymentReview;
                self.submit_error =
                    Some("Failed to place your order. Please try again.".to_string());
                Err(err)
            }
        }
    }

    /// Fetch the placed order fresh from the server for the confirmation
    /// view. Never reuses the creation response.
    pub async fn confirmation(&self) -> ClientResult<Order> {
        match &self.step {
            CheckoutStep::Completed { order_id } => self.orders.get(order_id).await,
            _ => Err(ClientError::Validation("no order has been placed".into())),
        }
    }
}

// ============================================================================
// Validation guards
// ============================================================================

fn format_shipping_address(shipping: &ShippingDetails) -> String {
    format!(
        "{}, {}, {}, {} {}, {}",
        shipping.full_name,
        shipping.address,
        shipping.city,
        shipping.state,
        shipping.zip_code,
        shipping.phone
    )
}

fn validate_shipping(shipping: &ShippingDetails) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();

    if shipping.full_name.trim().is_empty() {
        errors.insert("fullName".to_string(), "Full name is required".to_string());
    }
    if shipping.email.trim().is_empty() {
        errors.insert("email".to_string(), "Email is required".to_string());
    } else if !is_valid_email(shipping.email.trim()) {
        errors.insert("email".to_string(), "Email is invalid".to_string());
    }
    if shipping.phone.trim().is_empty() {
        errors.insert("phone".to_string(), "Phone number is required".to_string());
    }
    if shipping.address.trim().is_empty() {
        errors.insert("address".to_string(), "Address is required".to_string());
    }
    if shipping.city.trim().is_empty() {
        errors.insert("city".to_string(), "City is required".to_string());
    }
    if shipping.state.trim().is_empty() {
        errors.insert("state".to_string(), "State is required".to_string());
    }
    if shipping.zip_code.trim().is_empty() {
        errors.insert("zipCode".to_string(), "ZIP code is required".to_string());
    }

    errors
}

fn validate_payment(form: &CheckoutForm, requires_prescription: bool) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();

    if form.payment_method == PaymentMethod::CreditCard {
        let card = &form.card;
        if card.number.trim().is_empty() {
            errors.insert(
                "cardNumber".to_string(),
                "Card number is required".to_string(),
            );
        } else if !is_valid_card_number(&card.number) {
            errors.insert(
                "cardNumber".to_string(),
                "Card number must be 16 digits".to_string(),
            );
        }

        if card.expiry.trim().is_empty() {
            errors.insert(
                "cardExpiry".to_string(),
                "Expiry date is required".to_string(),
            );
        } else if !is_valid_expiry(&card.expiry) {
            errors.insert(
                "cardExpiry".to_string(),
                "Expiry date must be MM/YY".to_string(),
            );
        }

        if card.cvv.trim().is_empty() {
            errors.insert("cardCvv".to_string(), "CVV is required".to_string());
        } else if !is_valid_cvv(&card.cvv) {
            errors.insert(
                "cardCvv".to_string(),
                "CVV must be 3 or 4 digits".to_string(),
            );
        }
    }

    if requires_prescription && form.prescription.is_none() {
        errors.insert(
            "prescriptionFile".to_string(),
            "Prescription is required for some items in your cart".to_string(),
        );
    }

    errors
}

/// Basic pattern check, equivalent to `\S+@\S+\.\S+`
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Exactly 16 digits after stripping whitespace
fn is_valid_card_number(number: &str) -> bool {
    let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    digits.len() == 16 && digits.chars().all(|c| c.is_ascii_digit())
}

/// MM/YY
fn is_valid_expiry(expiry: &str) -> bool {
    let bytes = expiry.as_bytes();
    bytes.len() == 5
        && bytes[0].is_ascii_digit()
        && bytes[1].is_ascii_digit()
        && bytes[2] == b'/'
        && bytes[3].is_ascii_digit()
        && bytes[4].is_ascii_digit()
}

/// 3 or 4 digits
fn is_valid_cvv(cvv: &str) -> bool {
    (cvv.len() == 3 || cvv.len() == 4) && cvv.chars().all(|c| c.is_ascii_digit())
}
