//! Payment-session service.
//!
//! Creates checkout sessions for the payment provider. The current
//! implementation is a mock: it mints a `cs_mock_*` session pointing at our
//! own success page instead of calling Stripe, so the rest of the checkout
//! flow can be exercised end to end without provider credentials. A live
//! implementation slots in behind the same `create` call.

use chrono::Utc;
use pnoh_core::types::{Price, UserId};
use serde::Serialize;
use thiserror::Error;

use crate::models::{Cart, CheckoutState};

/// Errors that can occur when creating a checkout session.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The cart has no lines to pay for.
    #[error("cannot create a checkout session for an empty cart")]
    EmptyCart,
}

/// A created payment session.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSession {
    /// Provider session ID (`cs_mock_<unix millis>`).
    pub id: String,
    /// Where to send the customer to complete payment.
    pub url: String,
}

/// Checkout session factory.
#[derive(Debug, Clone)]
pub struct CheckoutSessions {
    base_url: String,
}

impl CheckoutSessions {
    /// Create the service against the public base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a payment session for the given cart.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::EmptyCart`] when the cart has no lines.
    pub fn create(
        &self,
        user_id: &UserId,
        cart: &Cart,
        checkout: &CheckoutState,
    ) -> Result<CheckoutSession, PaymentError> {
        if cart.is_empty() {
            return Err(PaymentError::EmptyCart);
        }

        let totals = cart.totals();
        let id = format!("cs_mock_{}", Utc::now().timestamp_millis());
        let url = format!(
            "{}/checkout/success?session_id={id}&payment=card",
            self.base_url
        );

        let items: Vec<String> = cart
            .items
            .iter()
            .map(|line| format!("{} x{}", line.name, line.quantity))
            .collect();

        tracing::info!(
            user_id = %user_id,
            ?items,
            total = %Price::eur(totals.total),
            shipping_method = %checkout.shipping_method,
            customer_email = %checkout.shipping.email,
            session_id = %id,
            "Mock checkout session created"
        );

        Ok(CheckoutSession { id, url })
    }
}
