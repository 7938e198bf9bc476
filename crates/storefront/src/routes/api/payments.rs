//! Payment-session API handlers.
//!
//! The Stripe integration is mocked end to end: session creation
//! fabricates a `cs_mock_*` id pointing at the success page, and the
//! webhook receiver only acknowledges delivery.

use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::routes::cart::load_cart;
use crate::routes::checkout::{load_checkout, save_checkout};
use crate::state::AppState;

/// Checkout-session request body.
///
/// Terms acceptance is transient client state, so it rides on the
/// request instead of the checkout blob.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub terms_accepted: bool,
}

/// Response body for a created checkout session.
#[derive(Debug, Serialize)]
pub struct CheckoutSessionResponse {
    pub url: String,
    pub session_id: String,
}

/// Webhook acknowledgement body.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// Create a mock payment session for the current cart.
///
/// Fails with a service error when the cart is empty. On success the
/// checkout flow is flagged as processing.
///
/// # Route
///
/// `POST /api/checkout/session`
#[instrument(skip(state, session, user, request))]
pub async fn create_session(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<CheckoutSessionResponse>> {
    if !request.terms_accepted {
        return Err(AppError::Validation(
            "Please accept the terms of use to continue.".to_string(),
        ));
    }

    let cart = load_cart(&session).await?;
    let mut checkout = load_checkout(&session).await?;

    let payment_session = state.payments().create(&user.id, &cart, &checkout)?;

    checkout.processing = true;
    save_checkout(&session, &checkout).await?;

    Ok(Json(CheckoutSessionResponse {
        url: payment_session.url,
        session_id: payment_session.id,
    }))
}

/// Receive a Stripe webhook event.
///
/// Signature verification is out of scope for the mock integration;
/// delivery is logged and acknowledged.
///
/// # Route
///
/// `POST /api/stripe/webhook`
pub async fn stripe_webhook(headers: HeaderMap, body: String) -> Json<WebhookAck> {
    tracing::info!(
        signature_present = headers.contains_key("stripe-signature"),
        body_length = body.len(),
        "Stripe webhook received"
    );

    Json(WebhookAck { received: true })
}
