//! Checkout route handlers.
//!
//! Checkout state is a session blob alongside the cart. Mutations
//! answer with the full checkout view (step, form fields, available
//! methods, current-step validity) so clients can re-render the whole
//! flow from one response.

use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::checkout::{
    BillingUpdate, PaymentMethod, ShippingQuote, ShippingUpdate, payment_methods,
    quote_shipping_methods, shipping_methods,
};
use crate::models::{BillingInfo, CheckoutState, ShippingInfo, session_keys};
use crate::routes::cart::load_cart;

// ============================================================================
// Session helpers
// ============================================================================

/// Load checkout state from the session, defaulting to a fresh flow.
pub(crate) async fn load_checkout(session: &Session) -> Result<CheckoutState> {
    Ok(session
        .get::<CheckoutState>(session_keys::CHECKOUT)
        .await?
        .unwrap_or_default())
}

/// Persist checkout state back into the session.
pub(crate) async fn save_checkout(session: &Session, checkout: &CheckoutState) -> Result<()> {
    session.insert(session_keys::CHECKOUT, checkout).await?;
    Ok(())
}

// ============================================================================
// Request and response payloads
// ============================================================================

/// Full checkout payload returned by every checkout endpoint.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub current_step: u8,
    /// Whether the current step's required fields are complete.
    pub step_valid: bool,
    pub shipping: ShippingInfo,
    pub billing: BillingInfo,
    pub shipping_method: String,
    pub payment_method: String,
    pub order_notes: String,
    pub processing: bool,
    /// Quotes for the session's shipping country at the current subtotal.
    pub shipping_methods: Vec<ShippingQuote>,
    pub payment_methods: Vec<PaymentMethod>,
}

/// Shipping method selection request body.
#[derive(Debug, Deserialize)]
pub struct ShippingMethodRequest {
    pub shipping_method: String,
}

/// Payment method selection request body.
#[derive(Debug, Deserialize)]
pub struct PaymentMethodRequest {
    pub payment_method: String,
}

/// Order notes request body.
#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    pub notes: String,
}

fn build_view(checkout: CheckoutState, subtotal: Decimal) -> CheckoutView {
    CheckoutView {
        current_step: checkout.current_step,
        step_valid: checkout.validate_current_step(),
        shipping_methods: quote_shipping_methods(&checkout.shipping.country, subtotal),
        payment_methods: payment_methods(),
        shipping: checkout.shipping,
        billing: checkout.billing,
        shipping_method: checkout.shipping_method,
        payment_method: checkout.payment_method,
        order_notes: checkout.order_notes,
        processing: checkout.processing,
    }
}

async fn view_response(session: &Session, checkout: CheckoutState) -> Result<Json<CheckoutView>> {
    let cart = load_cart(session).await?;
    Ok(Json(build_view(checkout, cart.totals().subtotal)))
}

// ============================================================================
// Handlers
// ============================================================================

/// Current checkout state.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CheckoutView>> {
    let checkout = load_checkout(&session).await?;
    view_response(&session, checkout).await
}

/// Partially update the shipping address fields.
#[instrument(skip(session, update))]
pub async fn update_shipping(
    session: Session,
    Json(update): Json<ShippingUpdate>,
) -> Result<Json<CheckoutView>> {
    let mut checkout = load_checkout(&session).await?;
    checkout.update_shipping(update);
    save_checkout(&session, &checkout).await?;

    view_response(&session, checkout).await
}

/// Partially update the billing address fields.
#[instrument(skip(session, update))]
pub async fn update_billing(
    session: Session,
    Json(update): Json<BillingUpdate>,
) -> Result<Json<CheckoutView>> {
    let mut checkout = load_checkout(&session).await?;
    checkout.update_billing(update);
    save_checkout(&session, &checkout).await?;

    view_response(&session, checkout).await
}

/// Select a shipping method by id.
#[instrument(skip(session))]
pub async fn set_shipping_method(
    session: Session,
    Json(request): Json<ShippingMethodRequest>,
) -> Result<Json<CheckoutView>> {
    if !shipping_methods()
        .iter()
        .any(|method| method.id == request.shipping_method)
    {
        return Err(AppError::BadRequest("Unknown shipping method.".to_string()));
    }

    let mut checkout = load_checkout(&session).await?;
    checkout.shipping_method = request.shipping_method;
    save_checkout(&session, &checkout).await?;

    view_response(&session, checkout).await
}

/// Select a payment method by id.
#[instrument(skip(session))]
pub async fn set_payment_method(
    session: Session,
    Json(request): Json<PaymentMethodRequest>,
) -> Result<Json<CheckoutView>> {
    if !payment_methods()
        .iter()
        .any(|method| method.id == request.payment_method)
    {
        return Err(AppError::BadRequest("Unknown payment method.".to_string()));
    }

    let mut checkout = load_checkout(&session).await?;
    checkout.payment_method = request.payment_method;
    save_checkout(&session, &checkout).await?;

    view_response(&session, checkout).await
}

/// Replace the free-text order notes.
#[instrument(skip(session, request))]
pub async fn set_notes(
    session: Session,
    Json(request): Json<NotesRequest>,
) -> Result<Json<CheckoutView>> {
    let mut checkout = load_checkout(&session).await?;
    checkout.order_notes = request.notes;
    save_checkout(&session, &checkout).await?;

    view_response(&session, checkout).await
}

/// Advance to the next step, rejecting when the current one is incomplete.
#[instrument(skip(session))]
pub async fn next_step(session: Session) -> Result<Json<CheckoutView>> {
    let mut checkout = load_checkout(&session).await?;
    if !checkout.validate_current_step() {
        return Err(AppError::Validation(
            "Please complete all required fields for this step.".to_string(),
        ));
    }

    checkout.next_step();
    save_checkout(&session, &checkout).await?;

    view_response(&session, checkout).await
}

/// Step back one step; step 1 stays put.
#[instrument(skip(session))]
pub async fn previous_step(session: Session) -> Result<Json<CheckoutView>> {
    let mut checkout = load_checkout(&session).await?;
    checkout.prev_step();
    save_checkout(&session, &checkout).await?;

    view_response(&session, checkout).await
}

/// Abandon the flow and restore defaults.
#[instrument(skip(session))]
pub async fn reset(session: Session) -> Result<Json<CheckoutView>> {
    let mut checkout = load_checkout(&session).await?;
    checkout.reset();
    save_checkout(&session, &checkout).await?;

    view_response(&session, checkout).await
}

/// Shipping quotes for the session's country at the current subtotal.
#[instrument(skip(session))]
pub async fn shipping_method_quotes(session: Session) -> Result<Json<Vec<ShippingQuote>>> {
    let checkout = load_checkout(&session).await?;
    let cart = load_cart(&session).await?;

    Ok(Json(quote_shipping_methods(
        &checkout.shipping.country,
        cart.totals().subtotal,
    )))
}
