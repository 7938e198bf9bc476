//! Order placement and history API handlers.
//!
//! There is no order datastore behind these endpoints. Placement
//! snapshots the session cart into an order and answers with a
//! confirmation slice; history serves a fixed sample list.

use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use pnoh_core::{OrderId, OrderStatus, Price};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::models::order::sample_orders;
use crate::routes::cart::{load_cart, save_cart};
use crate::routes::checkout::{load_checkout, save_checkout};

/// Order placement request body.
///
/// Terms acceptance is transient client state, so it rides on the
/// request instead of the checkout blob.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub terms_accepted: bool,
}

/// Response body for a placed order.
#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub success: bool,
    pub order: OrderSummary,
}

/// The slice of the order a confirmation screen needs.
#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub status: OrderStatus,
    pub total: Decimal,
}

/// Place an order from the session cart and checkout state.
///
/// Clears the cart and resets the checkout flow on success.
///
/// # Route
///
/// `POST /api/orders`
#[instrument(skip(session, user, request))]
pub async fn place(
    session: Session,
    RequireAuth(user): RequireAuth,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<Json<PlaceOrderResponse>> {
    if !request.terms_accepted {
        return Err(AppError::Validation(
            "Please accept the terms of use to continue.".to_string(),
        ));
    }

    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest(
            "Cannot place an order with an empty cart.".to_string(),
        ));
    }

    let mut checkout = load_checkout(&session).await?;
    let order = Order::place(&cart, &checkout.payment_method);

    tracing::info!(
        order_id = %order.id,
        user_id = %user.id,
        total = %Price::eur(order.total),
        payment_method = %order.payment_method,
        "Order placed"
    );

    cart.clear();
    save_cart(&session, &cart).await?;
    checkout.reset();
    save_checkout(&session, &checkout).await?;

    Ok(Json(PlaceOrderResponse {
        success: true,
        order: OrderSummary {
            id: order.id,
            status: order.status,
            total: order.total,
        },
    }))
}

/// Order history for the signed-in user.
///
/// # Route
///
/// `GET /api/orders`
pub async fn list(RequireAuth(_user): RequireAuth) -> Json<Vec<Order>> {
    Json(sample_orders())
}
