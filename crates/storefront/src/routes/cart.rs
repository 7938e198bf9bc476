//! Cart route handlers.
//!
//! The cart is a single JSON blob in the visitor session. Every
//! mutation loads it, applies the change, saves it back, and answers
//! with the full cart view so clients never have to re-fetch.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use pnoh_core::{LineId, ProductId, Variant};

use crate::error::{AppError, Result};
use crate::models::{AddItem, Cart, CartItem, CartTotals, session_keys};
use crate::state::AppState;

// ============================================================================
// Session helpers
// ============================================================================

/// Load the cart from the session, defaulting to an empty one.
pub(crate) async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Persist the cart back into the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

// ============================================================================
// Request and response payloads
// ============================================================================

/// Cart payload returned by every cart endpoint.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        let totals = cart.totals();
        Self {
            items: cart.items,
            totals,
        }
    }
}

/// Item count payload for cart badges.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Line quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub line_id: LineId,
    pub quantity: i64,
}

/// Remove-from-cart request body.
///
/// Omitting both variant axes removes every line of the product.
#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub product_id: ProductId,
    pub size: Option<String>,
    pub color: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Current cart contents with derived totals.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(cart.into()))
}

/// Total unit count, for cart badges.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCount {
        count: cart.item_count(),
    }))
}

/// Add a product to the cart, optionally with a variant selection.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddRequest>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .by_id(request.product_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Product not found.".to_string()))?;

    let product_id = product.id;
    let mut cart = load_cart(&session).await?;
    cart.add(AddItem {
        product_id,
        name: product.name,
        price: product.price,
        variant: Variant {
            size: request.size,
            color: request.color,
        },
        image: product.images.first().cloned(),
        quantity: request.quantity,
    });
    save_cart(&session, &cart).await?;

    tracing::info!(product_id = %product_id, "Added product to cart");
    Ok(Json(cart.into()))
}

/// Overwrite one line's quantity; zero or below removes the line.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    if !cart.set_line_quantity(request.line_id, request.quantity) {
        return Err(AppError::NotFound("Cart line not found.".to_string()));
    }
    save_cart(&session, &cart).await?;

    Ok(Json(cart.into()))
}

/// Remove a product from the cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveRequest>,
) -> Result<Json<CartView>> {
    let variant = if request.size.is_none() && request.color.is_none() {
        None
    } else {
        Some(Variant {
            size: request.size,
            color: request.color,
        })
    };

    let mut cart = load_cart(&session).await?;
    cart.remove(request.product_id, variant.as_ref());
    save_cart(&session, &cart).await?;

    Ok(Json(cart.into()))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_cart_view_carries_totals() {
        let mut cart = Cart::default();
        cart.add(AddItem {
            product_id: ProductId::new(),
            name: "Ring".to_string(),
            price: Decimal::new(4500, 2),
            variant: Variant::none(),
            image: None,
            quantity: Some(2),
        });

        let view: CartView = cart.into();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.totals.item_count, 2);
        assert_eq!(view.totals.subtotal, Decimal::new(9000, 2));
    }

    #[test]
    fn test_remove_request_variant_shape() {
        let request: RemoveRequest = serde_json::from_value(serde_json::json!({
            "product_id": ProductId::new(),
        }))
        .unwrap();
        assert!(request.size.is_none());
        assert!(request.color.is_none());
    }
}
