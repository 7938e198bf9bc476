//! Authentication route handlers.
//!
//! Credentials never touch this service. Sign-in and sign-up redirect
//! to the identity provider's hosted pages with a one-time CSRF state
//! parameter; the callback validates the state, establishes the session
//! user, and merges the guest cart into the account cart.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use pnoh_core::{Email, UserId};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::routes::cart::{load_cart, save_cart};
use crate::services::IdentityError;
use crate::services::identity::map_provider_error;
use crate::state::AppState;

/// Query parameters from the identity provider callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authenticated user id, present on success.
    pub user_id: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Provider error code if sign-in failed.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

/// Generate a cryptographically secure random string.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            // SAFETY: idx is always within bounds since random_range returns 0..CHARSET.len()
            char::from(*CHARSET.get(idx).expect("idx within bounds"))
        })
        .collect()
}

/// Begin sign-in on the provider's hosted page.
///
/// # Route
///
/// `GET /auth/sign-in`
#[instrument(skip(state, session))]
pub async fn sign_in(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let auth_state = generate_random_string(32);
    session
        .insert(session_keys::AUTH_STATE, &auth_state)
        .await?;

    let url = state
        .identity()
        .hosted_sign_in_url(&state.config().base_url, &auth_state);
    Ok(Redirect::to(&url))
}

/// Begin sign-up on the provider's hosted page.
///
/// # Route
///
/// `GET /auth/sign-up`
#[instrument(skip(state, session))]
pub async fn sign_up(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let auth_state = generate_random_string(32);
    session
        .insert(session_keys::AUTH_STATE, &auth_state)
        .await?;

    let url = state
        .identity()
        .hosted_sign_up_url(&state.config().base_url, &auth_state);
    Ok(Redirect::to(&url))
}

/// Handle the provider callback.
///
/// Validates and consumes the one-time state, fetches the user's
/// profile, establishes the session user, and merges the guest cart
/// into the account cart.
///
/// # Route
///
/// `GET /auth/callback`
#[instrument(skip(state, session, query))]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect> {
    // Check for provider errors first
    if let Some(code) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!("Identity provider error: {} - {}", code, description);
        return Err(AppError::Unauthorized(map_provider_error(&code).to_string()));
    }

    // Verify state parameter (CSRF protection)
    let Some(returned_state) = query.state else {
        tracing::warn!("Auth callback missing state");
        return Err(AppError::BadRequest("Missing sign-in state.".to_string()));
    };

    // Consume the stored state (one-time use)
    let stored_state = session.remove::<String>(session_keys::AUTH_STATE).await?;
    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("Auth callback state mismatch");
        return Err(AppError::Unauthorized(
            "Invalid sign-in state, please try again.".to_string(),
        ));
    }

    let Some(user_id) = query.user_id else {
        tracing::warn!("Auth callback missing user id");
        return Err(AppError::BadRequest(
            "Missing user id in callback.".to_string(),
        ));
    };

    let profile = state.identity().fetch_user(&user_id).await?;
    let email = profile.primary_email().ok_or_else(|| {
        AppError::Identity(IdentityError::Parse(
            "user profile has no email address".to_string(),
        ))
    })?;
    let email =
        Email::parse(email).map_err(|e| AppError::Identity(IdentityError::Parse(e.to_string())))?;

    let user = CurrentUser {
        id: UserId::from(user_id),
        email,
        first_name: profile.first_name.clone().unwrap_or_default(),
        last_name: profile.last_name.clone().unwrap_or_default(),
    };

    set_current_user(&session, &user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    // Merge the guest cart into any cart parked under this account,
    // then hand the merged cart back to the session.
    let guest_cart = load_cart(&session).await?;
    let mut cart = state.carts().take(&user.id).unwrap_or_default();
    cart.merge(guest_cart);
    save_cart(&session, &cart).await?;

    tracing::info!(user_id = %user.id, "Customer signed in");
    Ok(Redirect::to("/account"))
}

/// Sign out, parking the session cart for the next sign-in.
///
/// # Route
///
/// `POST /auth/sign-out`
#[instrument(skip(state, session, user))]
pub async fn sign_out(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Redirect {
    if let Some(user) = user {
        // Park the cart so it survives until the next sign-in (best effort)
        match load_cart(&session).await {
            Ok(cart) => state.carts().store(user.id, cart),
            Err(e) => tracing::warn!("Failed to park cart on sign-out: {}", e),
        }
    }

    // Destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    clear_sentry_user();
    Redirect::to("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_string_length_and_charset() {
        let s = generate_random_string(32);
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_random_string_is_unique() {
        assert_ne!(generate_random_string(32), generate_random_string(32));
    }
}
