//! Account route handlers.
//!
//! These routes require authentication. Profile data lives with the
//! identity provider; this service keeps only the session snapshot.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use pnoh_core::{Email, UserId};

use crate::error::Result;
use crate::middleware::{RequireAuth, set_current_user};
use crate::models::{CurrentUser, Order};
use crate::models::order::sample_orders;
use crate::state::AppState;

/// Profile payload for the signed-in user.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
}

impl From<CurrentUser> for ProfileView {
    fn from(user: CurrentUser) -> Self {
        let display_name = user.display_name();
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            display_name,
        }
    }
}

/// Profile update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
}

/// Show the signed-in user's profile.
///
/// # Route
///
/// `GET /account`
pub async fn show(RequireAuth(user): RequireAuth) -> Json<ProfileView> {
    Json(user.into())
}

/// Update the user's first and last name via the identity provider.
///
/// The provider's response is authoritative; the session snapshot is
/// refreshed from it.
///
/// # Route
///
/// `POST /account/profile`
#[instrument(skip(state, session, user, request))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileView>> {
    let profile = state
        .identity()
        .update_names(user.id.as_str(), &request.first_name, &request.last_name)
        .await?;

    let mut user = user;
    user.first_name = profile.first_name.unwrap_or_default();
    user.last_name = profile.last_name.unwrap_or_default();
    set_current_user(&session, &user).await?;

    tracing::info!(user_id = %user.id, "Profile updated");
    Ok(Json(user.into()))
}

/// Order history for the signed-in user.
///
/// # Route
///
/// `GET /account/orders`
pub async fn orders(RequireAuth(_user): RequireAuth) -> Json<Vec<Order>> {
    Json(sample_orders())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_view_from_current_user() {
        let user = CurrentUser {
            id: UserId::from("user_123"),
            email: Email::parse("maria@example.com").unwrap(),
            first_name: "Maria".to_string(),
            last_name: "Papadopoulou".to_string(),
        };

        let view: ProfileView = user.into();
        assert_eq!(view.display_name, "Maria Papadopoulou");
        assert_eq!(view.id.as_str(), "user_123");
    }
}
