//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use pnoh_core::types::{Email, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the signed-in customer.
/// The identity provider remains the source of truth; this is a cache of
/// what the account pages need on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Provider-issued user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Given name, may be empty.
    pub first_name: String,
    /// Family name, may be empty.
    pub last_name: String,
}

impl CurrentUser {
    /// Full display name, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.to_string()
        } else {
            name.to_string()
        }
    }
}

/// Session keys for storefront data.
pub mod keys {
    /// Key for storing the current signed-in customer.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the shopping cart.
    pub const CART: &str = "cart";

    /// Key for the checkout flow state.
    pub const CHECKOUT: &str = "checkout";

    /// Key for sign-in state (CSRF protection).
    pub const AUTH_STATE: &str = "auth_state";
}
