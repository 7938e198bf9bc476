//! Outbound service clients for the storefront.
//!
//! # Services
//!
//! - `identity` - Identity provider client (hosted sign-in pages, profile
//!   reads and updates via the provider's Backend API)
//! - `payments` - Payment-session service (mock implementation)

pub mod identity;
pub mod payments;

pub use identity::{ClerkClient, IdentityError};
pub use payments::{CheckoutSession, CheckoutSessions, PaymentError};
