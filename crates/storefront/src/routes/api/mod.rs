//! JSON API route handlers.
//!
//! # Modules
//!
//! - `orders` - Order placement and history
//! - `payments` - Mock payment sessions and the Stripe webhook receiver

pub mod orders;
pub mod payments;
