//! Domain models for storefront.
//!
//! The cart and checkout types mirror the two state containers the shop
//! runs on: both live as independently-keyed JSON blobs in the visitor
//! session and are recomputed or validated purely in memory.

pub mod cart;
pub mod checkout;
pub mod order;
pub mod session;

pub use cart::{AddItem, Cart, CartItem, CartTotals};
pub use checkout::{BillingInfo, CheckoutState, ShippingInfo};
pub use order::{Order, OrderItem};
pub use session::CurrentUser;
pub use session::keys as session_keys;
