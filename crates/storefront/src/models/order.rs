//! Placed orders.
//!
//! Orders are snapshots: the line names, prices, and totals are captured at
//! placement time and never re-read from the catalog. Order numbers look
//! like `PN-<millis>-<5 chars>` and come from the wall clock plus a random
//! suffix, which keeps them sortable by placement time.

use chrono::{DateTime, Utc};
use pnoh_core::types::{OrderId, OrderStatus, Variant};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::Cart;

/// Generate a random uppercase alphanumeric suffix.
fn generate_order_suffix(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            // SAFETY: idx is always within bounds since random_range returns 0..CHARSET.len()
            char::from(*CHARSET.get(idx).expect("idx within bounds"))
        })
        .collect()
}

/// Generate a fresh order number (`PN-<epoch millis>-<suffix>`).
#[must_use]
pub fn generate_order_id() -> OrderId {
    OrderId::new(format!(
        "PN-{}-{}",
        Utc::now().timestamp_millis(),
        generate_order_suffix(5)
    ))
}

/// A cart line frozen at placement time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Variant::is_empty")]
    pub variant: Variant,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Place an order from the current cart.
    ///
    /// Bank-transfer orders wait for the deposit to arrive before they are
    /// confirmed; every other payment method confirms immediately.
    #[must_use]
    pub fn place(cart: &Cart, payment_method: &str) -> Self {
        let totals = cart.totals();
        let items = cart
            .items
            .iter()
            .map(|line| OrderItem {
                name: line.name.clone(),
                price: line.price,
                quantity: line.quantity,
                variant: line.variant.clone(),
            })
            .collect();

        let status = if payment_method == "bank_transfer" {
            OrderStatus::AwaitingPayment
        } else {
            OrderStatus::Confirmed
        };

        Self {
            id: generate_order_id(),
            status,
            items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            shipping: totals.shipping,
            total: totals.total,
            payment_method: payment_method.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Fixture order history returned while no order store is wired up.
#[must_use]
pub fn sample_orders() -> Vec<Order> {
    let created_at = DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

    vec![Order {
        id: OrderId::new("PN-1705314600000-ABC12".to_string()),
        status: OrderStatus::Shipped,
        items: vec![
            OrderItem {
                name: "Χειροποίητο Δαχτυλίδι".to_string(),
                price: Decimal::new(4500, 2),
                quantity: 1,
                variant: Variant::none(),
            },
            OrderItem {
                name: "Χρυσό Κολιέ".to_string(),
                price: Decimal::new(8900, 2),
                quantity: 1,
                variant: Variant::none(),
            },
        ],
        subtotal: Decimal::new(13400, 2),
        tax: Decimal::new(3216, 2),
        shipping: Decimal::ZERO,
        total: Decimal::new(16616, 2),
        payment_method: "card".to_string(),
        created_at,
    }]
}
