//! Session-backed checkout state.
//!
//! Checkout is a four-step flow: 1 shipping address, 2 billing address,
//! 3 shipping method, 4 payment. The state lives in the visitor session
//! across reloads and resets to defaults once an order completes or is
//! abandoned.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// First checkout step.
pub const MIN_STEP: u8 = 1;

/// Last checkout step.
pub const MAX_STEP: u8 = 4;

/// Orders shipping to this country use the domestic rate table.
pub const DOMESTIC_COUNTRY: &str = "Greece";

/// Surcharge added to international shipments (EUR).
pub const INTERNATIONAL_SURCHARGE: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Shipping address fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for ShippingInfo {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            postal_code: String::new(),
            country: DOMESTIC_COUNTRY.to_string(),
        }
    }
}

/// Billing address fields, optionally mirrored from shipping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingInfo {
    pub same_as_shipping: bool,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for BillingInfo {
    fn default() -> Self {
        Self {
            same_as_shipping: true,
            first_name: String::new(),
            last_name: String::new(),
            address: String::new(),
            city: String::new(),
            postal_code: String::new(),
            country: DOMESTIC_COUNTRY.to_string(),
        }
    }
}

/// Partial update for [`ShippingInfo`]; only provided fields overwrite.
#[derive(Debug, Default, Deserialize)]
pub struct ShippingUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// Partial update for [`BillingInfo`]; only provided fields overwrite.
#[derive(Debug, Default, Deserialize)]
pub struct BillingUpdate {
    pub same_as_shipping: Option<bool>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// The checkout state stored in the visitor session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutState {
    /// Current step, always within `[MIN_STEP, MAX_STEP]`.
    pub current_step: u8,
    pub shipping: ShippingInfo,
    pub billing: BillingInfo,
    pub shipping_method: String,
    pub payment_method: String,
    pub order_notes: String,
    /// Set once a payment session has been issued; cleared by reset.
    pub processing: bool,
}

impl Default for CheckoutState {
    fn default() -> Self {
        Self {
            current_step: MIN_STEP,
            shipping: ShippingInfo::default(),
            billing: BillingInfo::default(),
            shipping_method: "standard".to_string(),
            payment_method: "card".to_string(),
            order_notes: String::new(),
            processing: false,
        }
    }
}

impl CheckoutState {
    /// Jump to a step, clamped into `[MIN_STEP, MAX_STEP]`.
    pub fn set_step(&mut self, step: u8) {
        self.current_step = step.clamp(MIN_STEP, MAX_STEP);
    }

    /// Advance one step, saturating at the last step.
    pub fn next_step(&mut self) {
        self.current_step = (self.current_step + 1).min(MAX_STEP);
    }

    /// Go back one step, saturating at the first step.
    pub fn prev_step(&mut self) {
        self.current_step = self.current_step.saturating_sub(1).max(MIN_STEP);
    }

    /// Whether the required fields for a step are filled in.
    ///
    /// Pure predicate over trimmed non-empty strings; only the fields of
    /// the given step are considered. Steps outside the flow validate.
    #[must_use]
    pub fn validate_step(&self, step: u8) -> bool {
        match step {
            1 => all_present(&[
                &self.shipping.first_name,
                &self.shipping.last_name,
                &self.shipping.email,
                &self.shipping.address,
                &self.shipping.city,
                &self.shipping.postal_code,
            ]),
            2 => {
                self.billing.same_as_shipping
                    || all_present(&[
                        &self.billing.first_name,
                        &self.billing.last_name,
                        &self.billing.address,
                        &self.billing.city,
                        &self.billing.postal_code,
                    ])
            }
            3 => !self.shipping_method.trim().is_empty(),
            _ => true,
        }
    }

    /// Validate the step the visitor is currently on.
    #[must_use]
    pub fn validate_current_step(&self) -> bool {
        self.validate_step(self.current_step)
    }

    /// Apply a partial shipping-address update.
    pub fn update_shipping(&mut self, update: ShippingUpdate) {
        let s = &mut self.shipping;
        merge_field(&mut s.first_name, update.first_name);
        merge_field(&mut s.last_name, update.last_name);
        merge_field(&mut s.email, update.email);
        merge_field(&mut s.phone, update.phone);
        merge_field(&mut s.address, update.address);
        merge_field(&mut s.city, update.city);
        merge_field(&mut s.postal_code, update.postal_code);
        merge_field(&mut s.country, update.country);
    }

    /// Apply a partial billing-address update.
    pub fn update_billing(&mut self, update: BillingUpdate) {
        let b = &mut self.billing;
        if let Some(flag) = update.same_as_shipping {
            b.same_as_shipping = flag;
        }
        merge_field(&mut b.first_name, update.first_name);
        merge_field(&mut b.last_name, update.last_name);
        merge_field(&mut b.address, update.address);
        merge_field(&mut b.city, update.city);
        merge_field(&mut b.postal_code, update.postal_code);
        merge_field(&mut b.country, update.country);
    }

    /// Whether the order ships outside the domestic country.
    #[must_use]
    pub fn is_international(&self) -> bool {
        self.shipping.country != DOMESTIC_COUNTRY
    }

    /// Restore all defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn all_present(fields: &[&str]) -> bool {
    fields.iter().all(|field| !field.trim().is_empty())
}

fn merge_field(field: &mut String, update: Option<String>) {
    if let Some(value) = update {
        *field = value;
    }
}

// =============================================================================
// Shipping & Payment Method Tables
// =============================================================================

/// A shipping method offered at checkout.
#[derive(Debug, Clone, Serialize)]
pub struct ShippingMethod {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price: Decimal,
    pub estimated_days: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_threshold: Option<Decimal>,
}

/// The shipping rate table (domestic baseline).
#[must_use]
pub fn shipping_methods() -> Vec<ShippingMethod> {
    vec![
        ShippingMethod {
            id: "standard",
            name: "Κανονική Αποστολή",
            description: "Παράδοση σε 3-5 εργάσιμες ημέρες",
            price: Decimal::new(5, 0),
            estimated_days: "3-5 ημέρες",
            free_threshold: Some(Decimal::new(50, 0)),
        },
        ShippingMethod {
            id: "express",
            name: "Ταχεία Αποστολή",
            description: "Παράδοση σε 1-2 εργάσιμες ημέρες",
            price: Decimal::new(12, 0),
            estimated_days: "1-2 ημέρες",
            free_threshold: None,
        },
        ShippingMethod {
            id: "overnight",
            name: "Επόμενη Εργάσιμη",
            description: "Παράδοση την επόμενη εργάσιμη ημέρα",
            price: Decimal::new(25, 0),
            estimated_days: "1 ημέρα",
            free_threshold: None,
        },
    ]
}

/// A shipping method priced for a specific destination and cart.
#[derive(Debug, Clone, Serialize)]
pub struct ShippingQuote {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Quoted cost after the free threshold and any surcharge.
    pub price: Decimal,
    pub estimated_days: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_threshold: Option<Decimal>,
}

/// Quote the available shipping methods for a destination country and a
/// cart subtotal.
///
/// International destinations lose the overnight option, pay the
/// surcharge, and get stretched delivery estimates. The free threshold is
/// checked before the surcharge, so a qualifying cart ships free anywhere.
#[must_use]
pub fn quote_shipping_methods(country: &str, subtotal: Decimal) -> Vec<ShippingQuote> {
    let international = country != DOMESTIC_COUNTRY;

    shipping_methods()
        .into_iter()
        .filter(|method| !(international && method.id == "overnight"))
        .map(|method| {
            let price = if method.free_threshold.is_some_and(|t| subtotal >= t) {
                Decimal::ZERO
            } else if international {
                method.price + INTERNATIONAL_SURCHARGE
            } else {
                method.price
            };

            let estimated_days = if international {
                let days = if method.id == "standard" { "5-8" } else { "3-5" };
                format!("{days} ημέρες")
            } else {
                method.estimated_days.to_string()
            };

            ShippingQuote {
                id: method.id,
                name: method.name,
                description: method.description,
                price,
                estimated_days,
                free_threshold: method.free_threshold,
            }
        })
        .collect()
}

/// A payment method offered at checkout.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethod {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub fees: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

/// The payment method table.
#[must_use]
pub fn payment_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod {
            id: "card",
            name: "Πιστωτική/Χρεωστική Κάρτα",
            description: "Visa, Mastercard, American Express",
            fees: Decimal::ZERO,
            note: None,
        },
        PaymentMethod {
            id: "paypal",
            name: "PayPal",
            description: "Πληρώστε με τον λογαριασμό σας PayPal",
            fees: Decimal::ZERO,
            note: None,
        },
        PaymentMethod {
            id: "bank_transfer",
            name: "Τραπεζική Κατάθεση",
            description: "Κατάθεση σε τραπεζικό λογαριασμό",
            fees: Decimal::ZERO,
            note: Some("Η παραγγελία θα αποσταλεί μετά την επιβεβαίωση της πληρωμής"),
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled_shipping() -> ShippingInfo {
        ShippingInfo {
            first_name: "Maria".to_string(),
            last_name: "Papadopoulou".to_string(),
            email: "maria@example.net".to_string(),
            phone: "+30 694 000 0000".to_string(),
            address: "Ermou 12".to_string(),
            city: "Athens".to_string(),
            postal_code: "10563".to_string(),
            country: "Greece".to_string(),
        }
    }

    #[test]
    fn test_step_never_leaves_bounds() {
        let mut state = CheckoutState::default();

        for _ in 0..10 {
            state.next_step();
        }
        assert_eq!(state.current_step, MAX_STEP);

        for _ in 0..10 {
            state.prev_step();
        }
        assert_eq!(state.current_step, MIN_STEP);

        state.set_step(99);
        assert_eq!(state.current_step, MAX_STEP);

        state.set_step(0);
        assert_eq!(state.current_step, MIN_STEP);
    }

    #[test]
    fn test_validate_step_one_requires_shipping_fields() {
        let mut state = CheckoutState::default();
        assert!(!state.validate_step(1));

        state.shipping = filled_shipping();
        assert!(state.validate_step(1));

        // Whitespace does not count as filled
        state.shipping.city = "   ".to_string();
        assert!(!state.validate_step(1));

        // Phone is optional on step one
        state.shipping.city = "Athens".to_string();
        state.shipping.phone = String::new();
        assert!(state.validate_step(1));
    }

    #[test]
    fn test_validate_step_two_honors_same_as_shipping() {
        let mut state = CheckoutState::default();
        assert!(state.validate_step(2));

        state.billing.same_as_shipping = false;
        assert!(!state.validate_step(2));

        state.billing.first_name = "Maria".to_string();
        state.billing.last_name = "Papadopoulou".to_string();
        state.billing.address = "Ermou 12".to_string();
        state.billing.city = "Athens".to_string();
        state.billing.postal_code = "10563".to_string();
        assert!(state.validate_step(2));
    }

    #[test]
    fn test_validate_step_three_requires_method() {
        let mut state = CheckoutState::default();
        assert!(state.validate_step(3));

        state.shipping_method = String::new();
        assert!(!state.validate_step(3));
    }

    #[test]
    fn test_validate_step_four_always_passes() {
        let state = CheckoutState::default();
        assert!(state.validate_step(4));
        assert!(state.validate_step(42));
    }

    #[test]
    fn test_update_shipping_is_partial() {
        let mut state = CheckoutState::default();
        state.shipping = filled_shipping();

        state.update_shipping(ShippingUpdate {
            city: Some("Thessaloniki".to_string()),
            ..ShippingUpdate::default()
        });

        assert_eq!(state.shipping.city, "Thessaloniki");
        assert_eq!(state.shipping.first_name, "Maria");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = CheckoutState::default();
        state.shipping = filled_shipping();
        state.set_step(3);
        state.payment_method = "bank_transfer".to_string();
        state.processing = true;

        state.reset();

        assert_eq!(state.current_step, MIN_STEP);
        assert!(state.shipping.first_name.is_empty());
        assert_eq!(state.shipping.country, DOMESTIC_COUNTRY);
        assert_eq!(state.payment_method, "card");
        assert!(!state.processing);
    }

    #[test]
    fn test_domestic_quotes() {
        let quotes = quote_shipping_methods("Greece", Decimal::new(30, 0));

        assert_eq!(quotes.len(), 3);
        let standard = quotes.iter().find(|q| q.id == "standard").unwrap();
        assert_eq!(standard.price, Decimal::new(5, 0));
        assert_eq!(standard.estimated_days, "3-5 ημέρες");
    }

    #[test]
    fn test_free_threshold_waives_standard_shipping() {
        let quotes = quote_shipping_methods("Greece", Decimal::new(50, 0));

        let standard = quotes.iter().find(|q| q.id == "standard").unwrap();
        assert_eq!(standard.price, Decimal::ZERO);

        // Express has no free threshold
        let express = quotes.iter().find(|q| q.id == "express").unwrap();
        assert_eq!(express.price, Decimal::new(12, 0));
    }

    #[test]
    fn test_international_quotes_drop_overnight_and_add_surcharge() {
        let quotes = quote_shipping_methods("Germany", Decimal::new(30, 0));

        assert_eq!(quotes.len(), 2);
        assert!(quotes.iter().all(|q| q.id != "overnight"));

        let standard = quotes.iter().find(|q| q.id == "standard").unwrap();
        assert_eq!(standard.price, Decimal::new(15, 0));
        assert_eq!(standard.estimated_days, "5-8 ημέρες");

        let express = quotes.iter().find(|q| q.id == "express").unwrap();
        assert_eq!(express.price, Decimal::new(22, 0));
        assert_eq!(express.estimated_days, "3-5 ημέρες");
    }

    #[test]
    fn test_free_threshold_applies_before_surcharge() {
        let quotes = quote_shipping_methods("Germany", Decimal::new(60, 0));

        let standard = quotes.iter().find(|q| q.id == "standard").unwrap();
        assert_eq!(standard.price, Decimal::ZERO);
    }

    #[test]
    fn test_payment_methods_table() {
        let methods = payment_methods();

        assert_eq!(methods.len(), 3);
        assert!(methods.iter().all(|m| m.fees == Decimal::ZERO));
        let bank = methods.iter().find(|m| m.id == "bank_transfer").unwrap();
        assert!(bank.note.is_some());
    }
}
