//! Session-backed shopping cart.
//!
//! A cart is a flat list of lines. Two lines are the same "item" when they
//! share a product id and a variant (size + color); adding such an item
//! again merges quantities instead of appending a duplicate line. Totals
//! are derived on every read and never stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pnoh_core::{LineId, ProductId, Variant};

/// Greek VAT rate applied to the subtotal (24%).
pub const TAX_RATE: Decimal = Decimal::from_parts(24, 0, 0, false, 2);

/// Subtotal above which shipping is free (EUR).
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Flat shipping fee charged below the free threshold (EUR).
pub const STANDARD_SHIPPING_FEE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// A single cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Stable line handle, assigned when the line is created.
    pub line_id: LineId,
    pub product_id: ProductId,
    pub name: String,
    /// Unit price in EUR.
    pub price: Decimal,
    /// Always >= 1; a line that would drop to zero is removed instead.
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Variant::is_empty")]
    pub variant: Variant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartItem {
    /// Whether this line is the same item as `(product_id, variant)`.
    #[must_use]
    pub fn matches(&self, product_id: ProductId, variant: &Variant) -> bool {
        self.product_id == product_id && self.variant == *variant
    }
}

/// An item requested for addition to the cart.
///
/// A missing or zero `quantity` means 1.
#[derive(Debug, Clone)]
pub struct AddItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub variant: Variant,
    pub image: Option<String>,
    pub quantity: Option<u32>,
}

/// Derived cart totals. Recomputed on every read, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub item_count: u32,
}

/// The shopping cart stored in the visitor session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Add an item, merging quantities when the same product+variant is
    /// already in the cart.
    pub fn add(&mut self, item: AddItem) {
        let quantity = match item.quantity {
            Some(q) if q > 0 => q,
            _ => 1,
        };

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|line| line.matches(item.product_id, &item.variant))
        {
            existing.quantity += quantity;
            return;
        }

        self.items.push(CartItem {
            line_id: LineId::new(),
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            quantity,
            variant: item.variant,
            image: item.image,
        });
    }

    /// Remove lines by identity.
    ///
    /// With `variant: None` every line of the product goes; with a variant
    /// only the exact size+color match goes.
    pub fn remove(&mut self, product_id: ProductId, variant: Option<&Variant>) {
        self.items.retain(|line| {
            !(line.product_id == product_id && variant.is_none_or(|v| line.variant == *v))
        });
    }

    /// Overwrite the quantity of matching lines, or remove them when
    /// `quantity <= 0`.
    ///
    /// Like [`Cart::remove`], `variant: None` addresses every line of the
    /// product.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64, variant: Option<&Variant>) {
        if quantity <= 0 {
            self.remove(product_id, variant);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        for line in &mut self.items {
            if line.product_id == product_id && variant.is_none_or(|v| line.variant == *v) {
                line.quantity = quantity;
            }
        }
    }

    /// Overwrite one line's quantity by its handle, removing it when
    /// `quantity <= 0`. Returns false when no such line exists.
    pub fn set_line_quantity(&mut self, line_id: LineId, quantity: i64) -> bool {
        if !self.items.iter().any(|line| line.line_id == line_id) {
            return false;
        }

        if quantity <= 0 {
            self.items.retain(|line| line.line_id != line_id);
            return true;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        for line in &mut self.items {
            if line.line_id == line_id {
                line.quantity = quantity;
            }
        }
        true
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total unit count across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Derive the cart totals.
    ///
    /// `shipping` is the flat fee unless the subtotal strictly exceeds the
    /// free-shipping threshold.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let subtotal: Decimal = self
            .items
            .iter()
            .map(|line| line.price * Decimal::from(line.quantity))
            .sum();
        let tax = (subtotal * TAX_RATE).round_dp(2);
        let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
            Decimal::ZERO
        } else {
            STANDARD_SHIPPING_FEE
        };
        let total = subtotal + tax + shipping;

        CartTotals {
            subtotal,
            tax,
            shipping,
            total,
            item_count: self.item_count(),
        }
    }

    /// Merge another cart into this one.
    ///
    /// Each of `other`'s lines is added in turn, so colliding identities
    /// sum quantities and the rest append. Used for the guest-cart merge
    /// on sign-in.
    pub fn merge(&mut self, other: Self) {
        for line in other.items {
            self.add(AddItem {
                product_id: line.product_id,
                name: line.name,
                price: line.price,
                variant: line.variant,
                image: line.image,
                quantity: Some(line.quantity),
            });
        }
    }
}
