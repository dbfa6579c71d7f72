//! Cart totals and the shipping rule.

use rust_decimal::Decimal;
use serde::Serialize;

/// Flat-rate shipping with a free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Subtotals strictly above this ship free.
    pub free_threshold: Decimal,
    /// Charged when the subtotal is at or below the threshold.
    pub flat_fee: Decimal,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_threshold: Decimal::new(15_000, 2),
            flat_fee: Decimal::new(999, 2),
        }
    }
}

impl ShippingPolicy {
    /// Shipping charged on `subtotal`.
    ///
    /// The comparison is strict: a subtotal of exactly the threshold still
    /// pays the fee. An empty cart (zero subtotal) is quoted the fee too.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.free_threshold {
            Decimal::ZERO
        } else {
            self.flat_fee
        }
    }
}

/// Derived cart figures, recomputed on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    /// Sum of quantities, shown on the header badge.
    pub item_count: u32,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    /// Amount still needed for free shipping; zero once it applies.
    pub free_shipping_remaining: Decimal,
}

impl CartTotals {
    /// Compute totals from a subtotal and item count.
    #[must_use]
    pub fn new(item_count: u32, subtotal: Decimal, policy: &ShippingPolicy) -> Self {
        let shipping = policy.shipping_for(subtotal);
        let free_shipping_remaining = if shipping.is_zero() {
            Decimal::ZERO
        } else {
            (policy.free_threshold - subtotal).max(Decimal::ZERO)
        };

        Self {
            item_count,
            subtotal,
            shipping,
            total: subtotal + shipping,
            free_shipping_remaining,
        }
    }
}
