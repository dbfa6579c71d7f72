//! Session cart.
//!
//! A cart is an ordered list of [`CartLine`]s held in the shopper's session.
//! Lines carry a snapshot of the product name, price, and image taken when
//! the product was added. Subtotal, shipping, and total are never stored;
//! [`Cart::totals`] derives them on each read.

pub mod totals;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use kultr_core::ProductId;

use crate::catalog::Product;

pub use totals::{CartTotals, ShippingPolicy};

/// Errors from cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// No line with this id.
    #[error("cart line not found: {0}")]
    LineNotFound(String),

    /// The product is marked unavailable.
    #[error("product {0} is not available")]
    Unavailable(ProductId),

    /// A size or color the product is not offered in.
    #[error("unknown {kind} '{value}' for product {product_id}")]
    UnknownVariant {
        product_id: ProductId,
        kind: &'static str,
        value: String,
    },
}

/// One product variant in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Stable id derived from product and variant, see [`CartLine::line_id`].
    pub id: String,
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    /// Always at least 1.
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CartLine {
    /// Line id for a product variant, e.g. `2:M:Navy` or `3::`.
    #[must_use]
    pub fn line_id(product_id: ProductId, size: Option<&str>, color: Option<&str>) -> String {
        format!(
            "{product_id}:{}:{}",
            size.unwrap_or_default(),
            color.unwrap_or_default()
        )
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Add `quantity` of a product variant.
    ///
    /// Missing size/color default to the product's first option. A quantity
    /// of zero is treated as one. Adding a variant already in the cart bumps
    /// that line instead of appending a second one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Unavailable`] for unavailable products and
    /// [`CartError::UnknownVariant`] when the size or color is not offered.
    pub fn add(
        &mut self,
        product: &Product,
        quantity: u32,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<&CartLine, CartError> {
        if !product.available {
            return Err(CartError::Unavailable(product.id));
        }

        let size = resolve_variant(product, "size", &product.sizes, size)?;
        let color = resolve_variant(product, "color", &product.colors, color)?;
        let quantity = quantity.max(1);
        let id = CartLine::line_id(product.id, size.as_deref(), color.as_deref());

        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                id: id.clone(),
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.price,
                quantity,
                image: product.primary_image().map(String::from),
                size,
                color,
            });
        }

        self.line(&id).ok_or(CartError::LineNotFound(id))
    }

    /// Increment a line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown line.
    pub fn increase(&mut self, id: &str) -> Result<&CartLine, CartError> {
        let line = self.line_mut(id)?;
        line.quantity = line.quantity.saturating_add(1);
        Ok(line)
    }

    /// Decrement a line's quantity by one, stopping at one.
    ///
    /// Never removes the line; use [`Cart::remove`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown line.
    pub fn decrease(&mut self, id: &str) -> Result<&CartLine, CartError> {
        let line = self.line_mut(id)?;
        line.quantity = line.quantity.saturating_sub(1).max(1);
        Ok(line)
    }

    /// Remove a line entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown line.
    pub fn remove(&mut self, id: &str) -> Result<CartLine, CartError> {
        let index = self
            .lines
            .iter()
            .position(|line| line.id == id)
            .ok_or_else(|| CartError::LineNotFound(id.to_string()))?;
        Ok(self.lines.remove(index))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Σ quantity.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Σ line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    #[must_use]
    pub fn totals(&self, policy: &ShippingPolicy) -> CartTotals {
        CartTotals::new(self.item_count(), self.subtotal(), policy)
    }

    fn line_mut(&mut self, id: &str) -> Result<&mut CartLine, CartError> {
        self.lines
            .iter_mut()
            .find(|line| line.id == id)
            .ok_or_else(|| CartError::LineNotFound(id.to_string()))
    }
}

/// Pick the requested option, or the first one offered.
fn resolve_variant(
    product: &Product,
    kind: &'static str,
    offered: &[String],
    requested: Option<&str>,
) -> Result<Option<String>, CartError> {
    match requested.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(offered.first().cloned()),
        Some(value) => offered
            .iter()
            .find(|option| option.eq_ignore_ascii_case(value))
            .cloned()
            .map(Some)
            .ok_or_else(|| CartError::UnknownVariant {
                product_id: product.id,
                kind,
                value: value.to_string(),
            }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::product::fixtures::product;

    fn sweater() -> Product {
        let mut p = product(2, "Cashmere Sweater", 19_999, "Clothing");
        p.sizes = vec!["S".into(), "M".into(), "L".into()];
        p.colors = vec!["Ivory".into(), "Navy".into()];
        p
    }

    fn earrings() -> Product {
        product(3, "Gold Statement Earrings", 8_999, "Jewelry")
    }

    #[test]
    fn test_add_defaults_variant_to_first_option() {
        let mut cart = Cart::new();
        let line = cart.add(&sweater(), 1, None, None).unwrap();
        assert_eq!(line.size.as_deref(), Some("S"));
        assert_eq!(line.color.as_deref(), Some("Ivory"));
        assert_eq!(line.id, "2:S:Ivory");
    }

    #[test]
    fn test_add_without_variants() {
        let mut cart = Cart::new();
        let line = cart.add(&earrings(), 2, None, None).unwrap();
        assert_eq!(line.id, "3::");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.image.as_deref(), Some("/images/3.jpg"));
    }

    #[test]
    fn test_add_same_variant_merges() {
        let mut cart = Cart::new();
        cart.add(&sweater(), 1, Some("M"), Some("Navy")).unwrap();
        cart.add(&sweater(), 2, Some("m"), Some("navy")).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_add_different_variant_appends() {
        let mut cart = Cart::new();
        cart.add(&sweater(), 1, Some("M"), None).unwrap();
        cart.add(&sweater(), 1, Some("L"), None).unwrap();
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_add_floors_quantity() {
        let mut cart = Cart::new();
        let line = cart.add(&earrings(), 0, None, None).unwrap();
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_add_rejects_unavailable() {
        let mut sold_out = earrings();
        sold_out.available = false;
        let mut cart = Cart::new();
        assert_eq!(
            cart.add(&sold_out, 1, None, None),
            Err(CartError::Unavailable(ProductId::new(3)))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_unknown_variant() {
        let mut cart = Cart::new();
        let err = cart.add(&sweater(), 1, Some("XXL"), None).unwrap_err();
        assert!(matches!(err, CartError::UnknownVariant { kind: "size", .. }));

        let err = cart.add(&earrings(), 1, None, Some("Red")).unwrap_err();
        assert!(matches!(err, CartError::UnknownVariant { kind: "color", .. }));
    }

    #[test]
    fn test_decrease_stops_at_one() {
        let mut cart = Cart::new();
        let id = cart.add(&earrings(), 1, None, None).unwrap().id.clone();

        let line = cart.decrease(&id).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_increase_then_decrease() {
        let mut cart = Cart::new();
        let id = cart.add(&earrings(), 1, None, None).unwrap().id.clone();
        cart.increase(&id).unwrap();
        cart.increase(&id).unwrap();
        assert_eq!(cart.line(&id).unwrap().quantity, 3);
        cart.decrease(&id).unwrap();
        assert_eq!(cart.line(&id).unwrap().quantity, 2);
    }

    #[test]
    fn test_unknown_line() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.increase("nope").unwrap_err(),
            CartError::LineNotFound("nope".into())
        );
        assert!(cart.decrease("nope").is_err());
        assert!(cart.remove("nope").is_err());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        let id = cart.add(&earrings(), 1, None, None).unwrap().id.clone();
        cart.add(&sweater(), 1, None, None).unwrap();

        let removed = cart.remove(&id).unwrap();
        assert_eq!(removed.product_id, ProductId::new(3));
        assert_eq!(cart.lines().len(), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_subtotal_tracks_mutations() {
        let mut cart = Cart::new();
        let a = cart.add(&earrings(), 1, None, None).unwrap().id.clone();
        let b = cart.add(&sweater(), 1, None, None).unwrap().id.clone();

        let ops: [(&str, &str); 6] = [
            ("inc", a.as_str()),
            ("inc", b.as_str()),
            ("dec", a.as_str()),
            ("dec", a.as_str()),
            ("inc", a.as_str()),
            ("dec", b.as_str()),
        ];
        for (op, id) in ops {
            match op {
                "inc" => cart.increase(id).unwrap(),
                _ => cart.decrease(id).unwrap(),
            };
            let expected: Decimal = cart.lines().iter().map(CartLine::line_total).sum();
            assert_eq!(cart.subtotal(), expected);
            assert!(cart.lines().iter().all(|l| l.quantity >= 1));
        }

        // a: 1 -> 2 -> 1 -> 1 -> 2, b: 1 -> 2 -> 1
        assert_eq!(cart.subtotal(), Decimal::new(8_999 * 2 + 19_999, 2));
        assert_eq!(cart.item_count(), 3);

        cart.remove(&b).unwrap();
        assert_eq!(cart.subtotal(), Decimal::new(8_999 * 2, 2));
    }

    #[test]
    fn test_totals_use_policy() {
        let mut cart = Cart::new();
        cart.add(&earrings(), 1, None, None).unwrap();
        let totals = cart.totals(&ShippingPolicy::default());
        assert_eq!(totals.item_count, 1);
        assert_eq!(totals.shipping, Decimal::new(999, 2));
        assert_eq!(totals.total, Decimal::new(9_998, 2));

        cart.add(&sweater(), 1, None, None).unwrap();
        let totals = cart.totals(&ShippingPolicy::default());
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::new(28_998, 2));
    }

    #[test]
    fn test_cart_survives_session_serialization() {
        let mut cart = Cart::new();
        cart.add(&sweater(), 2, Some("L"), Some("Navy")).unwrap();
        let json = serde_json::to_value(&cart).unwrap();
        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }
}
