//! Catalog product records.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use kultr_core::{Price, ProductId};

/// A catalog product.
///
/// Immutable once loaded; the catalog is read, never written, at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Current selling price.
    pub price: Decimal,
    /// Price before markdown, shown struck through next to `price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub description: String,
    /// Image references, the first being the card/hero image.
    #[serde(default)]
    pub images: Vec<String>,
    /// Flat category name (e.g. "Bags").
    pub category: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub is_new: bool,
    /// URL key for the product detail route.
    pub slug: String,
}

const fn default_available() -> bool {
    true
}

impl Product {
    /// Discount badge percentage, derived from `original_price`.
    ///
    /// Rounds like the storefront badge always has: half up, so a 12.5% markdown
    /// shows as 13%. Nothing checks that `original_price` exceeds `price`; a
    /// markup yields zero or a negative number, which callers hide.
    #[must_use]
    pub fn discount_percent(&self) -> Option<i64> {
        let original = self.original_price?;
        if original.is_zero() {
            return None;
        }
        let ratio = (original - self.price) / original * Decimal::ONE_HUNDRED;
        (ratio + Decimal::new(5, 1)).floor().to_i64()
    }

    /// Current price with currency.
    #[must_use]
    pub const fn price_usd(&self) -> Price {
        Price::usd(self.price)
    }

    /// Card/hero image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Color preselected on the detail page.
    #[must_use]
    pub fn default_color(&self) -> Option<&str> {
        self.colors.first().map(String::as_str)
    }

    /// Size preselected on the detail page.
    #[must_use]
    pub fn default_size(&self) -> Option<&str> {
        self.sizes.first().map(String::as_str)
    }
}
