//! Substring search over the catalog.

use super::product::Product;

/// Return products whose name, category, or description contains `query`.
///
/// Matching is case-insensitive on the trimmed query. A blank query returns
/// nothing rather than the whole catalog. Results keep catalog order.
#[must_use]
pub fn search<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    products
        .iter()
        .filter(|product| {
            [&product.name, &product.category, &product.description]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}
