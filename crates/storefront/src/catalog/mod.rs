//! Product catalog.
//!
//! The catalog is a flat, immutable list of [`Product`] records loaded once at
//! startup, either from the JSON document embedded in the binary or from a
//! file named by `STOREFRONT_CATALOG_PATH`. Every listing request re-runs the
//! [`listing`] pipeline over it; nothing is cached.

pub mod listing;
pub mod product;
pub mod search;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use kultr_core::ProductId;

pub use listing::{
    CategoryFilter, Listing, ListingQuery, PAGE_SIZE, PriceRange, SortOrder, build_listing,
};
pub use product::Product;

/// Catalog document shipped with the binary.
const EMBEDDED_CATALOG: &str = include_str!("../../catalog/products.json");

/// Number of related products shown on a detail page.
pub const RELATED_LIMIT: usize = 4;

/// Errors loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),

    #[error("duplicate product slug '{0}'")]
    DuplicateSlug(String),
}

/// A selectable filter or sort option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub id: String,
    pub name: String,
}

/// Filter and sort options rendered alongside the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub categories: Vec<FacetOption>,
    pub price_ranges: Vec<FacetOption>,
    pub sort_options: Vec<FacetOption>,
}

/// Shared, read-only product catalog.
///
/// Cheap to clone.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<[Product]>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids or slugs.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] or [`CatalogError::DuplicateSlug`].
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        let mut slugs = HashSet::new();
        for product in &products {
            if !ids.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if !slugs.insert(product.slug.as_str()) {
                return Err(CatalogError::DuplicateSlug(product.slug.clone()));
            }
        }

        Ok(Self {
            products: products.into(),
        })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or contains duplicates.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// The catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded document is invalid.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load from `path`, or fall back to the embedded catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                let catalog = Self::from_json(&json)?;
                tracing::info!(path = %path.display(), products = catalog.len(), "Catalog loaded from file");
                Ok(catalog)
            }
            None => {
                let catalog = Self::embedded()?;
                tracing::info!(products = catalog.len(), "Embedded catalog loaded");
                Ok(catalog)
            }
        }
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn find_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    /// Up to [`RELATED_LIMIT`] other products: same category first, then the
    /// rest of the catalog in order.
    #[must_use]
    pub fn related(&self, product: &Product) -> Vec<&Product> {
        let others = || self.products.iter().filter(|p| p.id != product.id);
        let same = others().filter(|p| p.category.eq_ignore_ascii_case(&product.category));
        let rest = others().filter(|p| !p.category.eq_ignore_ascii_case(&product.category));
        same.chain(rest).take(RELATED_LIMIT).collect()
    }

    /// Run the listing pipeline.
    #[must_use]
    pub fn listing(&self, query: &ListingQuery) -> Listing<'_> {
        build_listing(&self.products, query)
    }

    /// Catalog search; see [`search::search`].
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        search::search(&self.products, query)
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| seen.insert(c.to_lowercase()))
            .collect()
    }

    /// Options for the filter sidebar and sort dropdown.
    #[must_use]
    pub fn facets(&self) -> Facets {
        let categories = std::iter::once(FacetOption {
            id: listing::ALL.to_string(),
            name: "All Categories".to_string(),
        })
        .chain(self.categories().into_iter().map(|c| FacetOption {
            id: c.to_lowercase(),
            name: c.to_string(),
        }))
        .collect();

        let price_ranges = PriceRange::OPTIONS
            .iter()
            .map(|r| FacetOption {
                id: r.id().to_string(),
                name: r.label().to_string(),
            })
            .collect();

        let sort_options = SortOrder::OPTIONS
            .iter()
            .map(|s| FacetOption {
                id: s.id().to_string(),
                name: s.label().to_string(),
            })
            .collect();

        Facets {
            categories,
            price_ranges,
            sort_options,
        }
    }
}
