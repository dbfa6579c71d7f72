//! Product listing and detail handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use kultr_core::{Price, ProductId};

use crate::catalog::{Facets, ListingQuery, PAGE_SIZE, Product};
use crate::error::{AppError, AppQuery, Result};
use crate::state::AppState;

/// Product summary used on listing grids, search results, and related rows.
#[derive(Debug, Clone, Serialize)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub price: Decimal,
    pub price_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub is_new: bool,
    pub available: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            category: product.category.clone(),
            price: product.price,
            price_display: product.price_usd().display(),
            original_price: product.original_price,
            // Markups and zero discounts get no badge
            discount_percent: product.discount_percent().filter(|d| *d > 0),
            image: product.primary_image().map(String::from),
            is_new: product.is_new,
            available: product.available,
        }
    }
}

/// Selections echoed back with the listing.
#[derive(Debug, Serialize)]
pub struct SelectedFilters {
    pub category: String,
    pub price: &'static str,
    pub sort: &'static str,
    pub has_active_filters: bool,
}

/// `GET /shop` response.
#[derive(Debug, Serialize)]
pub struct ShopResponse {
    pub products: Vec<ProductCard>,
    pub total_count: usize,
    pub filtered_count: usize,
    pub page: u32,
    pub page_size: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub selected: SelectedFilters,
    pub facets: Facets,
}

/// `GET /product/{slug}` response.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub price_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_size: Option<String>,
    pub related: Vec<ProductCard>,
}

/// Filtered, sorted, paginated product listing.
///
/// Unknown `price` or `sort` ids fail query extraction with 400.
#[instrument(skip(state))]
pub async fn shop(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListingQuery>,
) -> Json<ShopResponse> {
    let catalog = state.catalog();
    let listing = catalog.listing(&query);

    tracing::debug!(
        filtered = listing.filtered_count,
        page = listing.page,
        total_pages = listing.total_pages,
        "Listing built"
    );

    Json(ShopResponse {
        products: listing.products.iter().copied().map(ProductCard::from).collect(),
        total_count: listing.total_count,
        filtered_count: listing.filtered_count,
        page: listing.page,
        page_size: PAGE_SIZE,
        total_pages: listing.total_pages,
        has_prev: listing.has_prev,
        has_next: listing.has_next,
        selected: SelectedFilters {
            category: query.category.id().to_string(),
            price: query.price.id(),
            sort: query.sort.id(),
            has_active_filters: query.has_active_filters(),
        },
        facets: catalog.facets(),
    })
}

/// Product detail with related products.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>> {
    let catalog = state.catalog();
    let product = catalog
        .find_by_slug(&slug)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let related = catalog
        .related(product)
        .into_iter()
        .map(ProductCard::from)
        .collect();

    Ok(Json(ProductDetail {
        price_display: product.price_usd().display(),
        original_price_display: product.original_price.map(|p| Price::usd(p).display()),
        discount_percent: product.discount_percent().filter(|d| *d > 0),
        default_color: product.default_color().map(String::from),
        default_size: product.default_size().map(String::from),
        related,
        product: product.clone(),
    }))
}
