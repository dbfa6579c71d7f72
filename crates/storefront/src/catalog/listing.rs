//! Filter, sort, and paginate the product listing.
//!
//! The listing is recomputed from the full product list on every request:
//!
//! ```text
//! products ──filter(category, price)──► sort(order) ──page(n, 9)──► Listing
//! ```
//!
//! Selections are independent. Changing a filter does not move the current
//! page, so a shopper on page 2 who narrows to a small category gets an empty
//! page; the `has_prev`/`has_next` flags are the only bounds the UI enforces.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::Product;

/// Products per page on the listing grid.
pub const PAGE_SIZE: usize = 9;

/// Sentinel id that disables the category and price filters.
pub const ALL: &str = "all";

// =============================================================================
// Category
// =============================================================================

/// Category selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    /// Pass every product through.
    #[default]
    All,
    /// Keep products whose category equals this one, ignoring case.
    Only(String),
}

impl CategoryFilter {
    /// Whether `product` passes this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => product.category.to_lowercase() == category.to_lowercase(),
        }
    }

    /// The selection id as it appears in query strings.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Only(category) => category,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(id: String) -> Self {
        if id == ALL { Self::All } else { Self::Only(id) }
    }
}

impl From<&str> for CategoryFilter {
    fn from(id: &str) -> Self {
        Self::from(id.to_string())
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => ALL.to_string(),
            CategoryFilter::Only(category) => category,
        }
    }
}

// =============================================================================
// Price buckets
// =============================================================================

/// Fixed, non-overlapping price buckets.
///
/// Lower bounds are inclusive and upper bounds exclusive, so a product priced
/// exactly 100.00 lands in `100-200`, never in `0-100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PriceRange {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "0-100")]
    Under100,
    #[serde(rename = "100-200")]
    From100To200,
    #[serde(rename = "200-300")]
    From200To300,
    #[serde(rename = "300+", alias = "300 ")]
    Over300,
}

impl PriceRange {
    /// Every selectable range, in display order.
    pub const OPTIONS: [Self; 5] = [
        Self::All,
        Self::Under100,
        Self::From100To200,
        Self::From200To300,
        Self::Over300,
    ];

    /// `[lower, upper)` bounds in dollars; `None` means unbounded.
    #[must_use]
    pub const fn bounds(self) -> (Option<Decimal>, Option<Decimal>) {
        match self {
            Self::All => (None, None),
            Self::Under100 => (None, Some(Decimal::ONE_HUNDRED)),
            Self::From100To200 => (Some(Decimal::ONE_HUNDRED), Some(Decimal::from_parts(200, 0, 0, false, 0))),
            Self::From200To300 => (
                Some(Decimal::from_parts(200, 0, 0, false, 0)),
                Some(Decimal::from_parts(300, 0, 0, false, 0)),
            ),
            Self::Over300 => (Some(Decimal::from_parts(300, 0, 0, false, 0)), None),
        }
    }

    /// Whether `price` falls inside this bucket.
    #[must_use]
    pub fn contains(self, price: Decimal) -> bool {
        let (lower, upper) = self.bounds();
        lower.is_none_or(|lo| price >= lo) && upper.is_none_or(|hi| price < hi)
    }

    /// Query-string id.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::All => ALL,
            Self::Under100 => "0-100",
            Self::From100To200 => "100-200",
            Self::From200To300 => "200-300",
            Self::Over300 => "300+",
        }
    }

    /// Label shown in the filter sidebar.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Prices",
            Self::Under100 => "Under $100",
            Self::From100To200 => "$100 - $200",
            Self::From200To300 => "$200 - $300",
            Self::Over300 => "Over $300",
        }
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Catalog order, untouched.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortOrder {
    /// Every selectable order, in display order.
    pub const OPTIONS: [Self; 5] = [
        Self::Newest,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::NameAsc,
        Self::NameDesc,
    ];

    /// Query-string id.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
        }
    }

    /// Label shown in the sort dropdown.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::NameAsc => "Name: A to Z",
            Self::NameDesc => "Name: Z to A",
        }
    }

    /// Compare two products under this order.
    ///
    /// `Newest` reports every pair as equal so the stable sort leaves input
    /// order alone.
    #[must_use]
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Newest => Ordering::Equal,
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            Self::NameAsc => compare_names(&a.name, &b.name),
            Self::NameDesc => compare_names(&b.name, &a.name),
        }
    }

    /// Stable in-place sort.
    pub fn apply(self, products: &mut [&Product]) {
        if self != Self::Newest {
            products.sort_by(|a, b| self.compare(a, b));
        }
    }
}

/// Dictionary-style name comparison.
///
/// Case-folded first so "evening clutch" sits next to "Evening Clutch", then
/// byte order breaks ties. Distinct names never compare equal, which keeps
/// ascending and descending exact mirrors of each other.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// =============================================================================
// Query & pipeline
// =============================================================================

/// The shopper's current listing selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    pub category: CategoryFilter,
    pub price: PriceRange,
    pub sort: SortOrder,
    /// 1-based page number. Never clamped.
    pub page: u32,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            price: PriceRange::All,
            sort: SortOrder::Newest,
            page: 1,
        }
    }
}

impl ListingQuery {
    /// Select a category. The page is left where it was.
    pub fn select_category(&mut self, category: impl Into<CategoryFilter>) {
        self.category = category.into();
    }

    /// Select a price bucket. The page is left where it was.
    pub const fn select_price_range(&mut self, price: PriceRange) {
        self.price = price;
    }

    pub const fn select_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    pub const fn go_to_page(&mut self, page: u32) {
        self.page = page;
    }

    /// Reset category and price to "all". Sort and page are kept.
    pub fn clear_filters(&mut self) {
        self.category = CategoryFilter::All;
        self.price = PriceRange::All;
    }

    /// Whether a filter other than "all" is selected (shows "Clear Filters").
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.category != CategoryFilter::All || self.price != PriceRange::All
    }

    /// Whether `product` passes both filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.category.matches(product) && self.price.contains(product.price)
    }
}

/// One rendered page of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<'a> {
    /// Products on the requested page.
    pub products: Vec<&'a Product>,
    /// Size of the unfiltered catalog.
    pub total_count: usize,
    /// Products passing the filters, across all pages.
    pub filtered_count: usize,
    pub page: u32,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Run the filter → sort → paginate pipeline with the grid page size.
#[must_use]
pub fn build_listing<'a>(products: &'a [Product], query: &ListingQuery) -> Listing<'a> {
    build_listing_with_page_size(products, query, PAGE_SIZE)
}

/// Run the pipeline with an explicit page size.
#[must_use]
pub fn build_listing_with_page_size<'a>(
    products: &'a [Product],
    query: &ListingQuery,
    page_size: usize,
) -> Listing<'a> {
    let mut filtered: Vec<&Product> = products.iter().filter(|p| query.matches(p)).collect();
    query.sort.apply(&mut filtered);

    let total_pages = page_count(filtered.len(), page_size);
    let visible = page_slice(&filtered, query.page, page_size).to_vec();
    let current = usize::try_from(query.page).unwrap_or(usize::MAX);

    Listing {
        products: visible,
        total_count: products.len(),
        filtered_count: filtered.len(),
        page: query.page,
        total_pages,
        has_prev: query.page > 1,
        has_next: current < total_pages,
    }
}

/// `ceil(total / page_size)`; zero items means zero pages.
#[must_use]
pub const fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Items on 1-based `page`. Page 0 and pages past the end are empty.
#[must_use]
pub fn page_slice<T>(items: &[T], page: u32, page_size: usize) -> &[T] {
    let Some(index) = usize::try_from(page).ok().and_then(|p| p.checked_sub(1)) else {
        return &[];
    };
    let Some(start) = index.checked_mul(page_size) else {
        return &[];
    };
    let end = start.saturating_add(page_size).min(items.len());
    items.get(start..end).unwrap_or(&[])
}
