//! Catalog search handler.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::products::ProductCard;
use crate::error::AppQuery;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// `GET /search` response.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<ProductCard>,
}

/// Search the catalog by name, category, and description.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchQuery>,
) -> Json<SearchResponse> {
    let results: Vec<ProductCard> = state
        .catalog()
        .search(&params.q)
        .into_iter()
        .map(ProductCard::from)
        .collect();

    Json(SearchResponse {
        query: params.q.trim().to_string(),
        count: results.len(),
        results,
    })
}
