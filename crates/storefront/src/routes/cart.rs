//! Cart route handlers.
//!
//! The cart is stored in the session under [`session_keys::CART`]. Each
//! mutation loads it, applies one operation, writes it back, and returns the
//! full cart view so the client can re-render lines and totals in one go.
//!
//! [`session_keys::CART`]: crate::models::session_keys::CART

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use kultr_core::{Price, ProductId};

use crate::cart::{Cart, CartLine, CartTotals};
use crate::error::{AppError, AppJson, Result};
use crate::middleware::{load_cart, save_cart};
use crate::state::AppState;

/// A cart line with its derived total.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub line: CartLine,
    pub line_total: Decimal,
    pub line_total_display: String,
}

/// `GET /cart` and mutation response.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    #[serde(flatten)]
    pub totals: CartTotals,
    pub subtotal_display: String,
    pub shipping_display: String,
    pub total_display: String,
}

impl CartView {
    fn new(cart: &Cart, state: &AppState) -> Self {
        let totals = cart.totals(state.shipping());
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| CartLineView {
                    line_total: line.line_total(),
                    line_total_display: Price::usd(line.line_total()).display(),
                    line: line.clone(),
                })
                .collect(),
            subtotal_display: Price::usd(totals.subtotal).display(),
            shipping_display: Price::usd(totals.shipping).display(),
            total_display: Price::usd(totals.total).display(),
            totals,
        }
    }
}

/// `POST /cart/add` body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Show the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::new(&cart, &state)))
}

/// Add a product variant.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    AppJson(input): AppJson<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .find_by_id(input.product_id)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let mut cart = load_cart(&session).await?;
    let line = cart.add(
        product,
        input.quantity.unwrap_or(1),
        input.size.as_deref(),
        input.color.as_deref(),
    )?;
    tracing::info!(line_id = %line.id, quantity = line.quantity, "Added to cart");

    save_cart(&session, &cart).await?;
    Ok(Json(CartView::new(&cart, &state)))
}

/// Increment a line's quantity.
#[instrument(skip(state, session))]
pub async fn increase(
    State(state): State<AppState>,
    session: Session,
    Path(line_id): Path<String>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.increase(&line_id)?;
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::new(&cart, &state)))
}

/// Decrement a line's quantity, stopping at one.
#[instrument(skip(state, session))]
pub async fn decrease(
    State(state): State<AppState>,
    session: Session,
    Path(line_id): Path<String>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.decrease(&line_id)?;
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::new(&cart, &state)))
}

/// Remove a line.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(line_id): Path<String>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.remove(&line_id)?;
    save_cart(&session, &cart).await?;
    tracing::info!(line_id = %line_id, "Removed from cart");
    Ok(Json(CartView::new(&cart, &state)))
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::new(&cart, &state)))
}
