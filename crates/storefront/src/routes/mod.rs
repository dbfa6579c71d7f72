//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! GET    /shop                       - Filtered, sorted, paginated listing
//! GET    /product/{slug}             - Product detail + related products
//! GET    /search?q=                  - Catalog search
//!
//! # Cart (session)
//! GET    /cart                       - Lines and totals
//! POST   /cart/add                   - Add a product variant
//! POST   /cart/lines/{id}/increase   - Quantity + 1
//! POST   /cart/lines/{id}/decrease   - Quantity - 1, floored at 1
//! DELETE /cart/lines/{id}            - Remove line
//! DELETE /cart                       - Clear cart
//!
//! # Auth
//! POST   /auth/login                 - Sign in via the credential provider
//! POST   /auth/logout                - Sign out
//! GET    /account                    - Signed-in customer (401 otherwise)
//! ```

pub mod auth;
pub mod cart;
pub mod products;
pub mod search;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/add", post(cart::add))
        .route("/lines/{id}/increase", post(cart::increase))
        .route("/lines/{id}/decrease", post(cart::decrease))
        .route("/lines/{id}", delete(cart::remove))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the main routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shop", get(products::shop))
        .route("/product/{slug}", get(products::show))
        .route("/search", get(search::search))
        .route("/account", get(auth::account))
        .nest("/cart", cart_routes())
        .nest("/auth", auth_routes())
}
