//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. API token guard (`/admin/*` only, when `ADMIN_API_TOKEN` is set)

pub mod auth;

pub use auth::require_api_token;
