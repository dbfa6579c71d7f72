//! Business logic services for storefront.
//!
//! - `auth` - Customer sign-in through an external credential provider

pub mod auth;
