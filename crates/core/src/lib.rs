//! KULTR Core - Shared types library.
//!
//! This crate provides common types used across all KULTR components:
//! - `storefront` - Catalog, cart, and sign-in for shoppers
//! - `admin` - User management API backed by `PostgreSQL`
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. Database encoding for the newtypes is opt-in via the `postgres`
//! feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, and email addresses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
