//! Types stored in the shopper's session.

use serde::{Deserialize, Serialize};

use kultr_core::Email;

/// Signed-in customer identity, as returned by the credential provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentCustomer {
    /// Provider-assigned customer id.
    pub id: String,
    pub email: Email,
}

/// Session keys.
pub mod keys {
    /// The shopper's [`Cart`](crate::cart::Cart).
    pub const CART: &str = "cart";

    /// The signed-in [`CurrentCustomer`](super::CurrentCustomer).
    pub const CURRENT_CUSTOMER: &str = "current_customer";
}
