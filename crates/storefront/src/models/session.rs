//! Session-related types.
//!
//! The role profile lives server-side in the session rather than in
//! client-local storage; handlers receive it through the extractors in
//! [`crate::middleware`]. The customer's cart lives in the session too.

use serde::{Deserialize, Serialize};

use plateful_core::{Address, PartnerId, UserId};

/// Session-stored customer identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    /// Customer's backend user ID.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Default delivery address, editable before submission.
    #[serde(default)]
    pub address: Option<Address>,
}

/// Session-stored delivery partner identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerProfile {
    /// Partner's backend ID.
    pub partner_id: PartnerId,
    /// Display name.
    pub name: String,
}

/// Session keys.
pub mod keys {
    /// Key for the current customer profile.
    pub const CUSTOMER_PROFILE: &str = "customer_profile";

    /// Key for the current delivery partner profile.
    pub const PARTNER_PROFILE: &str = "partner_profile";

    /// Key for the customer's cart.
    pub const CART: &str = "cart";

    /// Key for the restaurant the cart was filled from.
    pub const CART_RESTAURANT: &str = "cart_restaurant";
}
