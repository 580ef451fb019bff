//! Plateful Core - Shared types library.
//!
//! This crate provides common types used across all Plateful components:
//! - `storefront` - Customer- and partner-facing storefront service
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, statuses, and
//!   geographic data
//! - [`cart`] - The order cart and its price aggregation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartEntry, DiscountRule, MenuItem, NoPromotion, Totals};
pub use types::*;
