//! Core types for Plateful.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod geo;
pub mod id;
pub mod money;
pub mod status;

pub use geo::{Address, GeoPoint};
pub use id::*;
pub use money::Money;
pub use status::OrderStatus;
