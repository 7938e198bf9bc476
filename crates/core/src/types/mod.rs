//! Core types for the Pnoh storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod email;
pub mod id;
pub mod money;
pub mod order;

pub use catalog::{Category, CategoryParseError, SubCategory, Variant};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::{CurrencyCode, Price};
pub use order::OrderStatus;
