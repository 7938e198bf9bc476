//! Pnoh Core - Shared types library.
//!
//! This crate provides common types used across the Pnoh storefront
//! components:
//! - `storefront` - Public-facing jewelry shop service
//! - `integration-tests` - End-to-end test harness
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, product
//!   taxonomy, and order status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
