//! storecart Core - Shared cart domain types.
//!
//! This crate provides the types used across all storecart components:
//! - `storefront` - Cart widget engine (state, persistence, rendering)
//! - `cli` - Terminal front-end driving the widget
//!
//! # Architecture
//!
//! The core crate contains only types and their invariants - no I/O, no
//! storage access, no rendering. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, quantities and line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
