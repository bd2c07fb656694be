//! Freshco Core - Shared types library.
//!
//! This crate provides common types used across all Freshco components:
//! - `storefront` - Session and cart stores plus their collaborators
//! - `cli` - Command-line driver for the storefront flows
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no async
//! runtime. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, contact details, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
