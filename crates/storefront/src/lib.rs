//! Freshco storefront library.
//!
//! The session/identity store and the cart store, together with the
//! collaborators they depend on: repositories, a code delivery channel, the
//! product catalog and checkout.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod stores;
