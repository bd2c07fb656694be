//! State containers consumed by presentation code.
//!
//! - [`session`] - The signed-in identity and the auth flows that change it
//! - [`cart`] - Lines the current session intends to buy
//!
//! Both publish their state through `tokio::sync::watch` so any number of
//! readers can follow changes without polling.

pub mod cart;
pub mod session;

pub use cart::{CartError, CartStore};
pub use session::{SESSION_KEY, SessionStore};
