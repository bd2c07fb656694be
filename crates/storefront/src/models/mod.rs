//! Domain models for the storefront.
//!
//! These types represent validated domain objects. Storage records that carry
//! credentials (`IdentityRecord`, `PendingRegistration`) never leave the
//! repository and auth service layers; everything handed to presentation code
//! is credential-free.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{CartLine, CartSnapshot};
pub use order::{Order, ShippingDetails};
pub use product::Product;
pub use user::{Identity, IdentityRecord, OneTimeCode, PendingRegistration};
