//! Cart line and snapshot types.

use serde::{Deserialize, Serialize};

use freshco_core::{Price, ProductId};

use super::Product;

/// One product's accumulated quantity in the cart.
///
/// Lines in a cart always have `quantity >= 1`; a quantity of zero means the
/// line is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID (unique within a cart).
    pub product_id: ProductId,
    /// Display name at the time the product was added.
    pub name: String,
    /// Unit price at the time the product was added.
    pub unit_price: Price,
    /// Image URL or asset reference.
    pub image_ref: String,
    /// Number of units.
    pub quantity: u32,
}

impl CartLine {
    /// Create a line for `product` with the given quantity.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
            image_ref: product.image_ref.clone(),
            quantity,
        }
    }

    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Derived view of the cart, published to subscribers after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Current lines, in the order they were first added.
    pub lines: Vec<CartLine>,
    /// Sum of quantities.
    pub count: u32,
    /// Sum of line totals.
    pub subtotal: Price,
    /// Delivery charge applied (zero for an empty cart).
    pub delivery_charge: Price,
    /// Subtotal plus delivery charge.
    pub grand_total: Price,
}

impl CartSnapshot {
    /// Whether the cart has no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
