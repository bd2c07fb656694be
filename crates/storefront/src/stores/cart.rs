//! Cart store: the lines the current session intends to buy.

use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::watch;

use freshco_core::{CurrencyCode, Price, ProductId};

use crate::config::CartConfig;
use crate::models::{CartLine, CartSnapshot, Product};

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product is priced in a different currency than the cart.
    #[error("product {product_id} is priced in {found}, cart uses {expected}")]
    CurrencyMismatch {
        product_id: ProductId,
        expected: CurrencyCode,
        found: CurrencyCode,
    },
}

/// Cart store.
///
/// Lines are kept in the order products were first added, one line per
/// product, each with a quantity of at least one. Setting a quantity to zero
/// removes the line. Every mutation that changes the cart publishes one
/// [`CartSnapshot`] to subscribers; no-ops publish nothing.
#[derive(Debug)]
pub struct CartStore {
    config: CartConfig,
    lines: Vec<CartLine>,
    tx: watch::Sender<CartSnapshot>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new(config: CartConfig) -> Self {
        let empty = Self::compute_snapshot(&config, &[]);
        let (tx, _) = watch::channel(empty);
        Self {
            config,
            lines: Vec::new(),
            tx,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of a product, merging with an existing line.
    ///
    /// Adding zero units does nothing.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CurrencyMismatch` if the product is not priced in
    /// the cart currency. The cart is unchanged.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if product.unit_price.currency_code != self.config.currency {
            return Err(CartError::CurrencyMismatch {
                product_id: product.id.clone(),
                expected: self.config.currency,
                found: product.unit_price.currency_code,
            });
        }
        if quantity == 0 {
            return Ok(());
        }

        match self.position(&product.id) {
            Some(i) => {
                if let Some(line) = self.lines.get_mut(i) {
                    line.quantity = line.quantity.saturating_add(quantity);
                }
            }
            None => self.lines.push(CartLine::from_product(product, quantity)),
        }

        tracing::debug!(product_id = %product.id, quantity, "Added to cart");
        self.publish();
        Ok(())
    }

    /// Set a line's quantity. Negative values clamp to zero; zero removes the
    /// line. Unknown products are ignored.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }

        let Some(line) = self.lines.iter_mut().find(|l| &l.product_id == product_id) else {
            return;
        };
        if line.quantity == quantity {
            return;
        }
        line.quantity = quantity;

        tracing::debug!(product_id = %product_id, quantity, "Cart quantity set");
        self.publish();
    }

    /// Add one unit to an existing line. Returns `false` if the product is
    /// not in the cart.
    pub fn increment(&mut self, product_id: &ProductId) -> bool {
        match self.get_line(product_id).map(|l| l.quantity) {
            Some(current) => {
                self.update_quantity(product_id, i64::from(current) + 1);
                true
            }
            None => false,
        }
    }

    /// Remove one unit from an existing line, dropping the line at zero.
    /// Returns `false` if the product is not in the cart.
    pub fn decrement(&mut self, product_id: &ProductId) -> bool {
        match self.get_line(product_id).map(|l| l.quantity) {
            Some(current) => {
                self.update_quantity(product_id, i64::from(current) - 1);
                true
            }
            None => false,
        }
    }

    /// Remove a line if present.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        let Some(i) = self.position(product_id) else {
            return;
        };
        self.lines.remove(i);

        tracing::debug!(product_id = %product_id, "Removed from cart");
        self.publish();
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        self.lines.clear();

        tracing::debug!("Cart cleared");
        self.publish();
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    /// Sum of quantities.
    #[must_use]
    pub fn get_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Sum of line totals.
    #[must_use]
    pub fn get_subtotal(&self) -> Price {
        subtotal_of(self.config.currency, &self.lines)
    }

    /// Subtotal plus the delivery charge, which applies only when the
    /// subtotal is positive.
    #[must_use]
    pub fn grand_total(&self) -> Price {
        self.snapshot().grand_total
    }

    /// The current derived view.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        Self::compute_snapshot(&self.config, &self.lines)
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for a product, if any.
    #[must_use]
    pub fn get_line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Receive a snapshot after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.tx.subscribe()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.lines.iter().position(|l| &l.product_id == product_id)
    }

    fn publish(&self) {
        self.tx.send_replace(self.snapshot());
    }

    fn compute_snapshot(config: &CartConfig, lines: &[CartLine]) -> CartSnapshot {
        let subtotal = subtotal_of(config.currency, lines);
        let delivery_charge = if subtotal.amount > Decimal::ZERO {
            config.delivery_price()
        } else {
            Price::zero(config.currency)
        };
        CartSnapshot {
            lines: lines.to_vec(),
            count: lines
                .iter()
                .fold(0u32, |acc, l| acc.saturating_add(l.quantity)),
            subtotal,
            delivery_charge,
            grand_total: Price::new(
                subtotal.amount.saturating_add(delivery_charge.amount),
                config.currency,
            ),
        }
    }
}

fn subtotal_of(currency: CurrencyCode, lines: &[CartLine]) -> Price {
    let amount = lines
        .iter()
        .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.total().amount));
    Price::new(amount, currency)
}
