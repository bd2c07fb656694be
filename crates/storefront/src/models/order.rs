//! Order types produced by checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freshco_core::{IdentityId, OrderId, OrderStatus, PaymentMethod, Price};

use super::CartLine;

/// Where and to whom an order is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub full_name: String,
    pub email: String,
    /// Ten-digit mobile number.
    pub phone: String,
    pub address: String,
    pub city: String,
    /// Six-digit postal code.
    pub pincode: String,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Identity that placed the order.
    pub identity_id: IdentityId,
    /// Cart lines at the time of checkout.
    pub lines: Vec<CartLine>,
    pub subtotal: Price,
    pub delivery_charge: Price,
    /// Amount due: subtotal plus delivery charge.
    pub total: Price,
    pub status: OrderStatus,
    /// Recorded only; no payment is processed.
    pub payment_method: PaymentMethod,
    pub shipping: ShippingDetails,
    pub created_at: DateTime<Utc>,
}
