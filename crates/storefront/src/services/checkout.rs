//! Checkout: turns the cart into a recorded order.

use std::sync::Arc;

use thiserror::Error;

use freshco_core::{Email, IdentityId, OrderId, OrderStatus, PaymentMethod};

use crate::clock::Clock;
use crate::db::{OrderRepository, RepositoryError};
use crate::models::{Identity, Order, ShippingDetails};
use crate::stores::CartStore;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout requires a signed-in identity.
    #[error("sign in to place an order")]
    NotSignedIn,

    #[error("cart is empty")]
    EmptyCart,

    /// A shipping field is missing or malformed.
    #[error("invalid {field}: {reason}")]
    InvalidDetails {
        field: &'static str,
        reason: &'static str,
    },

    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Places orders and lists order history.
pub struct CheckoutService<O> {
    orders: Arc<O>,
    clock: Arc<dyn Clock>,
}

impl<O: OrderRepository> CheckoutService<O> {
    #[must_use]
    pub fn new(orders: Arc<O>, clock: Arc<dyn Clock>) -> Self {
        Self { orders, clock }
    }

    /// Place an order for everything in the cart, then empty the cart.
    ///
    /// No payment is taken; `payment_method` is recorded on the order.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotSignedIn` without a session,
    /// `CheckoutError::EmptyCart` for an empty cart, and
    /// `CheckoutError::InvalidDetails` for bad shipping details. In every
    /// error case the cart is left as it was.
    pub async fn place_order(
        &self,
        session: Option<&Identity>,
        cart: &mut CartStore,
        details: ShippingDetails,
        payment_method: PaymentMethod,
    ) -> Result<Order, CheckoutError> {
        let identity = session.ok_or(CheckoutError::NotSignedIn)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let shipping = validate_shipping(details)?;

        let snapshot = cart.snapshot();
        let order = Order {
            id: OrderId::new(uuid::Uuid::new_v4().to_string()),
            identity_id: identity.id.clone(),
            lines: snapshot.lines,
            subtotal: snapshot.subtotal,
            delivery_charge: snapshot.delivery_charge,
            total: snapshot.grand_total,
            status: OrderStatus::Confirmed,
            payment_method,
            shipping,
            created_at: self.clock.now(),
        };

        self.orders.insert(order.clone()).await?;
        cart.clear();

        tracing::info!(
            order_id = %order.id,
            identity_id = %identity.id,
            total = %order.total,
            %payment_method,
            "Order placed"
        );
        Ok(order)
    }

    /// Orders placed by an identity, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the orders cannot be read.
    pub async fn orders_for(&self, identity_id: &IdentityId) -> Result<Vec<Order>, CheckoutError> {
        Ok(self.orders.list_for(identity_id).await?)
    }
}

/// Validate shipping details, returning them trimmed.
///
/// # Errors
///
/// Returns `CheckoutError::InvalidDetails` naming the first bad field.
pub fn validate_shipping(details: ShippingDetails) -> Result<ShippingDetails, CheckoutError> {
    let required = |field: &'static str, value: &str| {
        let value = value.trim();
        if value.is_empty() {
            Err(CheckoutError::InvalidDetails {
                field,
                reason: "is required",
            })
        } else {
            Ok(value.to_owned())
        }
    };
    let digits = |field: &'static str, value: &str, len: usize, reason: &'static str| {
        let value = value.trim();
        if value.len() == len && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(value.to_owned())
        } else {
            Err(CheckoutError::InvalidDetails { field, reason })
        }
    };

    let full_name = required("full name", &details.full_name)?;
    let email = Email::parse(&details.email).map_err(|_| CheckoutError::InvalidDetails {
        field: "email",
        reason: "is not a valid email address",
    })?;
    let phone = digits("phone", &details.phone, 10, "must be 10 digits")?;
    let address = required("address", &details.address)?;
    let city = required("city", &details.city)?;
    let pincode = digits("pincode", &details.pincode, 6, "must be 6 digits")?;

    Ok(ShippingDetails {
        full_name,
        email: email.into_inner(),
        phone,
        address,
        city,
        pincode,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeDelta;
    use rust_decimal::Decimal;

    use freshco_core::{Email, IdentityId, OrderStatus, PaymentMethod, ProductId};

    use super::{CheckoutError, CheckoutService, validate_shipping};
    use crate::clock::ManualClock;
    use crate::config::CartConfig;
    use crate::db::{InMemoryOrderRepository, InMemoryProductRepository, ProductRepository};
    use crate::models::{Identity, ShippingDetails};
    use crate::stores::CartStore;

    fn details() -> ShippingDetails {
        ShippingDetails {
            full_name: " Jane Doe ".to_string(),
            email: "Jane@X.com".to_string(),
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            pincode: "560001".to_string(),
        }
    }

    fn jane() -> Identity {
        Identity {
            id: IdentityId::new("jane-1"),
            name: "Jane Doe".to_string(),
            email: Email::parse("jane@x.com").unwrap(),
            mobile: None,
            verified: true,
        }
    }

    async fn cart_with_rice() -> CartStore {
        let products = InMemoryProductRepository::seeded();
        let rice = products.get_product(&ProductId::new("1")).await.unwrap().unwrap();
        let mut cart = CartStore::new(CartConfig::default());
        cart.add_item(&rice, 2).unwrap();
        cart
    }

    fn service(clock: &ManualClock) -> CheckoutService<InMemoryOrderRepository> {
        CheckoutService::new(
            Arc::new(InMemoryOrderRepository::new()),
            Arc::new(clock.clone()),
        )
    }

    #[tokio::test]
    async fn test_place_order_records_and_clears_cart() {
        let clock = ManualClock::default();
        let checkout = service(&clock);
        let mut cart = cart_with_rice().await;

        let order = checkout
            .place_order(Some(&jane()), &mut cart, details(), PaymentMethod::Upi)
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.subtotal.amount, Decimal::from(598));
        assert_eq!(order.total.amount, Decimal::from(648));
        assert_eq!(order.shipping.full_name, "Jane Doe");
        assert_eq!(order.shipping.email, "jane@x.com");
        assert!(cart.is_empty());

        let history = checkout.orders_for(&jane().id).await.unwrap();
        assert_eq!(history, vec![order]);
    }

    #[tokio::test]
    async fn test_place_order_requires_session_and_items() {
        let clock = ManualClock::default();
        let checkout = service(&clock);

        let mut cart = cart_with_rice().await;
        let err = checkout
            .place_order(None, &mut cart, details(), PaymentMethod::Cod)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::NotSignedIn));
        assert_eq!(cart.get_count(), 2);

        let mut empty = CartStore::new(CartConfig::default());
        let err = checkout
            .place_order(Some(&jane()), &mut empty, details(), PaymentMethod::Cod)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn test_invalid_details_leave_cart() {
        let clock = ManualClock::default();
        let checkout = service(&clock);
        let mut cart = cart_with_rice().await;

        let bad = ShippingDetails {
            pincode: "5600".to_string(),
            ..details()
        };
        let err = checkout
            .place_order(Some(&jane()), &mut cart, bad, PaymentMethod::Cod)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InvalidDetails { field: "pincode", .. }
        ));
        assert_eq!(cart.get_count(), 2);
    }

    #[test]
    fn test_validate_shipping_fields() {
        assert!(validate_shipping(details()).is_ok());

        let cases = [
            ShippingDetails { full_name: "  ".into(), ..details() },
            ShippingDetails { email: "jane".into(), ..details() },
            ShippingDetails { phone: "98765-4321".into(), ..details() },
            ShippingDetails { address: String::new(), ..details() },
            ShippingDetails { city: String::new(), ..details() },
            ShippingDetails { pincode: "56000a".into(), ..details() },
        ];
        for case in cases {
            assert!(validate_shipping(case).is_err());
        }
    }

    #[tokio::test]
    async fn test_orders_newest_first() {
        let clock = ManualClock::default();
        let checkout = service(&clock);

        let mut cart = cart_with_rice().await;
        let first = checkout
            .place_order(Some(&jane()), &mut cart, details(), PaymentMethod::Cod)
            .await
            .unwrap();

        clock.advance(TimeDelta::hours(1));
        let mut cart = cart_with_rice().await;
        let second = checkout
            .place_order(Some(&jane()), &mut cart, details(), PaymentMethod::Card)
            .await
            .unwrap();

        let ids: Vec<_> = checkout
            .orders_for(&jane().id)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);

        let other = checkout
            .orders_for(&IdentityId::new("someone-else"))
            .await
            .unwrap();
        assert!(other.is_empty());
    }
}
