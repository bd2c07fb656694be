//! Order repository.

use std::sync::RwLock;

use freshco_core::IdentityId;

use super::RepositoryError;
use crate::models::Order;

/// Repository for placed orders.
#[trait_variant::make(OrderRepository: Send)]
pub trait LocalOrderRepository {
    /// Record a placed order.
    async fn insert(&self, order: Order) -> Result<(), RepositoryError>;

    /// All orders placed by an identity, newest first.
    async fn list_for(&self, identity_id: &IdentityId) -> Result<Vec<Order>, RepositoryError>;
}

/// In-memory order repository.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: Order) -> Result<(), RepositoryError> {
        let mut orders = self.orders.write()?;
        if orders.iter().any(|existing| existing.id == order.id) {
            return Err(RepositoryError::Conflict(format!(
                "order {} already exists",
                order.id
            )));
        }
        orders.push(order);
        Ok(())
    }

    async fn list_for(&self, identity_id: &IdentityId) -> Result<Vec<Order>, RepositoryError> {
        let mut orders: Vec<Order> = self
            .orders
            .read()?
            .iter()
            .filter(|order| &order.identity_id == identity_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}
