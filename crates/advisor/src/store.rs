//! Record store abstraction for fetching business records.
//!
//! The advisor never talks to a database directly - it reads products,
//! orders, and customers through the [`RecordStore`] trait, scoped to a
//! single shop. Persistence is an external collaborator's concern; the only
//! implementation bundled here is [`InMemoryStore`], used by the demo CLI
//! and the test suites.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use bazarify_core::{Customer, Order, Product, ShopId};

/// Errors that can occur when reading from a record store.
///
/// The context builder swallows these (falling back to an empty context),
/// so the variants only need to carry enough detail for logs.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or rejected the query.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// The store returned data that could not be decoded into records.
    #[error("malformed records: {0}")]
    Malformed(String),
}

/// Read-only access to the business records of a shop.
pub trait RecordStore: Send + Sync {
    /// Fetch all products for the shop.
    fn products(
        &self,
        shop_id: ShopId,
    ) -> impl Future<Output = Result<Vec<Product>, StoreError>> + Send;

    /// Fetch all orders for the shop.
    fn orders(&self, shop_id: ShopId)
    -> impl Future<Output = Result<Vec<Order>, StoreError>> + Send;

    /// Fetch all customers for the shop.
    fn customers(
        &self,
        shop_id: ShopId,
    ) -> impl Future<Output = Result<Vec<Customer>, StoreError>> + Send;
}

/// In-memory record store keyed by shop.
///
/// Immutable after construction, so it is cheaply cloneable and safe to
/// share across concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

#[derive(Debug, Default)]
struct InMemoryStoreInner {
    products: HashMap<ShopId, Vec<Product>>,
    orders: HashMap<ShopId, Vec<Order>>,
    customers: HashMap<ShopId, Vec<Customer>>,
}

impl InMemoryStore {
    /// Create a store holding the given records for a single shop.
    #[must_use]
    pub fn for_shop(
        shop_id: ShopId,
        products: Vec<Product>,
        orders: Vec<Order>,
        customers: Vec<Customer>,
    ) -> Self {
        Self {
            inner: Arc::new(InMemoryStoreInner {
                products: HashMap::from([(shop_id, products)]),
                orders: HashMap::from([(shop_id, orders)]),
                customers: HashMap::from([(shop_id, customers)]),
            }),
        }
    }
}

impl RecordStore for InMemoryStore {
    async fn products(&self, shop_id: ShopId) -> Result<Vec<Product>, StoreError> {
        Ok(self.inner.products.get(&shop_id).cloned().unwrap_or_default())
    }

    async fn orders(&self, shop_id: ShopId) -> Result<Vec<Order>, StoreError> {
        Ok(self.inner.orders.get(&shop_id).cloned().unwrap_or_default())
    }

    async fn customers(&self, shop_id: ShopId) -> Result<Vec<Customer>, StoreError> {
        Ok(self.inner.customers.get(&shop_id).cloned().unwrap_or_default())
    }
}
