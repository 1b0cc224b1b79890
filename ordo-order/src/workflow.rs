use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use ordo_core::{
    cache_key_for_product, EventPublisher, Order, OrderReadCache, OrderStore, ProductInfoClient,
};

pub const DEFAULT_ORDER_CACHE_TTL: Duration = Duration::from_secs(60);

/// Places orders and serves the per-product order list.
///
/// The catalog and the store are the source of truth: their failures abort the
/// call. The cache and the publisher are best effort: their failures are logged
/// and otherwise ignored. Persisting an order and announcing it are two separate
/// steps with no shared transaction, so an order can exist without its event.
///
/// The stock check is advisory. Two concurrent orders for the same product can
/// both pass it before either is stored; reserving stock is the catalog's job.
pub struct OrderWorkflow {
    catalog: Arc<dyn ProductInfoClient>,
    store: Arc<dyn OrderStore>,
    cache: Arc<dyn OrderReadCache>,
    publisher: Arc<dyn EventPublisher>,
    cache_ttl: Duration,
}

impl OrderWorkflow {
    pub fn new(
        catalog: Arc<dyn ProductInfoClient>,
        store: Arc<dyn OrderStore>,
        cache: Arc<dyn OrderReadCache>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            catalog,
            store,
            cache,
            publisher,
            cache_ttl: DEFAULT_ORDER_CACHE_TTL,
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Validate stock with the catalog, store a new `PENDING` order and announce it
    pub async fn create_order(&self, product_id: &str, quantity: i32) -> Result<Order, OrderError> {
        if quantity <= 0 {
            return Err(OrderError::InvalidQuantity(quantity));
        }

        let product = self.catalog.fetch_product(product_id).await.map_err(|e| {
            error!("Error fetching product {}: {}", product_id, e);
            OrderError::ProductUnavailable
        })?;

        if !product.has_stock_for(quantity) {
            return Err(OrderError::InsufficientStock {
                requested: quantity,
                available: product.available_qty,
            });
        }

        let order = Order::new(product_id, product.unit_price, quantity);

        self.store.create_order(&order).await.map_err(|e| {
            error!("Failed to persist order {}: {}", order.id, e);
            OrderError::PersistenceFailure(e)
        })?;

        match self.publisher.publish_order_created(&order.product_id, order.quantity).await {
            Ok(()) => info!("Published order.created event for product {}", order.product_id),
            Err(e) => warn!("Failed to publish order.created event for order {}: {}", order.id, e),
        }

        Ok(order)
    }

    /// Cache-aside read of all orders for a product
    pub async fn list_orders_by_product(&self, product_id: &str) -> Result<Vec<Order>, OrderError> {
        let key = cache_key_for_product(product_id);

        match self.cache.get_orders(&key).await {
            Ok(Some(orders)) => {
                debug!("Returning {} cached orders for {}", orders.len(), key);
                return Ok(orders);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache error on get {}: {}", key, e),
        }

        debug!("Fetching orders for product {} from store", product_id);
        let orders = self
            .store
            .list_orders_by_product(product_id)
            .await
            .map_err(OrderError::PersistenceFailure)?;

        if let Err(e) = self.cache.set_orders(&key, &orders, self.cache_ttl).await {
            warn!("Cache error on set {}: {}", key, e);
        }

        Ok(orders)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(i32),

    #[error("product not found or service unavailable")]
    ProductUnavailable,

    #[error("insufficient stock")]
    InsufficientStock {
        requested: i32,
        available: i32,
    },

    #[error("Order persistence failed: {0}")]
    PersistenceFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
}
