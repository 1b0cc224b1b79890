//! Process-local stand-ins for the Postgres store, the Redis cache and the
//! Kafka publisher.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use async_trait::async_trait;
use tokio::sync::RwLock;
use ordo_core::{EventPublisher, Order, OrderCreatedEvent, OrderReadCache, OrderStore};

/// Orders kept in insertion order
#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create_order(
        &self,
        order: &Order,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut orders = self.orders.write().await;
        if orders.iter().any(|o| o.id == order.id) {
            return Err(format!("Duplicate order id: {}", order.id).into());
        }
        orders.push(order.clone());
        Ok(())
    }

    async fn list_orders_by_product(
        &self,
        product_id: &str,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().filter(|o| o.product_id == product_id).cloned().collect())
    }
}

struct CacheEntry {
    orders: Vec<Order>,
    expires_at: Instant,
}

/// Expiring key/value cache with the same miss semantics as Redis `GET`
#[derive(Default)]
pub struct InMemoryOrderCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryOrderCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderReadCache for InMemoryOrderCache {
    async fn get_orders(
        &self,
        key: &str,
    ) -> Result<Option<Vec<Order>>, Box<dyn std::error::Error + Send + Sync>> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.orders.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_orders(
        &self,
        key: &str,
        orders: &[Order],
        ttl: Duration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let entry = CacheEntry {
            orders: orders.to_vec(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }
}

/// Records every event instead of sending it
#[derive(Default)]
pub struct InMemoryEventPublisher {
    published: RwLock<Vec<OrderCreatedEvent>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn published(&self) -> Vec<OrderCreatedEvent> {
        self.published.read().await.clone()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish_order_created(
        &self,
        product_id: &str,
        quantity: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.published.write().await.push(OrderCreatedEvent::new(product_id, quantity));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_round_trip_preserves_order() {
        let cache = InMemoryOrderCache::new();
        let orders = vec![
            Order::new("p-1", 1.0, 1),
            Order::new("p-1", 2.0, 2),
            Order::new("p-1", 3.0, 3),
        ];

        cache.set_orders("orders:product:p-1", &orders, Duration::from_secs(60)).await.unwrap();
        let cached = cache.get_orders("orders:product:p-1").await.unwrap();

        assert_eq!(cached, Some(orders));
    }

    #[tokio::test]
    async fn test_cache_entry_expires() {
        let cache = InMemoryOrderCache::new();
        let orders = vec![Order::new("p-1", 1.0, 1)];

        cache.set_orders("k", &orders, Duration::from_millis(50)).await.unwrap();
        assert!(cache.get_orders("k").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(cache.get_orders("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cached_empty_list_differs_from_miss() {
        let cache = InMemoryOrderCache::new();
        cache.set_orders("empty", &[], Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get_orders("empty").await.unwrap(), Some(vec![]));
        assert_eq!(cache.get_orders("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_filters_by_product_in_arrival_order() {
        let store = InMemoryOrderStore::new();
        let first = Order::new("p-1", 1.0, 1);
        let other = Order::new("p-2", 1.0, 1);
        let second = Order::new("p-1", 1.0, 2);

        for order in [&first, &other, &second] {
            store.create_order(order).await.unwrap();
        }

        let found = store.list_orders_by_product("p-1").await.unwrap();
        assert_eq!(found, vec![first, second]);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_store_rejects_duplicate_id() {
        let store = InMemoryOrderStore::new();
        let order = Order::new("p-1", 1.0, 1);

        store.create_order(&order).await.unwrap();
        assert!(store.create_order(&order).await.is_err());
    }

    #[tokio::test]
    async fn test_publisher_records_events() {
        let publisher = InMemoryEventPublisher::new();
        publisher.publish_order_created("p-1", 3).await.unwrap();

        assert_eq!(publisher.published().await, vec![OrderCreatedEvent::new("p-1", 3)]);
    }
}
