use std::time::Duration;
use async_trait::async_trait;
use crate::models::Order;

const ORDERS_BY_PRODUCT_PREFIX: &str = "orders:product:";

/// Cache key holding the order list of a single product
pub fn cache_key_for_product(product_id: &str) -> String {
    format!("{}{}", ORDERS_BY_PRODUCT_PREFIX, product_id)
}

/// System of record for orders
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create_order(
        &self,
        order: &Order,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn list_orders_by_product(
        &self,
        product_id: &str,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Short-lived copy of per-product order lists.
///
/// `Ok(None)` is a miss. `Ok(Some(vec![]))` is a cached empty list and must not
/// be confused with a miss.
#[async_trait]
pub trait OrderReadCache: Send + Sync {
    async fn get_orders(
        &self,
        key: &str,
    ) -> Result<Option<Vec<Order>>, Box<dyn std::error::Error + Send + Sync>>;

    async fn set_orders(
        &self,
        key: &str,
        orders: &[Order],
        ttl: Duration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_namespaced_per_product() {
        assert_eq!(cache_key_for_product("valid-product"), "orders:product:valid-product");
        assert_ne!(cache_key_for_product("a"), cache_key_for_product("b"));
        assert_eq!(cache_key_for_product(""), "orders:product:");
    }
}
