use std::time::Duration;
use async_trait::async_trait;
use redis::{AsyncCommands, RedisResult};
use tracing::{debug, info};
use ordo_core::{Order, OrderReadCache};

#[derive(Clone)]
pub struct RedisOrderCache {
    client: redis::Client,
}

impl RedisOrderCache {
    pub fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    pub async fn ping(&self) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!("Redis answered {}", pong);
        Ok(())
    }
}

/// `SET EX` rejects a zero expiry, so sub-second TTLs round up to one second
fn expiry_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl OrderReadCache for RedisOrderCache {
    async fn get_orders(
        &self,
        key: &str,
    ) -> Result<Option<Vec<Order>>, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(key).await?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn set_orders(
        &self,
        key: &str,
        orders: &[Order],
        ttl: Duration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let json = serde_json::to_string(orders)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(key, json, expiry_seconds(ttl)).await?;
        debug!("Cached {} orders under {}", orders.len(), key);
        Ok(())
    }
}
