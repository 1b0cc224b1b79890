use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const ORDER_CREATED_PATTERN: &str = "order.created";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedData {
    pub product_id: String,
    pub quantity: i32,
}

/// Envelope emitted after an order has been persisted
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderCreatedEvent {
    pub pattern: String,
    pub data: OrderCreatedData,
}

impl OrderCreatedEvent {
    pub fn new(product_id: &str, quantity: i32) -> Self {
        Self {
            pattern: ORDER_CREATED_PATTERN.to_string(),
            data: OrderCreatedData {
                product_id: product_id.to_string(),
                quantity,
            },
        }
    }
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Single delivery attempt, no retry.
    async fn publish_order_created(
        &self,
        product_id: &str,
        quantity: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
