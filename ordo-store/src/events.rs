use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::time::Duration;
use tracing::{info, error};
use ordo_core::{EventPublisher, OrderCreatedEvent};

#[derive(Clone)]
pub struct KafkaEventPublisher {
    producer: FutureProducer,
    topic: String,
}

impl KafkaEventPublisher {
    pub fn new(brokers: &str, topic: &str) -> Result<Self, rdkafka::error::KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self { producer, topic: topic.to_string() })
    }
}

/// JSON body of an `order.created` message
fn order_created_payload(product_id: &str, quantity: i32) -> Result<String, serde_json::Error> {
    serde_json::to_string(&OrderCreatedEvent::new(product_id, quantity))
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    async fn publish_order_created(
        &self,
        product_id: &str,
        quantity: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let payload = order_created_payload(product_id, quantity)?;

        // Keyed by product so events for one product stay on one partition
        let record = FutureRecord::to(&self.topic)
            .key(product_id)
            .payload(&payload);

        match self.producer.send(record, Timeout::After(Duration::from_secs(0))).await {
            Ok(delivery) => {
                info!(
                    "order.created for product {} (qty {}) written to {} partition {} offset {}",
                    product_id, quantity, self.topic, delivery.partition, delivery.offset
                );
            }
            Err((e, _msg)) => {
                error!("order.created for product {} not delivered to {}: {}", product_id, self.topic, e);
                return Err(Box::new(e));
            }
        }

        Ok(())
    }
}
