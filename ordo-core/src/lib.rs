pub mod models;
pub mod catalog;
pub mod repository;
pub mod events;

pub use models::{Order, OrderStatus, ProductSnapshot};
pub use catalog::ProductInfoClient;
pub use repository::{OrderStore, OrderReadCache, cache_key_for_product};
pub use events::{EventPublisher, OrderCreatedEvent};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),
}
