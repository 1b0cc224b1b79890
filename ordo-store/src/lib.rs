pub mod app_config;
pub mod database;
pub mod order_repo;
pub mod redis_repo;
pub mod events;
pub mod memory;

pub use database::DbClient;
pub use order_repo::PgOrderStore;
pub use redis_repo::RedisOrderCache;
pub use events::KafkaEventPublisher;
pub use memory::{InMemoryOrderStore, InMemoryOrderCache, InMemoryEventPublisher};
