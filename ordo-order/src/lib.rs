pub mod workflow;

pub use workflow::{OrderError, OrderWorkflow, DEFAULT_ORDER_CACHE_TTL};
