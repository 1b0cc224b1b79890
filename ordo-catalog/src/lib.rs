pub mod client;

pub use client::{CatalogError, HttpProductClient};
