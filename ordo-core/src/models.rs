use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use crate::CoreError;

/// Order status in the lifecycle.
/// Orders leave this service as `Pending`; later states are set elsewhere.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "CONFIRMED" => Ok(OrderStatus::Confirmed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

/// A placed order. Built once by the workflow and never modified afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub product_id: String,
    pub total_price: f64,
    pub quantity: i32,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Price the order against the unit price quoted by the catalog right now
    pub fn new(product_id: &str, unit_price: f64, quantity: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id: product_id.to_string(),
            total_price: unit_price * f64::from(quantity),
            quantity,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// Catalog view of a product at lookup time. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    pub id: String,
    pub name: String,
    pub unit_price: f64,
    pub available_qty: i32,
}

impl ProductSnapshot {
    pub fn has_stock_for(&self, quantity: i32) -> bool {
        self.available_qty >= quantity
    }
}
