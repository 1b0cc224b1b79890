use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use ordo_core::Order;
use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub product_id: String,
    pub quantity: i32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/product/{product_id}", get(list_orders_by_product))
}

/// POST /orders
async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state.workflow.create_order(&req.product_id, req.quantity).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders/product/{product_id}
async fn list_orders_by_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state.workflow.list_orders_by_product(&product_id).await?;
    Ok(Json(orders))
}
