use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use billet_order::Order;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct OrderCreatedResponse {
    pub id: Uuid,
    pub code: String,
}

/// POST /v1/orders
/// Register an order handed off by the host order subsystem
pub async fn create_order(
    State(state): State<AppState>,
    Json(order): Json<Order>,
) -> (StatusCode, Json<OrderCreatedResponse>) {
    let response = OrderCreatedResponse {
        id: order.id,
        code: order.code.clone(),
    };
    tracing::info!(order = %response.code, "order registered");
    state.orders.insert_order(order).await;
    (StatusCode::CREATED, Json(response))
}

/// GET /v1/orders/:id
/// Retrieve order details
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get_order(order_id)
        .await
        .ok_or_else(|| AppError::NotFoundError(format!("Order not found: {}", order_id)))?;
    Ok(Json(order))
}
