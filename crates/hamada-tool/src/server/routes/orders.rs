//! Order tracking endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{Order, OrderStatistics, OrderStatus};

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
    #[serde(default)]
    pub notes: String,
}

/// GET /api/orders - newest first
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<OrderListResponse>> {
    let mut orders = state.orders().lock().orders()?;
    orders.reverse();
    Ok(Json(OrderListResponse {
        total: orders.len(),
        orders,
    }))
}

/// GET /api/orders/pending
pub async fn pending_orders(State(state): State<AppState>) -> Result<Json<OrderListResponse>> {
    let orders = state.orders().lock().pending_orders()?;
    Ok(Json(OrderListResponse {
        total: orders.len(),
        orders,
    }))
}

/// GET /api/orders/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<OrderStatistics>> {
    Ok(Json(state.orders().lock().statistics()?))
}

/// PUT /api/orders/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let order = state
        .orders()
        .lock()
        .update_status(&order_id, request.status, &request.notes)?;

    state.log(|db| db.upsert_order_tracking(&order, &[]));
    state.log(|db| db.log_order_tracking(&order));
    Ok(Json(order))
}
