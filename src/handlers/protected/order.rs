// handlers/protected/order.rs - POST /orders/, GET /orders/:id/

use axum::{
    extract::{Path, State},
    Extension,
};
use uuid::Uuid;

use crate::database::models::{NewOrder, Order};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Payload};
use crate::state::AppState;

/// POST /orders/ - Place an order; it starts out pending
pub async fn place(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Payload(input): Payload<NewOrder>,
) -> ApiResult<Order> {
    let order = state.store.insert_order(Order::new(user.user_id, input)).await?;
    tracing::info!("Order {} placed by {}", order.id, user.username);
    Ok(ApiResponse::created(order))
}

/// GET /orders/:id/ - Status of one of the caller's orders
pub async fn status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Order> {
    // Unparseable ids and other users' orders are indistinguishable from missing ones
    let not_found = || ApiError::not_found("Order not found");
    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;

    let order = state
        .store
        .find_order(user.user_id, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(order))
}
