//! Order intake and admin order management.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use britline_core::order::{Order, OrderDraft, OrderStatus};
use britline_store::orders;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct UpdateOrderRequest {
    pub id: String,
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct DeleteOrderQuery {
    pub id: Option<String>,
}

/// POST /api/v1/orders — public intake. The Telegram notification is
/// best-effort: a failure is logged and never fails the create.
pub(in crate::api) async fn create_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(draft): Json<OrderDraft>,
) -> Result<(StatusCode, Json<ApiResponse<serde_json::Value>>), ApiError> {
    let order = orders::create(&state.storage, draft)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    match state.notifier.notify_order_created(&order).await {
        Ok(true) => tracing::info!(order_id = %order.id, "order notification sent"),
        Ok(false) => {}
        Err(e) => {
            tracing::warn!(order_id = %order.id, error = %e, "order notification failed");
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: serde_json::json!({ "orderId": order.id }),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// GET /api/v1/admin/orders — every submitted order.
pub(in crate::api) async fn list_orders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Order>>>, ApiError> {
    let orders = orders::load(&state.storage)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: orders,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PUT /api/v1/admin/orders — set an order's status.
pub(in crate::api) async fn update_order_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UpdateOrderRequest>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let order = orders::update_status(&state.storage, &body.id, body.status)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: order,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/admin/orders?id=... — remove an order by id.
pub(in crate::api) async fn delete_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DeleteOrderQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let Some(id) = query.id else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "order id is required",
        ));
    };

    orders::delete(&state.storage, &id)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}
