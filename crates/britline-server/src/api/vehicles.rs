//! Vehicle list handlers. Mutations address vehicles by array index (the
//! legacy contract); updates may alternatively address by the id assigned on
//! load once one has been persisted.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;

use britline_core::vehicle::{Vehicle, VehicleDraft};
use britline_store::{vehicles, MoveDirection};

use crate::middleware::RequestId;

use super::{map_store_error, parse_index, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct UpdateVehicleRequest {
    pub index: Option<i64>,
    pub id: Option<String>,
    pub vehicle: VehicleDraft,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct DeleteVehicleRequest {
    pub index: i64,
}

/// Reorder payloads: a whole-list move (`fromIndex`/`toIndex`) or an
/// adjacent swap (`index`/`direction`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(in crate::api) enum ReorderVehiclesRequest {
    #[serde(rename_all = "camelCase")]
    MoveTo { from_index: i64, to_index: i64 },
    Swap { index: i64, direction: MoveDirection },
}

/// GET /api/v1/vehicles and /api/v1/admin/vehicles — the ordered list,
/// seeded when storage is empty.
pub(in crate::api) async fn list_vehicles(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>, ApiError> {
    let vehicles = vehicles::load(&state.storage)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: vehicles,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/admin/vehicles — append a vehicle.
pub(in crate::api) async fn create_vehicle(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(draft): Json<VehicleDraft>,
) -> Result<(StatusCode, Json<ApiResponse<Vehicle>>), ApiError> {
    let vehicle = vehicles::create(&state.storage, draft)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: vehicle,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

async fn resolve_index(
    state: &AppState,
    req_id: &str,
    index: Option<i64>,
    id: Option<&str>,
) -> Result<usize, ApiError> {
    if let Some(index) = index {
        return parse_index(req_id, index);
    }
    let Some(id) = id else {
        return Err(ApiError::new(
            req_id,
            "bad_request",
            "either 'index' or 'id' is required",
        ));
    };

    let list = vehicles::load(&state.storage)
        .await
        .map_err(|e| map_store_error(req_id, &e))?;
    vehicles::index_of(&list, id).ok_or_else(|| {
        ApiError::new(req_id, "not_found", format!("vehicle '{id}' not found"))
    })
}

/// PUT /api/v1/admin/vehicles — replace the addressed vehicle, preserving
/// its position.
pub(in crate::api) async fn update_vehicle(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, ApiError> {
    let index = resolve_index(&state, &req_id.0, body.index, body.id.as_deref()).await?;

    let vehicle = vehicles::update(&state.storage, index, body.vehicle)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: vehicle,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PATCH /api/v1/admin/vehicles — reorder.
pub(in crate::api) async fn reorder_vehicles(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ReorderVehiclesRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    match body {
        ReorderVehiclesRequest::MoveTo {
            from_index,
            to_index,
        } => {
            let from = parse_index(&req_id.0, from_index)?;
            let to = parse_index(&req_id.0, to_index)?;
            vehicles::move_to(&state.storage, from, to)
                .await
                .map_err(|e| map_store_error(&req_id.0, &e))?;
        }
        ReorderVehiclesRequest::Swap { index, direction } => {
            let index = parse_index(&req_id.0, index)?;
            vehicles::move_entry(&state.storage, index, direction)
                .await
                .map_err(|e| map_store_error(&req_id.0, &e))?;
        }
    }

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "reordered": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/admin/vehicles — remove by index and reindex.
pub(in crate::api) async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<DeleteVehicleRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let index = parse_index(&req_id.0, body.index)?;

    vehicles::delete(&state.storage, index)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}
