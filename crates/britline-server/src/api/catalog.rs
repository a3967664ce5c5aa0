//! Catalog handlers: admin CRUD over the nested services structure and the
//! public browse lookup.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use britline_core::service::ServiceDraft;
use britline_store::catalog::{self, Catalog, CategoryRecords};

use crate::middleware::RequestId;

use super::{map_store_error, parse_index, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct CreateServiceRequest {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    pub year: String,
    pub category: String,
    pub service: ServiceDraft,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct UpdateServiceRequest {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    pub year: String,
    pub category: String,
    pub index: i64,
    pub service: ServiceDraft,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct DeleteServiceRequest {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    pub year: String,
    pub category: String,
    pub index: i64,
}

/// GET /api/v1/admin/services — the whole catalog, duplicate-cleaned.
pub(in crate::api) async fn list_services(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Catalog>>, ApiError> {
    let catalog = catalog::load_clean(&state.storage)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: catalog,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/admin/services — append a record, creating missing nesting
/// levels.
pub(in crate::api) async fn create_service(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<serde_json::Value>>), ApiError> {
    catalog::add_record(
        &state.storage,
        &body.brand,
        &body.model,
        &body.year,
        &body.category,
        body.service,
    )
    .await
    .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: serde_json::json!({ "created": true }),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/admin/services — wholesale-replace the record at `index`.
pub(in crate::api) async fn update_service(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UpdateServiceRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let index = parse_index(&req_id.0, body.index)?;

    catalog::update_record(
        &state.storage,
        &body.brand,
        &body.model,
        &body.year,
        &body.category,
        index,
        body.service,
    )
    .await
    .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "updated": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/admin/services — remove the record at `index`, trying the
/// fallback key strategies for pre-normalization data.
pub(in crate::api) async fn delete_service(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<DeleteServiceRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let index = parse_index(&req_id.0, body.index)?;

    catalog::delete_record(
        &state.storage,
        &body.brand,
        &body.model,
        &body.year,
        &body.category,
        index,
    )
    .await
    .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/catalog/:brand/:model/:year — public browse lookup, merged
/// across legacy key variants. 404 when no categories match.
pub(in crate::api) async fn browse_catalog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((brand, model, year)): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<CategoryRecords>>, ApiError> {
    let categories = catalog::lookup(&state.storage, &brand, &model, &year)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    if categories.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no services found for {brand}/{model}/{year}"),
        ));
    }

    Ok(Json(ApiResponse {
        data: categories,
        meta: ResponseMeta::new(req_id.0),
    }))
}
