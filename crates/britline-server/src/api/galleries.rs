//! Handlers for the two gallery stores. Works carry bilingual text; car
//! projects are image-only. Both share the store engine in
//! `britline_store::gallery`.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;

use britline_core::gallery::{CarProject, CarProjectDraft, Work, WorkDraft};
use britline_store::{gallery, MoveDirection};

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct UpdateWorkRequest {
    pub id: String,
    pub images: Option<Vec<String>>,
    pub title_en: Option<String>,
    pub title_ru: Option<String>,
    pub description_en: Option<String>,
    pub description_ru: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct UpdateCarProjectRequest {
    pub id: String,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct DeleteGalleryRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ReorderGalleryRequest {
    pub id: String,
    pub direction: MoveDirection,
}

// ---------------------------------------------------------------------------
// Works
// ---------------------------------------------------------------------------

/// GET /api/v1/works and /api/v1/admin/works.
pub(in crate::api) async fn list_works(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Work>>>, ApiError> {
    let works = gallery::load::<Work>(&state.storage)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: works,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/admin/works.
pub(in crate::api) async fn create_work(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(draft): Json<WorkDraft>,
) -> Result<(StatusCode, Json<ApiResponse<Work>>), ApiError> {
    let work = gallery::create(&state.storage, Work::from(draft))
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: work,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/admin/works — replace the supplied fields.
pub(in crate::api) async fn update_work(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UpdateWorkRequest>,
) -> Result<Json<ApiResponse<Work>>, ApiError> {
    let work = gallery::update::<Work>(&state.storage, &body.id, |work| {
        if let Some(images) = body.images {
            work.images = images;
        }
        if let Some(title_en) = body.title_en {
            work.title_en = title_en;
        }
        if let Some(title_ru) = body.title_ru {
            work.title_ru = title_ru;
        }
        if let Some(description_en) = body.description_en {
            work.description_en = description_en;
        }
        if let Some(description_ru) = body.description_ru {
            work.description_ru = description_ru;
        }
    })
    .await
    .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: work,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PATCH /api/v1/admin/works — adjacent swap.
pub(in crate::api) async fn reorder_work(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ReorderGalleryRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    gallery::move_entry::<Work>(&state.storage, &body.id, body.direction)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "reordered": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/admin/works — remove by id (silent for unknown ids).
pub(in crate::api) async fn delete_work(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<DeleteGalleryRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    gallery::delete::<Work>(&state.storage, &body.id)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

// ---------------------------------------------------------------------------
// Car projects
// ---------------------------------------------------------------------------

/// GET /api/v1/car-projects and /api/v1/admin/car-projects.
pub(in crate::api) async fn list_car_projects(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<CarProject>>>, ApiError> {
    let projects = gallery::load::<CarProject>(&state.storage)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: projects,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/admin/car-projects.
pub(in crate::api) async fn create_car_project(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(draft): Json<CarProjectDraft>,
) -> Result<(StatusCode, Json<ApiResponse<CarProject>>), ApiError> {
    let project = gallery::create(&state.storage, CarProject::from(draft))
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: project,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/admin/car-projects.
pub(in crate::api) async fn update_car_project(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UpdateCarProjectRequest>,
) -> Result<Json<ApiResponse<CarProject>>, ApiError> {
    let project = gallery::update::<CarProject>(&state.storage, &body.id, |project| {
        if let Some(images) = body.images {
            project.images = images;
        }
    })
    .await
    .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: project,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PATCH /api/v1/admin/car-projects.
pub(in crate::api) async fn reorder_car_project(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ReorderGalleryRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    gallery::move_entry::<CarProject>(&state.storage, &body.id, body.direction)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "reordered": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/admin/car-projects.
pub(in crate::api) async fn delete_car_project(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<DeleteGalleryRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    gallery::delete::<CarProject>(&state.storage, &body.id)
        .await
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}
