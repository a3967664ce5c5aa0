mod auth;
mod catalog;
mod galleries;
mod orders;
mod vehicles;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use britline_notify::Notifier;
use britline_store::{Storage, StoreError};

use crate::middleware::{request_id, require_admin_cookie, AuthState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub notifier: Arc<Notifier>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    storage_mode: String,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Translate store failures into API errors, passing the underlying message
/// through verbatim. The admin UI intentionally shows storage-layer detail
/// instead of a generic message.
pub(super) fn map_store_error(request_id: &str, error: &StoreError) -> ApiError {
    match error {
        StoreError::NotFound(message) => ApiError::new(request_id, "not_found", message.clone()),
        StoreError::InvalidInput(message) => {
            ApiError::new(request_id, "bad_request", message.clone())
        }
        other => {
            tracing::error!(error = %other, "storage operation failed");
            ApiError::new(request_id, "internal_error", other.to_string())
        }
    }
}

/// Validate a JSON index field: non-negative integers only, surfaced as a
/// 400 otherwise.
pub(super) fn parse_index(request_id: &str, index: i64) -> Result<usize, ApiError> {
    usize::try_from(index).map_err(|_| {
        ApiError::new(
            request_id,
            "bad_request",
            format!("index must be a non-negative integer, got: {index}"),
        )
    })
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn admin_router(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/admin/services",
            get(catalog::list_services)
                .post(catalog::create_service)
                .put(catalog::update_service)
                .delete(catalog::delete_service),
        )
        .route(
            "/api/v1/admin/vehicles",
            get(vehicles::list_vehicles)
                .post(vehicles::create_vehicle)
                .put(vehicles::update_vehicle)
                .patch(vehicles::reorder_vehicles)
                .delete(vehicles::delete_vehicle),
        )
        .route(
            "/api/v1/admin/works",
            get(galleries::list_works)
                .post(galleries::create_work)
                .put(galleries::update_work)
                .patch(galleries::reorder_work)
                .delete(galleries::delete_work),
        )
        .route(
            "/api/v1/admin/car-projects",
            get(galleries::list_car_projects)
                .post(galleries::create_car_project)
                .put(galleries::update_car_project)
                .patch(galleries::reorder_car_project)
                .delete(galleries::delete_car_project),
        )
        .route(
            "/api/v1/admin/orders",
            get(orders::list_orders)
                .put(orders::update_order_status)
                .delete(orders::delete_order),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth,
            require_admin_cookie,
        ))
}

pub fn build_app(state: AppState, auth: AuthState) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/vehicles", get(vehicles::list_vehicles))
        .route("/api/v1/works", get(galleries::list_works))
        .route("/api/v1/car-projects", get(galleries::list_car_projects))
        .route(
            "/api/v1/catalog/{brand}/{model}/{year}",
            get(catalog::browse_catalog),
        )
        .route("/api/v1/orders", axum::routing::post(orders::create_order))
        .route("/api/v1/admin/login", axum::routing::post(auth::login))
        .route("/api/v1/admin/logout", axum::routing::post(auth::logout))
        .route("/api/v1/admin/check-auth", get(auth::check_auth));

    Router::new()
        .merge(public_routes)
        .merge(admin_router(auth.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .layer(Extension(auth))
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData {
                status: "ok",
                storage_mode: state.storage.mode().to_string(),
            },
            meta,
        }),
    )
}
