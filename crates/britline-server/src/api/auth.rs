//! Admin session endpoints: shared-password login setting an HttpOnly
//! cookie flag, logout clearing it, and the cookie check the admin UI polls.

use axum::{
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;

use crate::middleware::{has_admin_cookie, AuthState, RequestId};

use super::{ApiError, ApiResponse, ResponseMeta};

const SESSION_COOKIE: &str = "admin-auth=true; Path=/; HttpOnly; SameSite=Strict; Max-Age=86400";
const CLEAR_COOKIE: &str = "admin-auth=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0";

#[derive(Debug, Deserialize)]
pub(in crate::api) struct LoginRequest {
    #[serde(default)]
    password: String,
}

/// POST /api/v1/admin/login — verify the shared password and set the
/// session cookie.
pub(in crate::api) async fn login(
    Extension(auth): Extension<AuthState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !auth.verify(&body.password) {
        return Err(ApiError::new(req_id.0, "unauthorized", "invalid password"));
    }

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, SESSION_COOKIE)],
        Json(ApiResponse {
            data: serde_json::json!({ "success": true }),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// POST /api/v1/admin/logout — clear the session cookie.
pub(in crate::api) async fn logout(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(SET_COOKIE, CLEAR_COOKIE)],
        Json(ApiResponse {
            data: serde_json::json!({ "success": true }),
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

/// GET /api/v1/admin/check-auth — whether the request carries a valid
/// session cookie.
pub(in crate::api) async fn check_auth(
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: serde_json::json!({ "authenticated": has_admin_cookie(&headers) }),
        meta: ResponseMeta::new(req_id.0),
    })
}
