use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::COOKIE, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use britline_core::{AppConfig, Environment};

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Shared-password admin auth settings used by middleware and the login
/// handler.
#[derive(Clone)]
pub struct AuthState {
    password: Option<Arc<String>>,
    pub enabled: bool,
}

impl AuthState {
    /// Builds auth config from the loaded application configuration.
    ///
    /// In development, a missing password disables auth for local iteration.
    /// In non-development envs, a missing password fails startup.
    ///
    /// # Errors
    ///
    /// Fails when no admin password is configured outside development.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match &config.admin_password {
            Some(password) => Ok(Self {
                password: Some(Arc::new(password.clone())),
                enabled: true,
            }),
            None if config.env == Environment::Development => {
                tracing::warn!(
                    "BRITLINE_ADMIN_PASSWORD not set; admin auth disabled in development environment"
                );
                Ok(Self {
                    password: None,
                    enabled: false,
                })
            }
            None => anyhow::bail!(
                "BRITLINE_ADMIN_PASSWORD is required outside development; set the shared admin password"
            ),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            password: None,
            enabled: false,
        }
    }

    #[must_use]
    pub fn with_password(password: &str) -> Self {
        Self {
            password: Some(Arc::new(password.to_owned())),
            enabled: true,
        }
    }

    /// Constant-time password check. Always succeeds when auth is disabled.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        match &self.password {
            Some(password) => password.as_bytes().ct_eq(candidate.as_bytes()).into(),
            None => !self.enabled,
        }
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Whether the request carries the admin session cookie.
#[must_use]
pub fn has_admin_cookie(headers: &axum::http::HeaderMap) -> bool {
    headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(cookie_header_grants_admin)
}

fn cookie_header_grants_admin(header: &str) -> bool {
    header
        .split(';')
        .map(str::trim)
        .any(|pair| pair == "admin-auth=true")
}

/// Middleware gating the admin routes on the session cookie when auth is
/// enabled.
pub async fn require_admin_cookie(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled || has_admin_cookie(req.headers()) {
        return next.run(req).await;
    }

    (
        StatusCode::UNAUTHORIZED,
        Json(MiddlewareErrorBody {
            error: MiddlewareError {
                code: "unauthorized",
                message: "admin session required",
            },
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_the_configured_password() {
        let auth = AuthState::with_password("hunter2");
        assert!(auth.verify("hunter2"));
        assert!(!auth.verify("hunter3"));
        assert!(!auth.verify(""));
    }

    #[test]
    fn verify_always_passes_when_disabled() {
        let auth = AuthState::disabled();
        assert!(auth.verify("anything"));
    }

    #[test]
    fn cookie_header_parsing_matches_exact_flag() {
        assert!(cookie_header_grants_admin("admin-auth=true"));
        assert!(cookie_header_grants_admin(
            "theme=dark; admin-auth=true; lang=en"
        ));
        assert!(!cookie_header_grants_admin("admin-auth=false"));
        assert!(!cookie_header_grants_admin("admin-auth-true=1"));
        assert!(!cookie_header_grants_admin(""));
    }
}
