//! The API's error boundary: composes every crate's own error type into one
//! `IntoResponse` mapping, following the taxonomy in spec §7.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Tenant(#[from] pdp_tenant::TenantError),
    #[error(transparent)]
    Policy(#[from] pdp_policy::PolicyError),
    #[error(transparent)]
    Validation(#[from] pdp_policy::ValidationError),
    #[error(transparent)]
    Compile(#[from] pdp_policy::CompileError),
    #[error(transparent)]
    Reload(#[from] pdp_reload::ReloadError),
    #[error(transparent)]
    Persistence(#[from] pdp_persistence::PersistenceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Tenant(pdp_tenant::TenantError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Tenant(pdp_tenant::TenantError::Conflict(_)) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Tenant(pdp_tenant::TenantError::Policy(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            ApiError::Tenant(pdp_tenant::TenantError::Persistence(_)) => {
                (StatusCode::BAD_GATEWAY, "PERSISTENCE_ERROR")
            }
            ApiError::Policy(pdp_policy::PolicyError::Validation(_) | pdp_policy::PolicyError::Parse(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            ApiError::Policy(pdp_policy::PolicyError::Io(_)) => (StatusCode::BAD_GATEWAY, "PERSISTENCE_ERROR"),
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            ApiError::Compile(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            ApiError::Reload(pdp_reload::ReloadError::Tenant(pdp_tenant::TenantError::NotFound(_))) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            ApiError::Reload(_) => (StatusCode::BAD_GATEWAY, "PERSISTENCE_ERROR"),
            ApiError::Persistence(_) => (StatusCode::BAD_GATEWAY, "PERSISTENCE_ERROR"),
        };

        match status {
            StatusCode::NOT_FOUND | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                tracing::warn!("client error: {self}");
            }
            _ => tracing::error!("server error: {self}"),
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
