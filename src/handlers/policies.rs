//! Policy document validation handler (spec §6).

use crate::app_state::AppState;
use crate::error::{ApiError, Result};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use pdp_policy::{RawDocument, validate::validate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ValidatePolicyRequest {
    /// The raw YAML policy document body, per spec §6's `{tenantID, policy}`.
    pub policy: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ValidatePolicyResponse {
    pub valid: bool,
}

#[utoipa::path(
    post,
    path = "/api/v1/tenants/{tenantID}/policies/validate",
    tag = "policies",
    params(("tenantID" = String, Path, description = "Tenant id")),
    request_body = ValidatePolicyRequest,
    responses(
        (status = 200, description = "Document is valid", body = ValidatePolicyResponse),
        (status = 404, description = "Tenant not found"),
        (status = 422, description = "Document failed validation")
    )
)]
pub async fn validate_policy(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(req): Json<ValidatePolicyRequest>,
) -> Result<(StatusCode, Json<ValidatePolicyResponse>)> {
    state.registry.get(&tenant_id).map_err(ApiError::Tenant)?;

    let doc = RawDocument::parse(&req.policy).map_err(|err| ApiError::BadRequest(err.to_string()))?;
    validate(&doc).map_err(ApiError::Validation)?;

    Ok((StatusCode::OK, Json(ValidatePolicyResponse { valid: true })))
}
