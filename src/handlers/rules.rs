//! Natural-language rule compilation handler (spec §6, §9's heuristic
//! stand-in for the opaque external compiler).

use crate::app_state::AppState;
use crate::error::{ApiError, Result};
use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CompileRuleRequest {
    pub rule: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CompileRuleResponse {
    /// The opaque policy document produced by the compiler, per spec §6.
    pub policy: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/tenants/{tenantID}/rules/compile",
    tag = "rules",
    params(("tenantID" = String, Path, description = "Tenant id")),
    request_body = CompileRuleRequest,
    responses(
        (status = 200, description = "Rule compiled", body = CompileRuleResponse),
        (status = 404, description = "Tenant not found"),
        (status = 422, description = "Unsupported rule format")
    )
)]
pub async fn compile_rule(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(req): Json<CompileRuleRequest>,
) -> Result<Json<CompileRuleResponse>> {
    state.registry.get(&tenant_id).map_err(ApiError::Tenant)?;
    let policy = state.compiler.compile(&req.rule).map_err(ApiError::Compile)?;
    Ok(Json(CompileRuleResponse { policy }))
}
