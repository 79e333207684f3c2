//! Tenant administration handlers (spec §6): create, list, delete, reload.

use crate::app_state::AppState;
use crate::error::{ApiError, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pdp_persistence::Tenant;
use pdp_policy::PolicySource;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateTenantRequest {
    #[serde(rename = "tenantID")]
    pub tenant_id: String,
    pub name: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/tenants",
    tag = "tenants",
    request_body = CreateTenantRequest,
    responses(
        (status = 201, description = "Tenant created", body = Tenant),
        (status = 409, description = "Tenant id already exists")
    )
)]
pub async fn create_tenant(State(state): State<AppState>, Json(req): Json<CreateTenantRequest>) -> Result<Response> {
    let tenant = state
        .registry
        .create_tenant(&req.tenant_id, &req.name, PolicySource::Inline("policies: []\n".to_string()))
        .await
        .map_err(ApiError::Tenant)?;

    Ok((StatusCode::CREATED, Json(tenant)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/tenants",
    tag = "tenants",
    responses((status = 200, description = "All tenants", body = [Tenant]))
)]
pub async fn list_tenants(State(state): State<AppState>) -> Result<Json<Vec<Tenant>>> {
    let mut tenants = state.registry.list_tenants().await.map_err(ApiError::Tenant)?;
    tenants.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(Json(tenants))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tenants/{tenantID}",
    tag = "tenants",
    params(("tenantID" = String, Path, description = "Tenant id")),
    responses(
        (status = 204, description = "Tenant deleted"),
        (status = 404, description = "Tenant not found")
    )
)]
pub async fn delete_tenant(State(state): State<AppState>, Path(tenant_id): Path<String>) -> Result<StatusCode> {
    state.registry.delete_tenant(&tenant_id).await.map_err(ApiError::Tenant)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/tenants/{tenantID}/reload",
    tag = "tenants",
    params(("tenantID" = String, Path, description = "Tenant id")),
    responses(
        (status = 200, description = "Reload succeeded"),
        (status = 404, description = "Tenant not found"),
        (status = 502, description = "Reload failed")
    )
)]
pub async fn reload_tenant(State(state): State<AppState>, Path(tenant_id): Path<String>) -> Result<StatusCode> {
    state.reload.reload_tenant(&tenant_id).await.map_err(ApiError::Reload)?;
    Ok(StatusCode::OK)
}
