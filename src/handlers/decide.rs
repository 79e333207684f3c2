//! Decision and simulation handlers (spec §6): both share the evaluation
//! path, `simulate` is a dry run against the same request shape.

use crate::app_state::AppState;
use crate::error::{ApiError, Result};
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use pdp_context::RequestMeta;
use pdp_engine::{Decision, EvalRequest};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct DecideRequest {
    #[serde(rename = "tenantID")]
    pub tenant_id: String,
    pub subject: String,
    pub resource: String,
    pub action: String,
    /// Extra environment keys, merged over the context pipeline's output —
    /// matches spec §6's `conditions` field name on the wire.
    #[serde(default, rename = "conditions")]
    pub conditions: HashMap<String, String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/decide",
    tag = "decide",
    request_body = DecideRequest,
    responses((status = 200, description = "Decision computed", body = Decision))
)]
pub async fn decide(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<DecideRequest>,
) -> Result<Json<Decision>> {
    evaluate(&state, &headers, req).await.map(Json)
}

/// Same algorithm as `decide`; named separately per spec §6 since a caller
/// may want to distinguish a dry run from a real decision at the transport
/// level even though the engine performs no writes either way.
#[utoipa::path(
    post,
    path = "/api/v1/simulate",
    tag = "decide",
    request_body = DecideRequest,
    responses((status = 200, description = "Simulated decision", body = Decision))
)]
pub async fn simulate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<DecideRequest>,
) -> Result<Json<Decision>> {
    evaluate(&state, &headers, req).await.map(Json)
}

async fn evaluate(state: &AppState, headers: &HeaderMap, req: DecideRequest) -> Result<Decision> {
    let bundle = state.registry.get(&req.tenant_id).map_err(ApiError::Tenant)?;

    let meta = RequestMeta {
        remote_addr: None,
        headers: headers
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), value.to_str().unwrap_or_default().to_string()))
            .collect(),
    };
    let mut env = state.context_chain.get_context(&meta);
    env.extend(req.conditions);

    let eval = EvalRequest { subject: req.subject, resource: req.resource, action: req.action, env };
    Ok(bundle.engine.evaluate(&eval))
}
