//! Library surface for the `hodei-pdp-api` binary, split out so integration
//! tests can build a real router against an in-memory tenant without
//! spawning a process.

pub mod app_state;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod openapi;

use crate::app_state::AppState;
use crate::config::Config;
use crate::openapi::create_api_doc;
use axum::{
    Router,
    routing::{delete, get, post},
};
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the full axum router: health probes, the versioned API surface,
/// Swagger UI, and the teacher's standard middleware stack (tracing,
/// request timeout, CORS).
pub fn build_router(app_state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::health_check))
        .nest("/api/v1", api_v1_routes(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", create_api_doc()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
        .layer(CorsLayer::permissive())
}

/// Builds a router over a freshly bootstrapped, in-memory `AppState` for
/// integration tests. Returns the `AppState` too so a test can seed
/// additional tenants with real policy content via `registry.create`
/// before issuing requests — the HTTP tenant-create route always starts a
/// tenant with an empty policy document, so it cannot alone set up
/// interesting decision scenarios.
pub async fn build_app_for_tests() -> Result<(Router, AppState), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::default();
    let bootstrap_config =
        crate::bootstrap::BootstrapConfig { policy_backend: "db".to_string(), ..crate::bootstrap::BootstrapConfig::from(&config) };
    let app_state = crate::bootstrap::bootstrap(bootstrap_config).await?;
    let router = build_router(app_state.clone(), &config);
    Ok((router, app_state))
}

fn api_v1_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/decide", post(handlers::decide::decide))
        .route("/simulate", post(handlers::decide::simulate))
        .route("/tenants", post(handlers::tenants::create_tenant))
        .route("/tenants", get(handlers::tenants::list_tenants))
        .route("/tenants/{tenantID}", delete(handlers::tenants::delete_tenant))
        .route("/tenants/{tenantID}/reload", post(handlers::tenants::reload_tenant))
        .route("/tenants/{tenantID}/policies/validate", post(handlers::policies::validate_policy))
        .route("/tenants/{tenantID}/rules/compile", post(handlers::rules::compile_rule))
        .with_state(app_state)
}
