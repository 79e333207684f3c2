//! Hodei PDP API — Main Entry Point
//!
//! A multi-tenant policy decision service. This binary loads configuration,
//! initializes logging, runs the composition root (`bootstrap`), and serves
//! the router built by the library crate (spec §6).

use hodei_pdp_api::bootstrap::{BootstrapConfig, bootstrap};
use hodei_pdp_api::build_router;
use hodei_pdp_api::config::Config;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env();
    config.validate().map_err(|e| format!("invalid configuration: {e}"))?;

    initialize_logging(&config);

    info!("starting hodei-pdp-api");
    info!(
        policy_backend = %config.policy.policy_backend,
        store_backend = %config.policy.store_backend,
        "policy configuration loaded"
    );

    let app_state = bootstrap(BootstrapConfig::from(&config)).await?;
    let app = build_router(app_state, &config);

    let listener = tokio::net::TcpListener::bind(config.server_address()).await?;
    let addr = listener.local_addr()?;

    info!("listening on http://{addr}");
    info!("swagger UI at http://{addr}/swagger-ui");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("hodei-pdp-api shut down gracefully");
    Ok(())
}

fn initialize_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "hodei_pdp_api={0},pdp_engine={0},pdp_policy={0},pdp_tenant={0}",
            config.logging.level
        ))
    });

    match config.logging.format.as_str() {
        "json" => {
            tracing_subscriber::registry().with(env_filter).with(fmt::layer().json()).init();
        }
        "compact" => {
            tracing_subscriber::registry().with(env_filter).with(fmt::layer().compact()).init();
        }
        _ => {
            tracing_subscriber::registry().with(env_filter).with(fmt::layer().pretty()).init();
        }
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("received Ctrl+C"),
        _ = terminate => warn!("received SIGTERM"),
    }

    info!("starting graceful shutdown");
}
