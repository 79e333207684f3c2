//! The composition root: wires config into a `Registry`, a `Coordinator`
//! bound to the selected policy/store backend, a context `Chain`, and a
//! rule compiler, then hands back the `AppState` axum serves from.

use crate::app_state::AppState;
use kernel::SystemClock;
use pdp_context::{Chain, GeoIpProvider, RiskProvider, TimeProvider};
use pdp_persistence::{InMemoryAdapter, PersistenceAdapter, SurrealAdapter, Tenant};
use pdp_policy::{HeuristicCompiler, PolicySource, RuleCompiler};
use pdp_reload::Coordinator;
use pdp_tenant::{DEFAULT_TENANT_ID, Registry};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub policy_backend: String,
    pub default_policy_file: String,
    pub store_backend: String,
    pub store_dsn: String,
    pub context_providers: Vec<String>,
    pub reload_interval: Duration,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            policy_backend: "file".to_string(),
            default_policy_file: "configs/policies.yaml".to_string(),
            store_backend: "memory".to_string(),
            store_dsn: String::new(),
            context_providers: vec!["time".to_string(), "geoip".to_string(), "risk".to_string()],
            reload_interval: Duration::from_secs(30),
        }
    }
}

impl From<&crate::config::Config> for BootstrapConfig {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            policy_backend: config.policy.policy_backend.clone(),
            default_policy_file: config.policy.default_policy_file.clone(),
            store_backend: config.policy.store_backend.clone(),
            store_dsn: config.policy.store_dsn.clone(),
            context_providers: config.policy.context_providers.clone(),
            reload_interval: Duration::from_secs(config.policy.reload_interval_secs),
        }
    }
}

pub async fn bootstrap(config: BootstrapConfig) -> Result<AppState, Box<dyn std::error::Error + Send + Sync>> {
    info!("initializing default tenant (policyBackend = {})", config.policy_backend);

    let source = match config.policy_backend.as_str() {
        "file" => PolicySource::File(PathBuf::from(&config.default_policy_file)),
        _ => PolicySource::Inline("policies: []\n".to_string()),
    };
    let registry = Arc::new(Registry::bootstrap_default(source)?);

    // The persistence adapter (C9) is bound to the registry (C7) unconditionally
    // so admin tenant create/delete always write through, independent of which
    // reload mode (C8) is selected below.
    let persistence_adapter = build_persistence_adapter(&config).await?;
    registry.set_persistence(persistence_adapter.clone());
    persistence_adapter
        .save_tenant(&Tenant {
            id: DEFAULT_TENANT_ID.to_string(),
            name: "default".to_string(),
            created_at: chrono::Utc::now(),
        })
        .await?;

    let reload = Arc::new(match config.policy_backend.as_str() {
        "file" => Coordinator::file_mode(registry.clone()),
        _ => Coordinator::store_mode(registry.clone(), persistence_adapter, config.reload_interval),
    });

    if config.policy_backend == "db" {
        info!("spawning background reload loop every {:?}", config.reload_interval);
        reload.clone().spawn_background();
    }

    let context_chain = Arc::new(build_context_chain(&config.context_providers));
    let compiler: Arc<dyn RuleCompiler> = Arc::new(HeuristicCompiler);

    Ok(AppState { registry, reload, compiler, context_chain })
}

async fn build_persistence_adapter(
    config: &BootstrapConfig,
) -> Result<Arc<dyn PersistenceAdapter>, Box<dyn std::error::Error + Send + Sync>> {
    if config.store_backend == "db" {
        let adapter = if config.store_dsn.is_empty() {
            SurrealAdapter::connect_embedded().await?
        } else {
            SurrealAdapter::connect(&config.store_dsn).await?
        };
        Ok(Arc::new(adapter))
    } else {
        Ok(Arc::new(InMemoryAdapter::new()))
    }
}

fn build_context_chain(providers: &[String]) -> Chain {
    let mut chain = Chain::new();
    for name in providers {
        match name.as_str() {
            "time" => {
                chain.push(Box::new(TimeProvider::new(Box::new(SystemClock))));
            }
            "geoip" => {
                chain.push(Box::new(GeoIpProvider));
            }
            "risk" => {
                chain.push(Box::new(RiskProvider));
            }
            other => tracing::warn!(provider = other, "unknown context provider ignored"),
        }
    }
    chain
}
