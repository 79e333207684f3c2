//! The reload coordinator (spec §4.8): file mode re-reads a tenant's bound
//! source; store mode pulls from the persistence adapter on a timer.
//! Grounded on `pkg/policy/policy_reload_test.go`'s load-twice-and-observe
//! pattern and on spec §7's propagation policy (a failed reload never
//! disturbs the live state).

use pdp_persistence::{PersistenceAdapter, PersistenceError};
use pdp_policy::PolicyError;
use pdp_tenant::{Registry, TenantError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Default background reload period. A constructor parameter, not a
/// compiled-in constant, per spec §9's open-question resolution.
pub const DEFAULT_RELOAD_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error(transparent)]
    Tenant(#[from] TenantError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Binds a tenant registry to either a file-backed or adapter-backed
/// reload strategy.
pub struct Coordinator {
    registry: Arc<Registry>,
    adapter: Option<Arc<dyn PersistenceAdapter>>,
    interval: Duration,
}

impl Coordinator {
    /// `policyBackend = "file"`: `reload_tenant` re-reads each tenant's
    /// bound `PolicySource`.
    pub fn file_mode(registry: Arc<Registry>) -> Self {
        Self { registry, adapter: None, interval: DEFAULT_RELOAD_INTERVAL }
    }

    /// `policyBackend = "db"`: `reload_tenant` and the background loop pull
    /// policies from `adapter`. `interval` governs `spawn_background`.
    pub fn store_mode(registry: Arc<Registry>, adapter: Arc<dyn PersistenceAdapter>, interval: Duration) -> Self {
        Self { registry, adapter: Some(adapter), interval }
    }

    /// Reloads one tenant. On any error the tenant's live `Store` is left
    /// untouched — `Store::load`/`replace_policies` only ever swap on success.
    pub async fn reload_tenant(&self, tenant_id: &str) -> Result<(), ReloadError> {
        let bundle = self.registry.get(tenant_id)?;
        match &self.adapter {
            None => {
                bundle.store.load(&bundle.source)?;
            }
            Some(adapter) => {
                let policies = adapter.load_policies(tenant_id).await?;
                bundle.store.replace_policies(policies);
            }
        }
        Ok(())
    }

    /// Spawns the periodic reload loop. A failed reload for one tenant is
    /// logged and does not prevent other tenants' reloads in the same tick,
    /// nor crash the loop.
    pub fn spawn_background(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                ticker.tick().await;
                for tenant_id in self.registry.list_ids() {
                    if let Err(err) = self.reload_tenant(&tenant_id).await {
                        tracing::error!(tenant_id = %tenant_id, %err, "policy reload failed");
                    }
                }
            }
        })
    }
}
