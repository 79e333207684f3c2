//! The tenant registry (spec §4.7): per-tenant `Store`/`Graph`/`Engine`
//! bundles behind one map, replacing `api/api.go`'s single package-level
//! engine wired to one global policy file.

use chrono::Utc;
use kernel::Clock;
use pdp_engine::Engine;
use pdp_graph::Graph;
use pdp_persistence::{PersistenceAdapter, PersistenceError, Tenant};
use pdp_policy::{PolicyError, PolicySource, Store};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

pub const DEFAULT_TENANT_ID: &str = "default";

#[derive(Debug, Error)]
pub enum TenantError {
    #[error("tenant not found: {0}")]
    NotFound(String),
    #[error("tenant already exists: {0}")]
    Conflict(String),
    #[error("failed to load tenant policy source: {0}")]
    Policy(#[from] PolicyError),
    #[error("tenant persistence failed: {0}")]
    Persistence(#[from] PersistenceError),
}

/// One tenant's isolated policy state. No field here is shared with any
/// other tenant's bundle.
pub struct TenantBundle {
    pub store: Arc<Store>,
    pub graph: Arc<Graph>,
    pub engine: Arc<Engine>,
    pub source: PolicySource,
}

impl TenantBundle {
    fn new(source: PolicySource) -> Result<Self, TenantError> {
        let store = Arc::new(Store::new());
        store.load(&source)?;
        let graph = Arc::new(Graph::new());
        let engine = Arc::new(Engine::new(store.clone(), graph.clone()));
        Ok(Self { store, graph, engine, source })
    }

    fn with_clock(source: PolicySource, clock: Box<dyn Clock>) -> Result<Self, TenantError> {
        let store = Arc::new(Store::new());
        store.load(&source)?;
        let graph = Arc::new(Graph::new());
        let engine = Arc::new(Engine::with_clock(store.clone(), graph.clone(), clock));
        Ok(Self { store, graph, engine, source })
    }
}

/// The registry holding every tenant's bundle, guarded by one `RwLock` so
/// `create`/`delete` never race a concurrent `get` into observing a
/// half-built or half-torn-down bundle.
///
/// `persistence`, when set, is the spec §4.9 adapter C7 writes tenant
/// records through on admin create/delete (`create_tenant`/`delete_tenant`,
/// below) — the bundle-level `create`/`delete` stay adapter-agnostic for
/// internal callers (bootstrap, tests) that only need the in-memory
/// `Store`/`Graph`/`Engine` triple.
#[derive(Default)]
pub struct Registry {
    tenants: RwLock<HashMap<String, Arc<TenantBundle>>>,
    persistence: RwLock<Option<Arc<dyn PersistenceAdapter>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self { tenants: RwLock::new(HashMap::new()), persistence: RwLock::new(None) }
    }

    /// Binds the persistence adapter `create_tenant`/`delete_tenant`/
    /// `list_tenants` write through and read from.
    pub fn set_persistence(&self, adapter: Arc<dyn PersistenceAdapter>) {
        *self.persistence.write().expect("registry lock poisoned") = Some(adapter);
    }

    fn persistence(&self) -> Option<Arc<dyn PersistenceAdapter>> {
        self.persistence.read().expect("registry lock poisoned").clone()
    }

    /// Boots the well-known `"default"` tenant from `source`, generalizing
    /// `api/api.go`'s `SetupRouter`, which loaded a single global policy
    /// file into a single global engine at startup.
    pub fn bootstrap_default(source: PolicySource) -> Result<Self, TenantError> {
        let registry = Self::new();
        registry.create(DEFAULT_TENANT_ID, source)?;
        Ok(registry)
    }

    pub fn create(&self, tenant_id: &str, source: PolicySource) -> Result<(), TenantError> {
        let mut tenants = self.tenants.write().expect("registry lock poisoned");
        if tenants.contains_key(tenant_id) {
            return Err(TenantError::Conflict(tenant_id.to_string()));
        }
        let bundle = TenantBundle::new(source)?;
        tenants.insert(tenant_id.to_string(), Arc::new(bundle));
        Ok(())
    }

    /// Test/administration hook allowing a tenant's clock to be pinned.
    pub fn create_with_clock(
        &self,
        tenant_id: &str,
        source: PolicySource,
        clock: Box<dyn Clock>,
    ) -> Result<(), TenantError> {
        let mut tenants = self.tenants.write().expect("registry lock poisoned");
        if tenants.contains_key(tenant_id) {
            return Err(TenantError::Conflict(tenant_id.to_string()));
        }
        let bundle = TenantBundle::with_clock(source, clock)?;
        tenants.insert(tenant_id.to_string(), Arc::new(bundle));
        Ok(())
    }

    pub fn delete(&self, tenant_id: &str) -> Result<(), TenantError> {
        let mut tenants = self.tenants.write().expect("registry lock poisoned");
        tenants
            .remove(tenant_id)
            .map(|_| ())
            .ok_or_else(|| TenantError::NotFound(tenant_id.to_string()))
    }

    pub fn get(&self, tenant_id: &str) -> Result<Arc<TenantBundle>, TenantError> {
        self.tenants
            .read()
            .expect("registry lock poisoned")
            .get(tenant_id)
            .cloned()
            .ok_or_else(|| TenantError::NotFound(tenant_id.to_string()))
    }

    pub fn list_ids(&self) -> Vec<String> {
        self.tenants.read().expect("registry lock poisoned").keys().cloned().collect()
    }

    pub fn contains(&self, tenant_id: &str) -> bool {
        self.tenants.read().expect("registry lock poisoned").contains_key(tenant_id)
    }

    /// Administrative tenant creation (spec §6's tenant-create call):
    /// builds the bundle, then — if a persistence adapter is bound —
    /// write-through the tenant record (spec §4.9). A failed write-through
    /// rolls the bundle back so no tenant is left half-created.
    pub async fn create_tenant(&self, tenant_id: &str, name: &str, source: PolicySource) -> Result<Tenant, TenantError> {
        self.create(tenant_id, source)?;

        let tenant = Tenant { id: tenant_id.to_string(), name: name.to_string(), created_at: Utc::now() };
        if let Some(adapter) = self.persistence() {
            if let Err(err) = adapter.save_tenant(&tenant).await {
                let _ = self.delete(tenant_id);
                return Err(TenantError::Persistence(err));
            }
        }
        Ok(tenant)
    }

    /// Administrative tenant deletion: releases the bundle, then — if a
    /// persistence adapter is bound — removes the adapter's record too, so
    /// `store/graph/engine`, and the persisted row, are released together.
    pub async fn delete_tenant(&self, tenant_id: &str) -> Result<(), TenantError> {
        self.delete(tenant_id)?;
        if let Some(adapter) = self.persistence() {
            adapter.delete_tenant(tenant_id).await?;
        }
        Ok(())
    }

    /// Lists tenant records from the bound persistence adapter. Without an
    /// adapter bound, there is no tenant metadata (name/createdAt) to
    /// report — only the bundle-level ids `list_ids` already exposes.
    pub async fn list_tenants(&self) -> Result<Vec<Tenant>, TenantError> {
        match self.persistence() {
            Some(adapter) => Ok(adapter.list_tenants().await?),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
policies:
  - id: "policy1"
    resource: ["*"]
    action: ["*"]
    effect: "allow"
"#;

    #[test]
    fn bootstrap_creates_the_default_tenant() {
        let registry = Registry::bootstrap_default(PolicySource::Inline(DOC.to_string())).unwrap();
        assert!(registry.contains(DEFAULT_TENANT_ID));
        assert!(registry.get(DEFAULT_TENANT_ID).is_ok());
    }

    #[test]
    fn create_rejects_duplicate_tenant_ids() {
        let registry = Registry::new();
        registry.create("acme", PolicySource::Inline(DOC.to_string())).unwrap();
        let err = registry.create("acme", PolicySource::Inline(DOC.to_string())).unwrap_err();
        assert!(matches!(err, TenantError::Conflict(id) if id == "acme"));
    }

    #[test]
    fn get_on_unknown_tenant_is_not_found() {
        let registry = Registry::new();
        let err = registry.get("ghost").unwrap_err();
        assert!(matches!(err, TenantError::NotFound(id) if id == "ghost"));
    }

    #[test]
    fn delete_removes_the_tenant() {
        let registry = Registry::new();
        registry.create("acme", PolicySource::Inline(DOC.to_string())).unwrap();
        registry.delete("acme").unwrap();
        assert!(registry.get("acme").is_err());
    }

    #[test]
    fn delete_on_unknown_tenant_is_not_found() {
        let registry = Registry::new();
        let err = registry.delete("ghost").unwrap_err();
        assert!(matches!(err, TenantError::NotFound(id) if id == "ghost"));
    }

    #[test]
    fn tenants_do_not_share_store_or_graph_instances() {
        let registry = Registry::new();
        registry.create("a", PolicySource::Inline(DOC.to_string())).unwrap();
        registry.create("b", PolicySource::Inline(DOC.to_string())).unwrap();

        let a = registry.get("a").unwrap();
        let b = registry.get("b").unwrap();
        assert!(!Arc::ptr_eq(&a.store, &b.store));
        assert!(!Arc::ptr_eq(&a.graph, &b.graph));

        a.graph.add_relation("user:x", "group:g");
        assert!(a.graph.targets("user:x").contains(&"group:g".to_string()));
        assert!(b.graph.targets("user:x").is_empty());
    }

    #[test]
    fn list_ids_reflects_create_and_delete() {
        let registry = Registry::new();
        registry.create("a", PolicySource::Inline(DOC.to_string())).unwrap();
        registry.create("b", PolicySource::Inline(DOC.to_string())).unwrap();
        let mut ids = registry.list_ids();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);

        registry.delete("a").unwrap();
        assert_eq!(registry.list_ids(), vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn create_tenant_writes_through_to_the_bound_adapter() {
        let registry = Registry::new();
        let adapter: Arc<dyn PersistenceAdapter> = Arc::new(pdp_persistence::InMemoryAdapter::new());
        registry.set_persistence(adapter.clone());

        registry.create_tenant("acme", "Acme Corp", PolicySource::Inline(DOC.to_string())).await.unwrap();

        let tenants = registry.list_tenants().await.unwrap();
        assert_eq!(tenants.len(), 1);
        assert_eq!(tenants[0].id, "acme");
        assert_eq!(tenants[0].name, "Acme Corp");
    }

    #[tokio::test]
    async fn delete_tenant_removes_the_adapter_record_too() {
        let registry = Registry::new();
        let adapter: Arc<dyn PersistenceAdapter> = Arc::new(pdp_persistence::InMemoryAdapter::new());
        registry.set_persistence(adapter);

        registry.create_tenant("acme", "Acme Corp", PolicySource::Inline(DOC.to_string())).await.unwrap();
        registry.delete_tenant("acme").await.unwrap();

        assert!(registry.get("acme").is_err());
        assert!(registry.list_tenants().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_tenants_is_empty_without_a_bound_adapter() {
        let registry = Registry::new();
        registry.create("acme", PolicySource::Inline(DOC.to_string())).unwrap();
        assert!(registry.list_tenants().await.unwrap().is_empty());
    }
}
