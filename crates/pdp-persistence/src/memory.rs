//! In-memory adapter, translated 1:1 from `pkg/store/memory.go`'s
//! `MemoryStore`: three nested maps guarded by one `RwLock`.

use crate::{Edge, PersistenceAdapter, PersistenceError, Tenant};
use async_trait::async_trait;
use pdp_policy::Policy;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

#[derive(Default)]
struct State {
    tenants: HashMap<String, Tenant>,
    policies: HashMap<String, HashMap<String, Policy>>,
    edges: HashMap<String, HashMap<String, HashSet<String>>>,
}

/// `RwLock`-guarded `HashMap`s, the default backend.
#[derive(Default)]
pub struct InMemoryAdapter {
    state: RwLock<State>,
}

impl InMemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistenceAdapter for InMemoryAdapter {
    async fn save_tenant(&self, tenant: &Tenant) -> Result<(), PersistenceError> {
        let mut state = self.state.write().expect("persistence lock poisoned");
        state.tenants.insert(tenant.id.clone(), tenant.clone());
        Ok(())
    }

    async fn load_tenant(&self, id: &str) -> Result<Tenant, PersistenceError> {
        let state = self.state.read().expect("persistence lock poisoned");
        state.tenants.get(id).cloned().ok_or_else(|| PersistenceError::TenantNotFound(id.to_string()))
    }

    async fn list_tenants(&self) -> Result<Vec<Tenant>, PersistenceError> {
        let state = self.state.read().expect("persistence lock poisoned");
        Ok(state.tenants.values().cloned().collect())
    }

    async fn delete_tenant(&self, id: &str) -> Result<(), PersistenceError> {
        let mut state = self.state.write().expect("persistence lock poisoned");
        state.tenants.remove(id);
        state.policies.remove(id);
        state.edges.remove(id);
        Ok(())
    }

    async fn save_policy(&self, tenant_id: &str, policy: &Policy) -> Result<(), PersistenceError> {
        let mut state = self.state.write().expect("persistence lock poisoned");
        state
            .policies
            .entry(tenant_id.to_string())
            .or_default()
            .insert(policy.id.clone(), policy.clone());
        Ok(())
    }

    async fn load_policies(&self, tenant_id: &str) -> Result<Vec<Policy>, PersistenceError> {
        let state = self.state.read().expect("persistence lock poisoned");
        Ok(state.policies.get(tenant_id).map(|m| m.values().cloned().collect()).unwrap_or_default())
    }

    async fn clear_policies(&self, tenant_id: &str) -> Result<(), PersistenceError> {
        let mut state = self.state.write().expect("persistence lock poisoned");
        state.policies.remove(tenant_id);
        Ok(())
    }

    async fn save_edge(&self, tenant_id: &str, src: &str, dst: &str) -> Result<(), PersistenceError> {
        let mut state = self.state.write().expect("persistence lock poisoned");
        state
            .edges
            .entry(tenant_id.to_string())
            .or_default()
            .entry(src.to_string())
            .or_default()
            .insert(dst.to_string());
        Ok(())
    }

    async fn load_edges(&self, tenant_id: &str) -> Result<Vec<Edge>, PersistenceError> {
        let state = self.state.read().expect("persistence lock poisoned");
        let mut out = Vec::new();
        if let Some(tenant_edges) = state.edges.get(tenant_id) {
            for (src, targets) in tenant_edges {
                for dst in targets {
                    out.push(Edge { src: src.clone(), dst: dst.clone() });
                }
            }
        }
        Ok(out)
    }

    async fn clear_edges(&self, tenant_id: &str) -> Result<(), PersistenceError> {
        let mut state = self.state.write().expect("persistence lock poisoned");
        state.edges.remove(tenant_id);
        Ok(())
    }
}
