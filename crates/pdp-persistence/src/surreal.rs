//! SurrealDB-backed adapter. Defaults to the embedded `kv-mem` engine (the
//! teacher's `mem` feature), matching the teacher's
//! `Surreal::new::<Mem>(())` test pattern in
//! `hodei-organizations/src/features/create_account/surreal_adapter.rs`.
//! A remote `ws://`/`wss://` endpoint is reached the same way, selected by
//! the `storeDSN` configuration option (spec §6).

use crate::{Edge, PersistenceAdapter, PersistenceError, Tenant};
use async_trait::async_trait;
use pdp_policy::Policy;
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

/// A policy document as persisted: the policy id plus its full record,
/// wrapped so SurrealDB's generated `id` field doesn't collide with our own.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PolicyRecord {
    tenant_id: String,
    policy: Policy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EdgeRecord {
    tenant_id: String,
    src: String,
    dst: String,
}

pub struct SurrealAdapter {
    db: Surreal<Any>,
}

impl SurrealAdapter {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    /// Connects to the embedded in-process engine (`storeBackend = "db"`
    /// with no `storeDSN`). Requires the `mem` feature.
    pub async fn connect_embedded() -> Result<Self, PersistenceError> {
        let db = surrealdb::engine::any::connect("mem://")
            .await
            .map_err(|e| PersistenceError::Backend(e.to_string()))?;
        db.use_ns("pdp").use_db("pdp").await.map_err(|e| PersistenceError::Backend(e.to_string()))?;
        Ok(Self::new(db))
    }

    /// Connects to a remote SurrealDB instance at `dsn` (`ws://` / `wss://`).
    pub async fn connect(dsn: &str) -> Result<Self, PersistenceError> {
        let db = surrealdb::engine::any::connect(dsn)
            .await
            .map_err(|e| PersistenceError::Backend(e.to_string()))?;
        db.use_ns("pdp").use_db("pdp").await.map_err(|e| PersistenceError::Backend(e.to_string()))?;
        Ok(Self::new(db))
    }

    fn policy_key(tenant_id: &str, policy_id: &str) -> String {
        format!("{tenant_id}:{policy_id}")
    }

    fn edge_key(tenant_id: &str, src: &str, dst: &str) -> String {
        format!("{tenant_id}:{src}:{dst}")
    }
}

#[async_trait]
impl PersistenceAdapter for SurrealAdapter {
    async fn save_tenant(&self, tenant: &Tenant) -> Result<(), PersistenceError> {
        let _: Option<Tenant> = self
            .db
            .upsert(("tenant", tenant.id.as_str()))
            .content(tenant.clone())
            .await
            .map_err(|e| PersistenceError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn load_tenant(&self, id: &str) -> Result<Tenant, PersistenceError> {
        let found: Option<Tenant> = self
            .db
            .select(("tenant", id))
            .await
            .map_err(|e| PersistenceError::Backend(e.to_string()))?;
        found.ok_or_else(|| PersistenceError::TenantNotFound(id.to_string()))
    }

    async fn list_tenants(&self) -> Result<Vec<Tenant>, PersistenceError> {
        self.db.select("tenant").await.map_err(|e| PersistenceError::Backend(e.to_string()))
    }

    async fn delete_tenant(&self, id: &str) -> Result<(), PersistenceError> {
        let _: Option<Tenant> = self
            .db
            .delete(("tenant", id))
            .await
            .map_err(|e| PersistenceError::Backend(e.to_string()))?;
        self.clear_policies(id).await?;
        self.clear_edges(id).await?;
        Ok(())
    }

    async fn save_policy(&self, tenant_id: &str, policy: &Policy) -> Result<(), PersistenceError> {
        let key = Self::policy_key(tenant_id, &policy.id);
        let record = PolicyRecord { tenant_id: tenant_id.to_string(), policy: policy.clone() };
        let _: Option<PolicyRecord> = self
            .db
            .upsert(("policy", key))
            .content(record)
            .await
            .map_err(|e| PersistenceError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn load_policies(&self, tenant_id: &str) -> Result<Vec<Policy>, PersistenceError> {
        let records: Vec<PolicyRecord> =
            self.db.select("policy").await.map_err(|e| PersistenceError::Backend(e.to_string()))?;
        Ok(records.into_iter().filter(|r| r.tenant_id == tenant_id).map(|r| r.policy).collect())
    }

    async fn clear_policies(&self, tenant_id: &str) -> Result<(), PersistenceError> {
        let records: Vec<PolicyRecord> =
            self.db.select("policy").await.map_err(|e| PersistenceError::Backend(e.to_string()))?;
        for record in records.into_iter().filter(|r| r.tenant_id == tenant_id) {
            let key = Self::policy_key(tenant_id, &record.policy.id);
            let _: Option<PolicyRecord> = self
                .db
                .delete(("policy", key))
                .await
                .map_err(|e| PersistenceError::Backend(e.to_string()))?;
        }
        Ok(())
    }

    async fn save_edge(&self, tenant_id: &str, src: &str, dst: &str) -> Result<(), PersistenceError> {
        let key = Self::edge_key(tenant_id, src, dst);
        let record = EdgeRecord { tenant_id: tenant_id.to_string(), src: src.to_string(), dst: dst.to_string() };
        let _: Option<EdgeRecord> = self
            .db
            .upsert(("edge", key))
            .content(record)
            .await
            .map_err(|e| PersistenceError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn load_edges(&self, tenant_id: &str) -> Result<Vec<Edge>, PersistenceError> {
        let records: Vec<EdgeRecord> =
            self.db.select("edge").await.map_err(|e| PersistenceError::Backend(e.to_string()))?;
        Ok(records
            .into_iter()
            .filter(|r| r.tenant_id == tenant_id)
            .map(|r| Edge { src: r.src, dst: r.dst })
            .collect())
    }

    async fn clear_edges(&self, tenant_id: &str) -> Result<(), PersistenceError> {
        let records: Vec<EdgeRecord> =
            self.db.select("edge").await.map_err(|e| PersistenceError::Backend(e.to_string()))?;
        for record in records.into_iter().filter(|r| r.tenant_id == tenant_id) {
            let key = Self::edge_key(tenant_id, &record.src, &record.dst);
            let _: Option<EdgeRecord> = self
                .db
                .delete(("edge", key))
                .await
                .map_err(|e| PersistenceError::Backend(e.to_string()))?;
        }
        Ok(())
    }
}
