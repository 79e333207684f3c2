//! The persistence adapter port (spec §4.9): tenants, policy documents, and
//! graph edges behind one trait. Only `pdp-tenant` (C7) and `pdp-reload`
//! (C8) call this — never the evaluation path (C6).
//!
//! Grounded on `pkg/store/store.go`'s `Store` interface and its
//! `MemoryStore` implementation in `pkg/store/memory.go`.

pub mod memory;
pub mod surreal;

pub use memory::InMemoryAdapter;
pub use surreal::SurrealAdapter;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pdp_policy::Policy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("tenant not found: {0}")]
    TenantNotFound(String),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Mirrors the original's `tenant.Tenant` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One graph edge as persisted, mirroring `pkg/store/store.go`'s `Edge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub src: String,
    pub dst: String,
}

/// The storage port. Implementations serialize each policy as an opaque
/// document keyed by `(tenant_id, policy_id)`, and edges as
/// `(tenant_id, src, dst)` with set semantics — spec §4.9.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    async fn save_tenant(&self, tenant: &Tenant) -> Result<(), PersistenceError>;
    async fn load_tenant(&self, id: &str) -> Result<Tenant, PersistenceError>;
    async fn list_tenants(&self) -> Result<Vec<Tenant>, PersistenceError>;
    async fn delete_tenant(&self, id: &str) -> Result<(), PersistenceError>;

    async fn save_policy(&self, tenant_id: &str, policy: &Policy) -> Result<(), PersistenceError>;
    async fn load_policies(&self, tenant_id: &str) -> Result<Vec<Policy>, PersistenceError>;
    async fn clear_policies(&self, tenant_id: &str) -> Result<(), PersistenceError>;

    async fn save_edge(&self, tenant_id: &str, src: &str, dst: &str) -> Result<(), PersistenceError>;
    async fn load_edges(&self, tenant_id: &str) -> Result<Vec<Edge>, PersistenceError>;
    async fn clear_edges(&self, tenant_id: &str) -> Result<(), PersistenceError>;
}
