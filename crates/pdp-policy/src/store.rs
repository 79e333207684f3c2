//! In-memory per-tenant catalog of roles, users, and policies with atomic
//! reload (spec §4.3).
//!
//! Swap protocol: parsing and validation happen entirely outside the lock;
//! the write lock's critical section is the pointer swap only. Evaluators
//! hold the read lock for the duration of one evaluation so they observe a
//! single consistent `(roles, users, policies)` snapshot, never a partial mix.

use crate::schema::{Policy, RawDocument, Role, User};
use crate::validate::{ValidationError, validate};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy source: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse policy document: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("policy document failed validation: {0}")]
    Validation(#[from] ValidationError),
}

/// Where a tenant's policy document comes from. Unifies the file-reload path
/// (§4.8 file mode) and tests / inline admin calls under one `load` entry
/// point.
#[derive(Debug, Clone)]
pub enum PolicySource {
    File(PathBuf),
    Inline(String),
}

impl PolicySource {
    fn read(&self) -> Result<String, PolicyError> {
        match self {
            PolicySource::File(path) => Ok(std::fs::read_to_string(path)?),
            PolicySource::Inline(text) => Ok(text.clone()),
        }
    }
}

#[derive(Debug, Default, Clone)]
struct Catalog {
    roles: HashMap<String, Role>,
    users: HashMap<String, User>,
    policies: HashMap<String, Policy>,
}

/// The store's holding: `{policies, roles, users}` keyed by id/name/username.
#[derive(Debug, Default)]
pub struct Store {
    catalog: RwLock<Catalog>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            catalog: RwLock::new(Catalog::default()),
        }
    }

    /// Reads, strictly parses, and validates `source`, then swaps the result
    /// into place. On any error the prior state is untouched.
    pub fn load(&self, source: &PolicySource) -> Result<(), PolicyError> {
        let text = source.read()?;
        let doc = RawDocument::parse(&text)?;
        validate(&doc)?;

        let roles = doc.roles.iter().map(|r| (r.name.clone(), r.clone())).collect();
        let users = doc.users.iter().map(|u| (u.username.clone(), u.clone())).collect();
        let policies = doc.policies.iter().map(|p| (p.id.clone(), p.clone())).collect();

        let mut catalog = self.catalog.write().expect("store lock poisoned");
        *catalog = Catalog { roles, users, policies };
        Ok(())
    }

    /// Swaps only the policy map, leaving roles/users untouched. Used by the
    /// store-backed reload path (§4.8 store mode), which only ever pulls
    /// policies from the persistence adapter.
    pub fn replace_policies(&self, policies: Vec<Policy>) {
        let policies = policies.into_iter().map(|p| (p.id.clone(), p)).collect();
        let mut catalog = self.catalog.write().expect("store lock poisoned");
        catalog.policies = policies;
    }

    pub fn get_policy(&self, id: &str) -> Option<Policy> {
        self.catalog.read().expect("store lock poisoned").policies.get(id).cloned()
    }

    pub fn get_role(&self, name: &str) -> Option<Role> {
        self.catalog.read().expect("store lock poisoned").roles.get(name).cloned()
    }

    pub fn get_user(&self, username: &str) -> Option<User> {
        self.catalog.read().expect("store lock poisoned").users.get(username).cloned()
    }

    /// A consistent snapshot of all three maps, for callers (the engine)
    /// that need to read more than one entry under one lock acquisition.
    pub fn snapshot(&self) -> StoreSnapshot {
        let catalog = self.catalog.read().expect("store lock poisoned");
        StoreSnapshot {
            roles: catalog.roles.clone(),
            users: catalog.users.clone(),
            policies: catalog.policies.clone(),
        }
    }
}

/// An owned, point-in-time copy of the store's three maps.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub roles: HashMap<String, Role>,
    pub users: HashMap<String, User>,
    pub policies: HashMap<String, Policy>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY_DOC: &str = r#"
roles:
  - name: "admin"
    policies: ["policy1"]
users:
  - username: "alice"
    roles: ["admin"]
policies:
  - id: "policy1"
    subjects:
      - role: "admin"
    resource: ["file1"]
    action: ["read"]
    effect: "deny"
"#;

    #[test]
    fn load_populates_all_three_maps() {
        let store = Store::new();
        store.load(&PolicySource::Inline(POLICY_DOC.to_string())).unwrap();
        assert!(store.get_role("admin").is_some());
        assert!(store.get_user("alice").is_some());
        assert!(store.get_policy("policy1").is_some());
    }

    #[test]
    fn reload_swaps_atomically() {
        let store = Store::new();
        store.load(&PolicySource::Inline(POLICY_DOC.to_string())).unwrap();
        assert_eq!(store.get_policy("policy1").unwrap().effect, crate::schema::Effect::Deny);

        let updated = POLICY_DOC.replace("deny", "allow");
        store.load(&PolicySource::Inline(updated)).unwrap();
        assert_eq!(store.get_policy("policy1").unwrap().effect, crate::schema::Effect::Allow);
    }

    #[test]
    fn failed_reload_leaves_prior_state_intact() {
        let store = Store::new();
        store.load(&PolicySource::Inline(POLICY_DOC.to_string())).unwrap();

        let broken = "roles: []\npolicies:\n  - id: \"\"\n    resource: [\"*\"]\n    action: [\"read\"]\n    effect: \"allow\"\n";
        assert!(store.load(&PolicySource::Inline(broken.to_string())).is_err());

        // Pre-reload state for every id is untouched.
        assert!(store.get_policy("policy1").is_some());
        assert!(store.get_user("alice").is_some());
    }

    #[test]
    fn replace_policies_leaves_roles_and_users_untouched() {
        let store = Store::new();
        store.load(&PolicySource::Inline(POLICY_DOC.to_string())).unwrap();

        let mut new_policy = store.get_policy("policy1").unwrap();
        new_policy.effect = crate::schema::Effect::Allow;
        store.replace_policies(vec![new_policy]);

        assert_eq!(store.get_policy("policy1").unwrap().effect, crate::schema::Effect::Allow);
        assert!(store.get_role("admin").is_some());
        assert!(store.get_user("alice").is_some());
    }

    #[test]
    fn idempotent_reload_yields_identical_results() {
        let store = Store::new();
        store.load(&PolicySource::Inline(POLICY_DOC.to_string())).unwrap();
        let before = store.snapshot();
        store.load(&PolicySource::Inline(POLICY_DOC.to_string())).unwrap();
        let after = store.snapshot();
        assert_eq!(before.policies.keys().collect::<Vec<_>>(), after.policies.keys().collect::<Vec<_>>());
    }
}
