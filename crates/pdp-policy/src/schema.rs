//! The policy document's data model (spec §3) and its raw, wire-level
//! counterpart (spec §4.2, §6). `RawDocument` is what `serde_yaml` parses;
//! `Catalog`'s maps (see `store.rs`) are built from a validated `RawDocument`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A role groups a set of policy references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Role {
    pub name: String,
    /// Policy ids granted by this role, in declaration order. The wire key
    /// is `policies` (matching the original document format); the field is
    /// named after what it holds per spec §3 (`policyIDs`).
    #[serde(default, rename = "policies")]
    pub policy_ids: Vec<String>,
}

/// A subject identity within a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// One entry of `policy.subjects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Subject {
    pub role: String,
}

/// The outcome a matched policy attaches to a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

/// A single access-control rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Policy {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    /// Wire key is `resource` (singular, matching the original document
    /// format) even though it carries an ordered list of strings.
    #[serde(default, rename = "resource")]
    pub resources: Vec<String>,
    #[serde(default, rename = "action")]
    pub actions: Vec<String>,
    pub effect: Effect,
    #[serde(default)]
    pub conditions: HashMap<String, String>,
    #[serde(default)]
    pub when: Vec<String>,
}

impl Policy {
    /// `polResource == "*"` or `polResource == resource` (direct match branch
    /// of spec §4.6 step 3e). Graph-based group expansion happens one layer
    /// up, in the engine, since it needs a `Graph` handle this type doesn't have.
    pub fn resource_directly_matches(&self, resource: &str) -> bool {
        self.resources.iter().any(|r| r == "*" || r == resource)
    }

    /// spec §4.6 step 3f.
    pub fn action_matches(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == "*" || a == action)
    }

    /// spec §4.6 step 3d: non-empty `subjects` must name the current role.
    pub fn subject_filter_passes(&self, role: &str) -> bool {
        self.subjects.is_empty() || self.subjects.iter().any(|s| s.role == role)
    }
}

/// The parsed-but-not-yet-validated shape of a policy document: the three
/// top-level keys `roles`, `users`, `policies`, nothing else.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDocument {
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub policies: Vec<Policy>,
}

impl RawDocument {
    /// Strict parse: unknown keys anywhere in the document reject it,
    /// enforced by `#[serde(deny_unknown_fields)]` on every nested struct.
    pub fn parse(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}
