use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// The outcome of one evaluation (spec §3). `reason` is always one of the
/// fixed set in spec §7: `user not found`, `allowed by policy`, `denied by
/// policy`, `conditions not satisfied`, `no matching policy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Decision {
    pub allow: bool,
    #[serde(rename = "policyID", skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
    pub reason: String,
    pub context: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegator: Option<String>,
}

impl Decision {
    pub fn user_not_found(context: HashMap<String, String>) -> Self {
        Self {
            allow: false,
            policy_id: None,
            reason: "user not found".to_string(),
            context,
            delegator: None,
        }
    }

    pub fn no_matching_policy(context: HashMap<String, String>) -> Self {
        Self {
            allow: false,
            policy_id: None,
            reason: "no matching policy".to_string(),
            context,
            delegator: None,
        }
    }

    pub fn conditions_not_satisfied(policy_id: String, context: HashMap<String, String>) -> Self {
        Self {
            allow: false,
            policy_id: Some(policy_id),
            reason: "conditions not satisfied".to_string(),
            context,
            delegator: None,
        }
    }

    pub fn allowed(policy_id: String, context: HashMap<String, String>, delegator: Option<String>) -> Self {
        Self {
            allow: true,
            policy_id: Some(policy_id),
            reason: "allowed by policy".to_string(),
            context,
            delegator,
        }
    }

    pub fn denied(policy_id: String, context: HashMap<String, String>, delegator: Option<String>) -> Self {
        Self {
            allow: false,
            policy_id: Some(policy_id),
            reason: "denied by policy".to_string(),
            context,
            delegator,
        }
    }
}
