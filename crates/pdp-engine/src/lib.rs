//! The policy decision algorithm (spec §4.6) — subject expansion, resource
//! expansion, matching under wildcard semantics, condition evaluation,
//! delegation attribution, and tie-breaking.
//!
//! Grounded on `pkg/policy/policy_engine_test.go` (the behavioural ground
//! truth for every branch below — `policy_engine.go` itself in
//! `original_source/` is a stale, pre-graph stub superseded by these tests).

pub mod decision;

pub use decision::Decision;

use kernel::{Clock, NodeKind, SystemClock, qualify};
use pdp_graph::Graph;
use pdp_policy::Store;
use pdp_policy::schema::Effect;
use std::collections::HashMap;

/// The inputs to one evaluation.
#[derive(Debug, Clone)]
pub struct EvalRequest {
    pub subject: String,
    pub resource: String,
    pub action: String,
    pub env: HashMap<String, String>,
}

/// Binds a `Store` and `Graph` snapshot pair to the decision algorithm. One
/// `Engine` is owned per tenant (see `pdp-tenant`).
pub struct Engine {
    store: std::sync::Arc<Store>,
    graph: std::sync::Arc<Graph>,
    clock: Box<dyn Clock>,
}

impl Engine {
    pub fn new(store: std::sync::Arc<Store>, graph: std::sync::Arc<Graph>) -> Self {
        Self { store, graph, clock: Box::new(SystemClock) }
    }

    pub fn with_clock(store: std::sync::Arc<Store>, graph: std::sync::Arc<Graph>, clock: Box<dyn Clock>) -> Self {
        Self { store, graph, clock }
    }

    /// Runs spec §4.6 steps 1–4 against a single, consistent store snapshot.
    pub fn evaluate(&self, req: &EvalRequest) -> Decision {
        // Step 1 — build the evaluation context.
        let mut context = req.env.clone();
        context.insert("subject".to_string(), req.subject.clone());
        context.insert("resource".to_string(), req.resource.clone());
        context.insert("action".to_string(), req.action.clone());

        let snapshot = self.store.snapshot();

        // Step 2 — build the subject candidate list via BFS over user->user edges.
        let candidates = self.expand_subjects(&req.subject);

        // Step 3 — iterate candidates in discovery order.
        for (idx, candidate) in candidates.iter().enumerate() {
            let is_original = idx == 0;

            let Some(user) = snapshot.users.get(candidate) else {
                if is_original {
                    return Decision::user_not_found(context);
                }
                continue;
            };

            // 3b. compose the candidate's role list.
            let mut roles: Vec<String> = user.roles.clone();
            let group_prefix = qualify(NodeKind::Group, "");
            for target in self.graph.targets(&qualify(NodeKind::User, candidate)) {
                if let Some(group) = target.strip_prefix(&group_prefix) {
                    roles.push(group.to_string());
                }
            }

            for role_name in &roles {
                let Some(role) = snapshot.roles.get(role_name) else { continue };

                for policy_id in &role.policy_ids {
                    let Some(policy) = snapshot.policies.get(policy_id) else { continue };

                    // 3d. subject filter.
                    if !policy.subject_filter_passes(role_name) {
                        continue;
                    }

                    // 3e. resource match (direct or via group expansion).
                    let resource_matches = policy.resource_directly_matches(&req.resource)
                        || policy.resources.iter().any(|pol_resource| {
                            self.graph.has_path(
                                &qualify(NodeKind::Group, pol_resource),
                                &qualify(NodeKind::Resource, &req.resource),
                            )
                        });
                    if !resource_matches {
                        continue;
                    }

                    // 3f. action match.
                    if !policy.action_matches(&req.action) {
                        continue;
                    }

                    // 3g. first matching (resource, action) pair halts evaluation.
                    let delegator = if is_original { None } else { Some(candidate.clone()) };

                    let conditions_hold = pdp_policy::condition::evaluate_conditions(
                        &policy.conditions,
                        &req.env,
                        self.clock.as_ref(),
                    );
                    let when_holds = pdp_policy::condition::evaluate_when(&policy.when, &req.env);

                    if !conditions_hold || !when_holds {
                        return Decision::conditions_not_satisfied(policy.id.clone(), context);
                    }

                    return match policy.effect {
                        Effect::Allow => Decision::allowed(policy.id.clone(), context, delegator),
                        Effect::Deny => Decision::denied(policy.id.clone(), context, delegator),
                    };
                }
            }
        }

        // Step 4 — exhaustion.
        Decision::no_matching_policy(context)
    }

    /// spec §4.6 step 2: BFS from `user:subject` following only edges whose
    /// target is prefixed `user:`, preserving discovery order. The original
    /// subject is always first.
    fn expand_subjects(&self, subject: &str) -> Vec<String> {
        let mut discovered = vec![subject.to_string()];
        let mut visited: std::collections::HashSet<String> = std::collections::HashSet::new();
        visited.insert(qualify(NodeKind::User, subject));

        let mut queue: std::collections::VecDeque<String> =
            std::collections::VecDeque::from([qualify(NodeKind::User, subject)]);

        let user_prefix = qualify(NodeKind::User, "");
        while let Some(node) = queue.pop_front() {
            for target in self.graph.targets(&node) {
                if target.starts_with(&user_prefix) && visited.insert(target.clone()) {
                    if let Some(name) = target.strip_prefix(&user_prefix) {
                        discovered.push(name.to_string());
                    }
                    queue.push_back(target);
                }
            }
        }
        discovered
    }
}
