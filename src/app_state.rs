//! Application state: the composition root's output, cloned into every
//! axum handler. Holds only the registry, the reload coordinator, the
//! policy compiler, and the context chain — no concrete adapters leak past
//! this boundary (spec §9's "no global state" resolution).

use pdp_context::Chain;
use pdp_policy::RuleCompiler;
use pdp_reload::Coordinator;
use pdp_tenant::Registry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub reload: Arc<Coordinator>,
    pub compiler: Arc<dyn RuleCompiler>,
    pub context_chain: Arc<Chain>,
}
