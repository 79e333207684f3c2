//! Policy schema & validator (C1), in-memory policy store (C3), and the
//! condition/when-expression language (C4).

pub mod compiler;
pub mod condition;
pub mod schema;
pub mod store;
pub mod validate;

pub use compiler::{CompileError, HeuristicCompiler, RuleCompiler};
pub use schema::{Effect, Policy, RawDocument, Role, Subject, User};
pub use store::{PolicyError, PolicySource, Store, StoreSnapshot};
pub use validate::ValidationError;
