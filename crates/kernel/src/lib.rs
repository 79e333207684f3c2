//! Shared primitives for the policy decision service workspace.
//!
//! Leaf crate: every other workspace member depends on `kernel`, `kernel`
//! depends on nothing in the workspace.

pub mod clock;
pub mod ids;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ids::{NodeKind, qualify, unqualify};
