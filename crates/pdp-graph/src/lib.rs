//! Directed, labelled adjacency over qualified node identifiers
//! (`user:alice`, `group:admins`, `resource:file1`, ...).
//!
//! The graph backs two things in the policy engine: subject expansion
//! (user-to-user delegation edges) and resource-group expansion (group-to-
//! resource edges). It knows nothing about policies; it only answers
//! reachability and adjacency questions.
//!
//! Concurrency: a single `RwLock` guards the adjacency map. `AddRelation`
//! takes the write lock only for the insert; `Targets`, `HasPath`, and
//! `List` take the read lock for their duration. `HasPath` never blocks on
//! a concurrent `AddRelation` beyond the ordinary reader/writer wait — it
//! does not hold the lock across any callback into caller code.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::RwLock;

/// In-memory directed graph, safe for concurrent readers and a single writer.
#[derive(Debug, Default)]
pub struct Graph {
    edges: RwLock<HashMap<String, HashSet<String>>>,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            edges: RwLock::new(HashMap::new()),
        }
    }

    /// Idempotent insertion of a directed edge `src -> dst`.
    pub fn add_relation(&self, src: impl Into<String>, dst: impl Into<String>) {
        let mut edges = self.edges.write().expect("graph lock poisoned");
        edges.entry(src.into()).or_default().insert(dst.into());
    }

    /// Direct successors of `src`. Empty if `src` has no outgoing edges.
    pub fn targets(&self, src: &str) -> Vec<String> {
        let edges = self.edges.read().expect("graph lock poisoned");
        edges
            .get(src)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Breadth-first reachability with cycle-safe visited tracking.
    /// `src == dst` is always reachable, even with no edges at all.
    pub fn has_path(&self, src: &str, dst: &str) -> bool {
        if src == dst {
            return true;
        }
        let edges = self.edges.read().expect("graph lock poisoned");
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(src);
        while let Some(node) = queue.pop_front() {
            if node == dst {
                return true;
            }
            if !visited.insert(node) {
                continue;
            }
            if let Some(targets) = edges.get(node) {
                for t in targets {
                    if !visited.contains(t.as_str()) {
                        queue.push_back(t.as_str());
                    }
                }
            }
        }
        false
    }

    /// Snapshot copy of the full adjacency map.
    pub fn list(&self) -> HashMap<String, Vec<String>> {
        let edges = self.edges.read().expect("graph lock poisoned");
        edges
            .iter()
            .map(|(src, targets)| (src.clone(), targets.iter().cloned().collect()))
            .collect()
    }
}
