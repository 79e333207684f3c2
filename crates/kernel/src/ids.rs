//! Qualified node identifiers used by the relationship graph (`kind:name`).

use std::fmt;

/// The three kinds of node the relationship graph relates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    User,
    Group,
    Resource,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::User => "user",
            NodeKind::Group => "group",
            NodeKind::Resource => "resource",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a qualified node id of the form `kind:name`.
pub fn qualify(kind: NodeKind, name: &str) -> String {
    format!("{kind}:{name}")
}

/// Splits a qualified node id back into its kind and name, if it is well formed.
pub fn unqualify(node: &str) -> Option<(NodeKind, &str)> {
    let (kind, name) = node.split_once(':')?;
    let kind = match kind {
        "user" => NodeKind::User,
        "group" => NodeKind::Group,
        "resource" => NodeKind::Resource,
        _ => return None,
    };
    Some((kind, name))
}
