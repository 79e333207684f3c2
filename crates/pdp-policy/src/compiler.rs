//! Natural-language-to-policy compilation is named opaque/external in spec
//! §1 ("a transformer"). `RuleCompiler` is the trait seam for it; the one
//! concrete implementation shipped here is a heuristic fallback parser,
//! grounded on `pkg/policycompiler/compiler.go`'s local parser (the same
//! file's real NL path is a call to an external LLM API, which this crate
//! does not reproduce).

use crate::schema::{Effect, Policy, Subject};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("unsupported rule format, expected '<subject> can <action> <resource>'")]
    UnsupportedFormat,
}

pub trait RuleCompiler: Send + Sync {
    /// Translates a natural-language rule into a YAML policy fragment.
    fn compile(&self, rule: &str) -> Result<String, CompileError>;
}

/// Parses the fixed pattern `"<subject> can <action> <resource>"` into a
/// single-policy YAML document. Used when no richer NL backend is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicCompiler;

impl RuleCompiler for HeuristicCompiler {
    fn compile(&self, rule: &str) -> Result<String, CompileError> {
        let lower = rule.to_lowercase();
        let idx = lower.find(" can ").ok_or(CompileError::UnsupportedFormat)?;
        let subject = rule[..idx].trim().to_string();
        let rest = rule[idx + " can ".len()..].trim();
        let mut parts = rest.splitn(2, ' ');
        let action = parts.next().ok_or(CompileError::UnsupportedFormat)?.to_string();
        let resource = parts.next().unwrap_or("").trim().to_string();

        let policy = Policy {
            id: String::new(),
            description: None,
            subjects: vec![Subject { role: subject }],
            resources: vec![resource],
            actions: vec![action],
            effect: Effect::Allow,
            conditions: Default::default(),
            when: Vec::new(),
        };
        serde_yaml::to_string(&policy).map_err(|_| CompileError::UnsupportedFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_simple_rule() {
        let out = HeuristicCompiler.compile("editor can write report").unwrap();
        assert!(out.contains("role: editor"));
        assert!(out.contains("write"));
        assert!(out.contains("report"));
    }

    #[test]
    fn rejects_unsupported_format() {
        assert_eq!(
            HeuristicCompiler.compile("nonsense"),
            Err(CompileError::UnsupportedFormat)
        );
    }
}
