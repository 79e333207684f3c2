//! Static validation of a parsed policy document (spec §4.2).
//!
//! All rules are fatal: the first violation found aborts validation and is
//! returned verbatim to the caller. Partial loads are forbidden — a document
//! that fails validation never reaches the store (see `store.rs::Store::load`).

use crate::schema::RawDocument;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("policy id is required")]
    MissingPolicyId,
    #[error("duplicate policy id: {0}")]
    DuplicatePolicyId(String),
    #[error("policy {0} must have at least one action")]
    MissingAction(String),
    #[error("policy {0} must have at least one resource")]
    MissingResource(String),
    #[error("policy {0} has subject with empty role")]
    EmptySubjectRole(String),
    #[error("policy {0} references undefined role {1}")]
    UndefinedRole(String, String),
}

/// Runs rules 2–4 of spec §4.2 in the order listed there, short-circuiting
/// on the first violation (rule 1, the strict parse, is enforced earlier by
/// `RawDocument::parse`'s `deny_unknown_fields`).
pub fn validate(doc: &RawDocument) -> Result<(), ValidationError> {
    let role_names: HashSet<&str> = doc.roles.iter().map(|r| r.name.as_str()).collect();
    let mut seen_ids: HashSet<&str> = HashSet::new();

    for policy in &doc.policies {
        if policy.id.is_empty() {
            return Err(ValidationError::MissingPolicyId);
        }
        if !seen_ids.insert(policy.id.as_str()) {
            return Err(ValidationError::DuplicatePolicyId(policy.id.clone()));
        }
        if policy.actions.is_empty() {
            return Err(ValidationError::MissingAction(policy.id.clone()));
        }
        if policy.resources.is_empty() {
            return Err(ValidationError::MissingResource(policy.id.clone()));
        }
        for subject in &policy.subjects {
            if subject.role.is_empty() {
                return Err(ValidationError::EmptySubjectRole(policy.id.clone()));
            }
            if !role_names.contains(subject.role.as_str()) {
                return Err(ValidationError::UndefinedRole(
                    policy.id.clone(),
                    subject.role.clone(),
                ));
            }
        }
    }
    Ok(())
}
