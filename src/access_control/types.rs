//! Access control types
//!
//! Core types used by the access policy evaluator.

use serde::Serialize;
use std::fmt;

/// One of the three factors of the access policy, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// The item lies within the principal's span of control
    Scope,
    /// The principal belongs to a department associated with the item
    Department,
    /// The principal holds every role the item requires
    Roles,
}

impl Predicate {
    /// Get the predicate name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Predicate::Scope => "scope",
            Predicate::Department => "department",
            Predicate::Roles => "roles",
        }
    }

    /// All predicates, in the order they are evaluated
    pub fn all() -> &'static [Predicate] {
        &[Predicate::Scope, Predicate::Department, Predicate::Roles]
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a predicate did not hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialCause {
    /// The predicate was evaluated and returned false
    Refused,
    /// The predicate could not be evaluated (fails closed)
    LookupFailed(String),
}

/// The first predicate that failed, and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenialReason {
    pub predicate: Predicate,
    pub cause: DenialCause,
}

impl DenialReason {
    pub fn refused(predicate: Predicate) -> Self {
        Self {
            predicate,
            cause: DenialCause::Refused,
        }
    }

    pub fn lookup_failed(predicate: Predicate, detail: impl Into<String>) -> Self {
        Self {
            predicate,
            cause: DenialCause::LookupFailed(detail.into()),
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            DenialCause::Refused => write!(f, "{} check failed", self.predicate),
            DenialCause::LookupFailed(detail) => {
                write!(f, "{} check could not be evaluated: {}", self.predicate, detail)
            }
        }
    }
}

/// Result of an access policy evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    Granted,
    Denied(DenialReason),
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, AccessDecision::Denied(_))
    }

    /// The failing predicate, if denied
    pub fn denied_by(&self) -> Option<Predicate> {
        match self {
            AccessDecision::Granted => None,
            AccessDecision::Denied(reason) => Some(reason.predicate),
        }
    }
}
