//! Audit log data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grant::AccessQuery;

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessDecision {
    /// The request may proceed
    Allowed,
    /// The request must be rejected
    Denied,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }
}

impl From<bool> for AccessDecision {
    fn from(allowed: bool) -> Self {
        if allowed {
            AccessDecision::Allowed
        } else {
            AccessDecision::Denied
        }
    }
}

impl std::fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessDecision::Allowed => write!(f, "allowed"),
            AccessDecision::Denied => write!(f, "denied"),
        }
    }
}

/// Entry in the access audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessAuditEntry {
    /// Unique identifier for this log entry
    pub id: String,
    /// Timestamp of the check
    pub timestamp: DateTime<Utc>,
    /// User whose access was checked
    pub user_id: String,
    pub page: String,
    pub action: String,
    pub outcome: AccessDecision,
    /// Whether the decision came from a super-admin grant
    pub super_admin: bool,
}

impl AccessAuditEntry {
    /// Create a new audit log entry
    pub fn new(user_id: impl Into<String>, query: &AccessQuery, outcome: AccessDecision) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            user_id: user_id.into(),
            page: query.page.clone(),
            action: query.action.clone(),
            outcome,
            super_admin: false,
        }
    }

    /// Mark the entry as decided by a super-admin grant
    pub fn via_super_admin(mut self) -> Self {
        self.super_admin = true;
        self
    }
}
