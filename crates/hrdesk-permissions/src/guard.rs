//! Request gating with permission checking
//!
//! The guard sits between request handling and the evaluator: it resolves the
//! user's grants, decides, records the decision, and only then runs the
//! guarded operation.

use std::sync::Arc;

use tracing::{debug, info};

use crate::audit::{AccessAuditEntry, AccessDecision, AuditLogger};
use crate::error::{Error, Result};
use crate::grant::{AccessQuery, PermissionSet};
use crate::role::{RoleResolver, UserProfile};

/// Gate for page/action requests
pub struct AccessGuard {
    resolver: Arc<RoleResolver>,
    audit_logger: Arc<AuditLogger>,
}

impl AccessGuard {
    /// Create a new access guard
    pub fn new(resolver: Arc<RoleResolver>, audit_logger: Arc<AuditLogger>) -> Self {
        Self {
            resolver,
            audit_logger,
        }
    }

    /// Decide whether the user may perform the query
    pub fn check(&self, user: &UserProfile, query: &AccessQuery) -> Result<AccessDecision> {
        let permissions = self.resolver.resolve(user)?;
        Ok(self.decide(user, &permissions, query))
    }

    /// Decide against grants the caller already resolved
    pub fn decide(
        &self,
        user: &UserProfile,
        permissions: &PermissionSet,
        query: &AccessQuery,
    ) -> AccessDecision {
        let super_admin = permissions.has_super_admin();
        let decision = AccessDecision::from(super_admin || permissions.authorize(query));

        debug!(user = %user.id, %query, %decision, super_admin, "Access check");
        if !decision.is_allowed() {
            info!(user = %user.id, %query, "Access denied");
        }

        let entry = AccessAuditEntry::new(user.id.clone(), query, decision);
        self.audit_logger.record(if super_admin {
            entry.via_super_admin()
        } else {
            entry
        });

        decision
    }

    /// Fail with [`Error::AccessDenied`] unless the user may perform the query
    pub fn require(&self, user: &UserProfile, query: &AccessQuery) -> Result<()> {
        match self.check(user, query)? {
            AccessDecision::Allowed => Ok(()),
            AccessDecision::Denied => Err(Error::AccessDenied),
        }
    }

    /// Run `execute_fn` only if the user may perform the query
    ///
    /// # Returns
    /// The decision, and the closure's output when it ran
    pub fn execute_with_permission<F, T>(
        &self,
        user: &UserProfile,
        query: &AccessQuery,
        execute_fn: F,
    ) -> Result<(AccessDecision, Option<T>)>
    where
        F: FnOnce() -> Result<T>,
    {
        match self.check(user, query)? {
            AccessDecision::Allowed => {
                let output = execute_fn()?;
                Ok((AccessDecision::Allowed, Some(output)))
            }
            AccessDecision::Denied => Ok((AccessDecision::Denied, None)),
        }
    }

    /// Get the audit logger
    pub fn audit_logger(&self) -> Arc<AuditLogger> {
        Arc::clone(&self.audit_logger)
    }
}
