//! Resolution of a user's effective permission set

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::grant::PermissionSet;
use crate::role::models::UserProfile;
use crate::storage::RoleRepository;

/// Builds the union of grants across a user's roles
pub struct RoleResolver {
    repository: Arc<dyn RoleRepository>,
}

impl RoleResolver {
    /// Create a new resolver over a role repository
    pub fn new(repository: Arc<dyn RoleRepository>) -> Self {
        Self { repository }
    }

    /// Resolve the grants of every role assigned to the user.
    ///
    /// Grants keep the order of `role_ids`, then the order inside each role.
    /// Role ids that do not resolve are skipped.
    pub fn resolve(&self, user: &UserProfile) -> Result<PermissionSet> {
        let roles = self.repository.load_roles()?;
        let mut permissions = PermissionSet::new();

        for role_id in &user.role_ids {
            match roles.iter().find(|role| &role.id == role_id) {
                Some(role) => {
                    for grant in &role.permissions {
                        permissions.push(grant.clone());
                    }
                }
                None => warn!(user = %user.id, role = %role_id, "Skipping unknown role"),
            }
        }

        debug!(user = %user.id, grants = permissions.len(), "Resolved permissions");
        Ok(permissions)
    }

    /// Resolve a single role's grants, failing if it does not exist
    pub fn resolve_role(&self, role_id: &str) -> Result<PermissionSet> {
        self.repository
            .get_role(role_id)?
            .map(|role| role.permission_set())
            .ok_or_else(|| Error::RoleNotFound(role_id.to_string()))
    }
}
