//! Role and user data models

use serde::{Deserialize, Serialize};

use crate::grant::{PermissionGrant, PermissionSet};

/// A stored role and the grants it carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDocument {
    /// Role identifier referenced from user records
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Grants in authoring order
    #[serde(default)]
    pub permissions: Vec<PermissionGrant>,
}

impl RoleDocument {
    /// Create a new role
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            permissions: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a grant
    pub fn with_grant(mut self, grant: PermissionGrant) -> Self {
        self.permissions.push(grant);
        self
    }

    /// Grants of this role as a set
    pub fn permission_set(&self) -> PermissionSet {
        PermissionSet::from(self.permissions.clone())
    }
}

/// The parts of an employee record access control looks at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Assigned role ids, in priority order
    #[serde(default)]
    pub role_ids: Vec<String>,
    /// Job designation, e.g. "Manager"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    /// Id of the user this one reports to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports_to: Option<String>,
}

impl UserProfile {
    /// Create a new user with no roles
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role_ids: Vec::new(),
            designation: None,
            reports_to: None,
        }
    }

    pub fn with_role(mut self, role_id: impl Into<String>) -> Self {
        self.role_ids.push(role_id.into());
        self
    }

    pub fn with_designation(mut self, designation: impl Into<String>) -> Self {
        self.designation = Some(designation.into());
        self
    }

    pub fn reporting_to(mut self, manager_id: impl Into<String>) -> Self {
        self.reports_to = Some(manager_id.into());
        self
    }
}
