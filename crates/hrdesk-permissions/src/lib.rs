//! Access control for HRDesk
//!
//! Evaluates role-based page/action grants with `"*"`/`"any"` wildcards,
//! resolves a user's grants from their roles, gates requests with an audited
//! guard, and scopes lead visibility by grant, designation and hierarchy.

pub mod audit;
pub mod config;
pub mod error;
pub mod grant;
pub mod guard;
pub mod migration;
pub mod role;
pub mod storage;
pub mod visibility;

pub use audit::{AccessAuditEntry, AccessDecision, AuditLogger, AuditQuery, QueryFilter};
pub use config::{AccessConfig, AuditSettings, ConfigLoader, VisibilitySettings};
pub use error::{Error, Result};
pub use grant::{AccessQuery, Actions, PermissionEvaluator, PermissionGrant, PermissionSet};
pub use guard::AccessGuard;
pub use migration::{ListifySingleActions, Migration, MigrationLedger, MigrationReport, Migrator};
pub use role::{RoleDocument, RoleResolver, UserProfile};
pub use storage::{FileRoleRepository, InMemoryRoleRepository, RoleRepository};
pub use visibility::{Lead, LeadScope, LeadVisibility, OrgDirectory};
