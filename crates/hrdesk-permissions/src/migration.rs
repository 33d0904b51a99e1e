//! Versioned migrations over stored role documents
//!
//! Each migration runs at most once per ledger. Stored grants are only
//! rewritten when a migration is explicitly run.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::grant::Actions;
use crate::role::RoleDocument;
use crate::storage::RoleRepository;

/// A single, idempotent change to stored roles
pub trait Migration: Send + Sync {
    /// Unique, ascending version number
    fn version(&self) -> u32;

    fn name(&self) -> &str;

    /// Apply the change in place, returning how many grants changed
    fn apply(&self, roles: &mut [RoleDocument]) -> Result<usize>;
}

/// Record of one applied migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMigration {
    pub version: u32,
    pub name: String,
    pub applied_at: DateTime<Utc>,
    /// Grants changed when it ran
    pub changed: usize,
}

/// Which migrations have already run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationLedger {
    #[serde(default)]
    pub applied: Vec<AppliedMigration>,
}

impl MigrationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_applied(&self, version: u32) -> bool {
        self.applied.iter().any(|m| m.version == version)
    }

    /// Highest applied version, if any
    pub fn current_version(&self) -> Option<u32> {
        self.applied.iter().map(|m| m.version).max()
    }
}

/// Outcome of a migration run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Versions applied by this run, ascending
    pub applied: Vec<u32>,
    /// Grants changed across all applied migrations
    pub changed: usize,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Runs pending migrations in version order
pub struct Migrator {
    migrations: Vec<Box<dyn Migration>>,
}

impl Migrator {
    /// Create a migrator, rejecting duplicate versions
    pub fn new(mut migrations: Vec<Box<dyn Migration>>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for migration in &migrations {
            if !seen.insert(migration.version()) {
                return Err(Error::Migration(format!(
                    "duplicate migration version {}",
                    migration.version()
                )));
            }
        }
        migrations.sort_by_key(|m| m.version());
        Ok(Self { migrations })
    }

    /// Migrator with the built-in migrations
    pub fn with_builtin() -> Result<Self> {
        let migrations: Vec<Box<dyn Migration>> = vec![Box::new(ListifySingleActions)];
        Self::new(migrations)
    }

    /// Versions not yet recorded in the ledger
    pub fn pending(&self, ledger: &MigrationLedger) -> Vec<u32> {
        self.migrations
            .iter()
            .map(|m| m.version())
            .filter(|v| !ledger.is_applied(*v))
            .collect()
    }

    /// Apply every pending migration and save the roles once.
    ///
    /// Roles are only written back when some grant changed.
    pub fn run(
        &self,
        repository: &dyn RoleRepository,
        ledger: &mut MigrationLedger,
    ) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();
        if self.pending(ledger).is_empty() {
            return Ok(report);
        }

        let mut roles = repository.load_roles()?;
        let mut applied = Vec::new();

        for migration in &self.migrations {
            if ledger.is_applied(migration.version()) {
                continue;
            }

            let changed = migration.apply(&mut roles)?;
            info!(
                version = migration.version(),
                name = migration.name(),
                changed,
                "Applied migration"
            );

            report.applied.push(migration.version());
            report.changed += changed;
            applied.push(AppliedMigration {
                version: migration.version(),
                name: migration.name().to_string(),
                applied_at: Utc::now(),
                changed,
            });
        }

        if report.changed > 0 {
            repository.save_roles(&roles)?;
        }
        ledger.applied.extend(applied);
        Ok(report)
    }
}

/// Rewrites bare single-action strings into one-element lists.
///
/// The bare wildcard `"*"` is left alone.
pub struct ListifySingleActions;

impl Migration for ListifySingleActions {
    fn version(&self) -> u32 {
        1
    }

    fn name(&self) -> &str {
        "listify_single_actions"
    }

    fn apply(&self, roles: &mut [RoleDocument]) -> Result<usize> {
        let mut changed = 0;
        for grant in roles.iter_mut().flat_map(|r| r.permissions.iter_mut()) {
            if let Some(Actions::Single(action)) = &grant.actions {
                grant.actions = Some(Actions::List(vec![action.clone()]));
                changed += 1;
            }
        }
        Ok(changed)
    }
}
