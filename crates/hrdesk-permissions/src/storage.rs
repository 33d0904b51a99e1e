//! Storage for role documents
//!
//! Roles are persisted as a JSON array in the same shape the application
//! stores them in, so grants round-trip without being rewritten.

use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::error::Result;
use crate::role::RoleDocument;

/// Repository trait for storing and retrieving roles
pub trait RoleRepository: Send + Sync {
    /// Load every stored role
    fn load_roles(&self) -> Result<Vec<RoleDocument>>;

    /// Replace the stored roles
    fn save_roles(&self, roles: &[RoleDocument]) -> Result<()>;

    /// Get a role by id
    fn get_role(&self, id: &str) -> Result<Option<RoleDocument>> {
        Ok(self.load_roles()?.into_iter().find(|role| role.id == id))
    }

    /// Insert a role, replacing any stored role with the same id
    ///
    /// Implementations shared across threads must make the read-modify-write
    /// atomic.
    fn upsert_role(&self, role: RoleDocument) -> Result<()> {
        let mut roles = self.load_roles()?;
        upsert_into(&mut roles, role);
        self.save_roles(&roles)
    }
}

/// File-based role repository
///
/// Writes within one process are serialised; the file is replaced atomically
/// so a failed save never leaves a truncated roles file behind.
pub struct FileRoleRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileRoleRepository {
    /// Create a new file-based role repository
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a repository using `roles.json` under a base directory
    pub fn with_defaults<P: AsRef<Path>>(base_path: P) -> Self {
        Self::new(base_path.as_ref().join("roles.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_roles(&self, roles: &[RoleDocument]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(roles)?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &self.path)?;
        debug!(path = %self.path.display(), count = roles.len(), "Saved roles");
        Ok(())
    }
}

fn upsert_into(roles: &mut Vec<RoleDocument>, role: RoleDocument) {
    match roles.iter_mut().find(|r| r.id == role.id) {
        Some(existing) => *existing = role,
        None => roles.push(role),
    }
}

impl RoleRepository for FileRoleRepository {
    fn load_roles(&self) -> Result<Vec<RoleDocument>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Roles file missing, starting empty");
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let roles: Vec<RoleDocument> = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), count = roles.len(), "Loaded roles");
        Ok(roles)
    }

    fn save_roles(&self, roles: &[RoleDocument]) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.write_roles(roles)
    }

    fn upsert_role(&self, role: RoleDocument) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut roles = self.load_roles()?;
        upsert_into(&mut roles, role);
        self.write_roles(&roles)
    }
}

/// In-memory role repository
#[derive(Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<Vec<RoleDocument>>,
}

impl InMemoryRoleRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded with roles
    pub fn with_roles(roles: Vec<RoleDocument>) -> Self {
        Self {
            roles: RwLock::new(roles),
        }
    }
}

impl RoleRepository for InMemoryRoleRepository {
    fn load_roles(&self) -> Result<Vec<RoleDocument>> {
        Ok(self.roles.read().clone())
    }

    fn save_roles(&self, roles: &[RoleDocument]) -> Result<()> {
        *self.roles.write() = roles.to_vec();
        Ok(())
    }

    fn get_role(&self, id: &str) -> Result<Option<RoleDocument>> {
        Ok(self.roles.read().iter().find(|role| role.id == id).cloned())
    }

    fn upsert_role(&self, role: RoleDocument) -> Result<()> {
        upsert_into(&mut self.roles.write(), role);
        Ok(())
    }
}
