//! Access control configuration
//!
//! Settings come from an optional TOML file, overridden by environment
//! variables prefixed with `HRDESK` (nested keys separated by `__`, e.g.
//! `HRDESK_AUDIT__MAX_ENTRIES=500`). Manager designations are given as a
//! comma-separated list.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "HRDESK";

/// Separator for list values given through the environment
pub const ENV_LIST_SEPARATOR: &str = ",";

// Keys whose environment values are split on `ENV_LIST_SEPARATOR`
const ENV_LIST_KEYS: &[&str] = &["visibility.manager_designations"];

/// Audit log settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSettings {
    /// Record every access decision
    pub enabled: bool,
    /// Oldest entries are evicted past this count
    pub max_entries: usize,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 10_000,
        }
    }
}

/// Lead visibility settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilitySettings {
    /// Page the lead grants are written against
    pub leads_page: String,
    /// Action on `leads_page` that reveals every lead
    pub view_all_action: String,
    /// Designations that also see their reports' leads
    pub manager_designations: Vec<String>,
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            leads_page: "leads".to_string(),
            view_all_action: "view_all".to_string(),
            manager_designations: vec!["manager".to_string(), "team lead".to_string()],
        }
    }
}

/// Top-level access control configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// JSON file holding role documents
    pub roles_path: Option<PathBuf>,
    pub audit: AuditSettings,
    pub visibility: VisibilitySettings,
}

/// Loads [`AccessConfig`] from file and environment
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Loader reading only the environment
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Loader reading a config file, then the environment
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: Some(path.as_ref().to_path_buf()),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Override the environment prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load and validate the configuration
    pub fn load(&self) -> Result<AccessConfig> {
        let mut builder = Config::builder();
        if let Some(path) = &self.config_path {
            builder = builder.add_source(File::from(path.clone()).required(false));
        }
        let environment = ENV_LIST_KEYS.iter().fold(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(ENV_LIST_SEPARATOR),
            |env, key| env.with_list_parse_key(key),
        );
        builder = builder.add_source(environment);

        let config: AccessConfig = builder.build()?.try_deserialize()?;
        Self::validate(&config)?;
        debug!(roles_path = ?config.roles_path, audit = config.audit.enabled, "Loaded access config");
        Ok(config)
    }

    /// Reject settings that would make access checks meaningless
    pub fn validate(config: &AccessConfig) -> Result<()> {
        if config.visibility.leads_page.trim().is_empty() {
            return Err(Error::Config("visibility.leads_page must not be empty".to_string()));
        }
        if config.visibility.view_all_action.trim().is_empty() {
            return Err(Error::Config(
                "visibility.view_all_action must not be empty".to_string(),
            ));
        }
        if config.audit.max_entries == 0 {
            return Err(Error::Config(
                "audit.max_entries must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
