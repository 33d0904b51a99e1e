//! Audit logger implementation

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;

use super::models::AccessAuditEntry;
use crate::config::AuditSettings;

/// Bounded, thread-safe log of access decisions
#[derive(Clone)]
pub struct AuditLogger {
    entries: Arc<RwLock<VecDeque<AccessAuditEntry>>>,
    max_entries: usize,
    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger with default settings
    pub fn new() -> Self {
        Self::from_settings(&AuditSettings::default())
    }

    /// Create an audit logger from configuration
    pub fn from_settings(settings: &AuditSettings) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            max_entries: settings.max_entries.max(1),
            enabled: settings.enabled,
        }
    }

    /// Create an audit logger keeping at most `max_entries`
    pub fn with_capacity(max_entries: usize) -> Self {
        Self::from_settings(&AuditSettings {
            enabled: true,
            max_entries,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record an entry, evicting the oldest when full
    pub fn record(&self, entry: AccessAuditEntry) {
        if !self.enabled {
            return;
        }

        let mut entries = self.entries.write();
        while entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Get all entries, oldest first
    pub fn entries(&self) -> Vec<AccessAuditEntry> {
        self.entries.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new()
    }
}
