//! Audit log querying and filtering

use chrono::{DateTime, Utc};

use super::logger::AuditLogger;
use super::models::{AccessAuditEntry, AccessDecision};

/// Filter criteria for audit log queries
#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    pub user_id: Option<String>,
    /// Compared case-insensitively
    pub page: Option<String>,
    pub outcome: Option<AccessDecision>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl QueryFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_outcome(mut self, outcome: AccessDecision) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn with_start_date(mut self, date: DateTime<Utc>) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_end_date(mut self, date: DateTime<Utc>) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Check if an entry matches this filter
    fn matches(&self, entry: &AccessAuditEntry) -> bool {
        if let Some(user_id) = &self.user_id {
            if &entry.user_id != user_id {
                return false;
            }
        }

        if let Some(page) = &self.page {
            if entry.page.to_lowercase() != page.to_lowercase() {
                return false;
            }
        }

        if let Some(outcome) = self.outcome {
            if entry.outcome != outcome {
                return false;
            }
        }

        if let Some(start) = self.start_date {
            if entry.timestamp < start {
                return false;
            }
        }

        if let Some(end) = self.end_date {
            if entry.timestamp > end {
                return false;
            }
        }

        true
    }
}

/// Read-only queries over an [`AuditLogger`]
pub struct AuditQuery;

impl AuditQuery {
    /// Entries matching the filter, oldest first
    pub fn search(logger: &AuditLogger, filter: &QueryFilter) -> Vec<AccessAuditEntry> {
        logger
            .entries()
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .collect()
    }

    /// Denied checks for a single user
    pub fn denials_for(logger: &AuditLogger, user_id: &str) -> Vec<AccessAuditEntry> {
        Self::search(
            logger,
            &QueryFilter::new()
                .with_user(user_id)
                .with_outcome(AccessDecision::Denied),
        )
    }

    /// Count of entries matching the filter
    pub fn count(logger: &AuditLogger, filter: &QueryFilter) -> usize {
        Self::search(logger, filter).len()
    }
}
