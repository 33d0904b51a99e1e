//! Audit logging module

pub mod logger;
pub mod models;
pub mod query;

pub use logger::AuditLogger;
pub use models::{AccessAuditEntry, AccessDecision};
pub use query::{AuditQuery, QueryFilter};
