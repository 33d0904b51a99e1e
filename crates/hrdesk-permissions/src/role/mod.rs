//! Roles, users and permission resolution

pub mod models;
pub mod resolver;

pub use models::{RoleDocument, UserProfile};
pub use resolver::RoleResolver;
