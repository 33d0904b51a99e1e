//! Page/action grants and their evaluation

pub mod evaluator;
pub mod models;

pub use evaluator::{PermissionEvaluator, ALL_ACTIONS, ALL_PAGES, ANY_PAGE};
pub use models::{AccessQuery, Actions, PermissionGrant, PermissionSet};
