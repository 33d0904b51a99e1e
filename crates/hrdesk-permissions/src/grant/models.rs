//! Permission grant data models

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::evaluator::{PermissionEvaluator, ALL_ACTIONS};

/// Actions authorised by a grant.
///
/// Role documents carry actions either as a bare string (`"*"` or a single
/// action name) or as an array of strings. Both shapes are kept as they were
/// read, so re-serialising a grant reproduces the stored shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actions {
    /// The bare wildcard string `"*"`
    All,
    /// A single named action, stored as a bare string
    Single(String),
    /// An explicit list, which may itself contain `"*"`
    List(Vec<String>),
}

impl Actions {
    /// Build from the JSON shape stored in role documents.
    ///
    /// Returns `None` for shapes other than a string or an array. Non-string
    /// array elements are dropped.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) if s == ALL_ACTIONS => Some(Actions::All),
            Value::String(s) => Some(Actions::Single(s)),
            Value::Array(items) => Some(Actions::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            )),
            _ => None,
        }
    }

    /// True when these actions are, or contain, the exact `"*"` token
    pub fn is_wildcard(&self) -> bool {
        match self {
            Actions::All => true,
            Actions::Single(action) => action == ALL_ACTIONS,
            Actions::List(actions) => actions.iter().any(|a| a == ALL_ACTIONS),
        }
    }

    /// True when no action is present at all
    pub fn is_empty(&self) -> bool {
        match self {
            Actions::All => false,
            Actions::Single(action) => action.is_empty(),
            Actions::List(actions) => actions.is_empty(),
        }
    }
}

impl From<&str> for Actions {
    fn from(action: &str) -> Self {
        if action == ALL_ACTIONS {
            Actions::All
        } else {
            Actions::Single(action.to_string())
        }
    }
}

impl From<Vec<String>> for Actions {
    fn from(actions: Vec<String>) -> Self {
        Actions::List(actions)
    }
}

impl From<Vec<&str>> for Actions {
    fn from(actions: Vec<&str>) -> Self {
        Actions::List(actions.into_iter().map(str::to_string).collect())
    }
}

impl Serialize for Actions {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Actions::All => serializer.serialize_str(ALL_ACTIONS),
            Actions::Single(action) => serializer.serialize_str(action),
            Actions::List(actions) => actions.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Actions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Actions::from_value(value)
            .ok_or_else(|| de::Error::custom("actions must be a string or an array of strings"))
    }
}

/// Accepts any JSON shape for `actions`, mapping unsupported ones to `None`
/// so that one bad grant does not reject the whole role document.
fn lenient_actions<'de, D>(deserializer: D) -> std::result::Result<Option<Actions>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(Actions::from_value))
}

/// A single permission record binding a page to its allowed actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Protected page; `"*"` and `"any"` mean every page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Allowed actions; `None` when missing or malformed
    #[serde(
        default,
        deserialize_with = "lenient_actions",
        skip_serializing_if = "Option::is_none"
    )]
    pub actions: Option<Actions>,
}

impl PermissionGrant {
    /// Create a new grant
    pub fn new(page: impl Into<String>, actions: impl Into<Actions>) -> Self {
        Self {
            page: Some(page.into()),
            actions: Some(actions.into()),
        }
    }

    /// Every action on every page
    pub fn super_admin() -> Self {
        Self::new("*", Actions::All)
    }

    /// Check if this grant authorises everything
    pub fn is_super_admin(&self) -> bool {
        PermissionEvaluator::is_super_admin_grant(self)
    }
}

/// A page/action pair being requested
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessQuery {
    /// Page being accessed
    #[serde(default)]
    pub page: String,
    /// Action being attempted, e.g. "view" or "edit"
    #[serde(default)]
    pub action: String,
}

impl AccessQuery {
    /// Create a new query
    pub fn new(page: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            action: action.into(),
        }
    }

    /// Create a query from possibly-missing request fields
    pub fn from_parts(page: Option<&str>, action: Option<&str>) -> Self {
        Self::new(page.unwrap_or_default(), action.unwrap_or_default())
    }
}

impl std::fmt::Display for AccessQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.page, self.action)
    }
}

/// Ordered grants in effect for one user or role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    grants: Vec<PermissionGrant>,
}

impl PermissionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the grants of another set, keeping order
    pub fn extend_from(&mut self, other: &PermissionSet) {
        self.grants.extend(other.grants.iter().cloned());
    }

    /// Append a single grant
    pub fn push(&mut self, grant: PermissionGrant) {
        self.grants.push(grant);
    }

    /// Get all grants
    pub fn grants(&self) -> &[PermissionGrant] {
        &self.grants
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PermissionGrant> {
        self.grants.iter()
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Check whether any grant authorises everything
    pub fn has_super_admin(&self) -> bool {
        PermissionEvaluator::has_super_admin(&self.grants)
    }

    /// Check whether the set authorises the query
    pub fn authorize(&self, query: &AccessQuery) -> bool {
        PermissionEvaluator::authorize(&self.grants, query)
    }
}

impl From<Vec<PermissionGrant>> for PermissionSet {
    fn from(grants: Vec<PermissionGrant>) -> Self {
        Self { grants }
    }
}

impl FromIterator<PermissionGrant> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = PermissionGrant>>(iter: I) -> Self {
        Self {
            grants: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a PermissionGrant;
    type IntoIter = std::slice::Iter<'a, PermissionGrant>;

    fn into_iter(self) -> Self::IntoIter {
        self.grants.iter()
    }
}
