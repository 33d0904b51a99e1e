//! Lead visibility
//!
//! Decides which leads a user may see from their grants, designation and
//! position in the reporting hierarchy.

use std::collections::{BTreeSet, HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::VisibilitySettings;
use crate::grant::{AccessQuery, PermissionSet};
use crate::role::UserProfile;

/// The ownership fields of a lead record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Lead {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            assigned_to: None,
            created_by: None,
        }
    }

    pub fn assigned_to(mut self, user_id: impl Into<String>) -> Self {
        self.assigned_to = Some(user_id.into());
        self
    }

    pub fn created_by(mut self, user_id: impl Into<String>) -> Self {
        self.created_by = Some(user_id.into());
        self
    }
}

/// The set of leads a user may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadScope {
    /// Every lead
    All,
    /// Leads assigned to or created by one of these users
    Users(BTreeSet<String>),
}

impl LeadScope {
    /// Check if a lead falls inside this scope
    pub fn allows(&self, lead: &Lead) -> bool {
        match self {
            LeadScope::All => true,
            LeadScope::Users(users) => [&lead.assigned_to, &lead.created_by]
                .into_iter()
                .flatten()
                .any(|owner| users.contains(owner)),
        }
    }

    /// Keep the visible leads, in input order
    pub fn filter<'a, I>(&self, leads: I) -> Vec<&'a Lead>
    where
        I: IntoIterator<Item = &'a Lead>,
    {
        leads.into_iter().filter(|lead| self.allows(lead)).collect()
    }
}

/// Reporting hierarchy built from `reports_to` links
#[derive(Debug, Clone, Default)]
pub struct OrgDirectory {
    direct_reports: HashMap<String, Vec<String>>,
}

impl OrgDirectory {
    /// Build the hierarchy from user records
    pub fn from_users<'a, I>(users: I) -> Self
    where
        I: IntoIterator<Item = &'a UserProfile>,
    {
        let mut direct_reports: HashMap<String, Vec<String>> = HashMap::new();
        for user in users {
            if let Some(manager) = &user.reports_to {
                direct_reports
                    .entry(manager.clone())
                    .or_default()
                    .push(user.id.clone());
            }
        }
        Self { direct_reports }
    }

    /// Every user reporting to `user_id`, directly or transitively.
    ///
    /// Cycles in the hierarchy terminate; `user_id` itself is never included.
    pub fn subordinates_of(&self, user_id: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([user_id]);

        while let Some(current) = queue.pop_front() {
            for report in self.direct_reports.get(current).into_iter().flatten() {
                if report != user_id && found.insert(report.clone()) {
                    queue.push_back(report.as_str());
                }
            }
        }
        found
    }
}

/// Computes [`LeadScope`]s
pub struct LeadVisibility {
    settings: VisibilitySettings,
}

impl LeadVisibility {
    pub fn new(settings: VisibilitySettings) -> Self {
        Self { settings }
    }

    /// Work out which leads the user may see.
    ///
    /// Super-admins and holders of the view-all action see everything,
    /// managers see their own and their reports' leads, everyone else only
    /// their own.
    pub fn scope_for(
        &self,
        user: &UserProfile,
        permissions: &PermissionSet,
        directory: &OrgDirectory,
    ) -> LeadScope {
        if permissions.has_super_admin() {
            debug!(user = %user.id, "Lead scope: all (super-admin)");
            return LeadScope::All;
        }

        let view_all = AccessQuery::new(
            self.settings.leads_page.as_str(),
            self.settings.view_all_action.as_str(),
        );
        if permissions.authorize(&view_all) {
            debug!(user = %user.id, "Lead scope: all (view-all grant)");
            return LeadScope::All;
        }

        let mut users = BTreeSet::from([user.id.clone()]);
        if self.is_manager(user) {
            users.extend(directory.subordinates_of(&user.id));
        }
        debug!(user = %user.id, visible_owners = users.len(), "Lead scope: owners");
        LeadScope::Users(users)
    }

    fn is_manager(&self, user: &UserProfile) -> bool {
        let Some(designation) = user.designation.as_deref() else {
            return false;
        };
        let designation = designation.trim().to_lowercase();
        self.settings
            .manager_designations
            .iter()
            .any(|d| d.trim().to_lowercase() == designation)
    }
}

impl Default for LeadVisibility {
    fn default() -> Self {
        Self::new(VisibilitySettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grant::PermissionGrant;

    fn org() -> Vec<UserProfile> {
        vec![
            UserProfile::new("head", "Head").with_designation("Manager"),
            UserProfile::new("lead", "Lead")
                .with_designation("Team Lead")
                .reporting_to("head"),
            UserProfile::new("rep1", "Rep One").reporting_to("lead"),
            UserProfile::new("rep2", "Rep Two").reporting_to("lead"),
            UserProfile::new("other", "Other"),
        ]
    }

    fn leads() -> Vec<Lead> {
        vec![
            Lead::new("l1").assigned_to("rep1"),
            Lead::new("l2").assigned_to("other"),
            Lead::new("l3").created_by("lead"),
            Lead::new("l4"),
        ]
    }

    fn ids<'a>(leads: Vec<&'a Lead>) -> Vec<&'a str> {
        leads.into_iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_subordinates_are_transitive() {
        let users = org();
        let directory = OrgDirectory::from_users(&users);
        let subs = directory.subordinates_of("head");
        assert_eq!(
            subs.into_iter().collect::<Vec<_>>(),
            vec!["lead", "rep1", "rep2"]
        );
        assert!(directory.subordinates_of("rep1").is_empty());
    }

    #[test]
    fn test_subordinates_survive_cycles() {
        let users = vec![
            UserProfile::new("a", "A").reporting_to("b"),
            UserProfile::new("b", "B").reporting_to("a"),
        ];
        let directory = OrgDirectory::from_users(&users);
        assert_eq!(
            directory.subordinates_of("a").into_iter().collect::<Vec<_>>(),
            vec!["b"]
        );
    }

    #[test]
    fn test_super_admin_sees_all() {
        let users = org();
        let directory = OrgDirectory::from_users(&users);
        let grants = PermissionSet::from(vec![PermissionGrant::super_admin()]);

        let scope = LeadVisibility::default().scope_for(&users[4], &grants, &directory);
        assert_eq!(scope, LeadScope::All);
        assert_eq!(scope.filter(&leads()).len(), 4);
    }

    #[test]
    fn test_view_all_grant_sees_all() {
        let users = org();
        let directory = OrgDirectory::from_users(&users);
        let grants = PermissionSet::from(vec![PermissionGrant::new("Leads", vec!["View_All"])]);

        let scope = LeadVisibility::default().scope_for(&users[2], &grants, &directory);
        assert_eq!(scope, LeadScope::All);
    }

    #[test]
    fn test_manager_sees_reports_leads() {
        let users = org();
        let directory = OrgDirectory::from_users(&users);
        let grants = PermissionSet::from(vec![PermissionGrant::new("leads", "view")]);

        let scope = LeadVisibility::default().scope_for(&users[1], &grants, &directory);
        let leads = leads();
        assert_eq!(ids(scope.filter(&leads)), vec!["l1", "l3"]);
    }

    #[test]
    fn test_plain_user_sees_own_leads_only() {
        let users = org();
        let directory = OrgDirectory::from_users(&users);

        let scope = LeadVisibility::default().scope_for(&users[2], &PermissionSet::new(), &directory);
        let leads = leads();
        assert_eq!(ids(scope.filter(&leads)), vec!["l1"]);
    }

    #[test]
    fn test_unowned_lead_hidden_from_scoped_users() {
        let scope = LeadScope::Users(BTreeSet::from(["rep1".to_string()]));
        assert!(!scope.allows(&Lead::new("l4")));
        assert!(LeadScope::All.allows(&Lead::new("l4")));
    }
}
