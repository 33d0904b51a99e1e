//! Permission evaluation logic

use super::models::{AccessQuery, Actions, PermissionGrant};

/// Page sentinel meaning every page
pub const ALL_PAGES: &str = "*";
/// Alternate page sentinel meaning every page
pub const ANY_PAGE: &str = "any";
/// Action sentinel meaning every action
pub const ALL_ACTIONS: &str = "*";

/// Stateless evaluator for page/action grants
pub struct PermissionEvaluator;

impl PermissionEvaluator {
    /// Check whether a grant authorises every action on every page.
    ///
    /// The page sentinels are compared exactly, without case folding.
    pub fn is_super_admin_grant(grant: &PermissionGrant) -> bool {
        let page_is_wildcard = matches!(grant.page.as_deref(), Some(ALL_PAGES) | Some(ANY_PAGE));

        page_is_wildcard
            && grant
                .actions
                .as_ref()
                .is_some_and(|actions| !actions.is_empty() && actions.is_wildcard())
    }

    /// Check whether any grant is a super-admin grant
    pub fn has_super_admin(grants: &[PermissionGrant]) -> bool {
        grants.iter().any(Self::is_super_admin_grant)
    }

    /// Decide whether the grants authorise the query.
    ///
    /// Grants are walked in order and the first match allows. Page and action
    /// are compared case-insensitively; a missing or empty value on either side
    /// never matches anything but a wildcard.
    pub fn authorize(grants: &[PermissionGrant], query: &AccessQuery) -> bool {
        let page = fold_case(&query.page);
        let action = fold_case(&query.action);

        grants
            .iter()
            .any(|grant| Self::grant_matches(grant, &page, &action))
    }

    fn grant_matches(grant: &PermissionGrant, page: &str, action: &str) -> bool {
        let Some(actions) = grant.actions.as_ref().filter(|a| !a.is_empty()) else {
            return false;
        };

        let grant_page = grant.page.as_deref().unwrap_or_default();
        let page_match = folded_eq(grant_page, ALL_PAGES)
            || folded_eq(grant_page, ANY_PAGE)
            || (!page.is_empty() && folded_eq(grant_page, page));
        if !page_match {
            return false;
        }

        match actions {
            Actions::All => true,
            Actions::Single(granted) => granted == ALL_ACTIONS || action_matches(granted, action),
            Actions::List(granted) => {
                granted.iter().any(|a| a == ALL_ACTIONS)
                    || granted.iter().any(|a| action_matches(a, action))
            }
        }
    }
}

fn action_matches(granted: &str, action: &str) -> bool {
    !action.is_empty() && folded_eq(granted, action)
}

/// Compare `value` against an already folded string without allocating
fn folded_eq(value: &str, folded: &str) -> bool {
    value.chars().flat_map(char::to_lowercase).eq(folded.chars())
}

fn fold_case(value: &str) -> String {
    value.chars().flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(page: &str, actions: impl Into<Actions>) -> PermissionGrant {
        PermissionGrant::new(page, actions)
    }

    #[test]
    fn test_wildcard_page_and_action_is_universal() {
        for page in ["*", "any"] {
            let grants = [grant(page, "*")];
            assert!(PermissionEvaluator::authorize(&grants, &AccessQuery::new("leads", "delete")));
            assert!(PermissionEvaluator::authorize(&grants, &AccessQuery::new("", "")));
        }
    }

    #[test]
    fn test_wildcard_in_list_covers_all_actions_on_page() {
        let grants = [grant("billing", vec!["*"])];
        assert!(PermissionEvaluator::authorize(&grants, &AccessQuery::new("billing", "delete")));
        assert!(!PermissionEvaluator::authorize(&grants, &AccessQuery::new("other", "delete")));
    }

    #[test]
    fn test_case_insensitive_match() {
        let grants = [grant("Leads", vec!["View"])];
        assert!(PermissionEvaluator::authorize(&grants, &AccessQuery::new("leads", "view")));
        assert!(PermissionEvaluator::authorize(&grants, &AccessQuery::new("LEADS", "VIEW")));
    }

    #[test]
    fn test_string_and_list_actions_are_equivalent() {
        let single = [grant("leads", "view")];
        let list = [grant("leads", vec!["view"])];
        for action in ["view", "edit", "VIEW", ""] {
            let query = AccessQuery::new("leads", action);
            assert_eq!(
                PermissionEvaluator::authorize(&single, &query),
                PermissionEvaluator::authorize(&list, &query)
            );
        }
    }

    #[test]
    fn test_no_match_denies() {
        let grants = [grant("leads", vec!["view"])];
        assert!(!PermissionEvaluator::authorize(&grants, &AccessQuery::new("leads", "edit")));
    }

    #[test]
    fn test_empty_grants_deny() {
        assert!(!PermissionEvaluator::authorize(&[], &AccessQuery::new("leads", "view")));
    }

    #[test]
    fn test_later_grant_can_match() {
        let grants = [grant("employees", "view"), grant("leads", vec!["create", "edit"])];
        assert!(PermissionEvaluator::authorize(&grants, &AccessQuery::new("leads", "edit")));
    }

    #[test]
    fn test_page_any_folds_case_in_authorize_only() {
        let grants = [grant("ANY", "*")];
        assert!(PermissionEvaluator::authorize(&grants, &AccessQuery::new("leads", "view")));
        assert!(!PermissionEvaluator::has_super_admin(&grants));
    }

    #[test]
    fn test_has_super_admin() {
        assert!(PermissionEvaluator::has_super_admin(&[grant("any", "*")]));
        assert!(PermissionEvaluator::has_super_admin(&[grant("*", vec!["view", "*"])]));
        assert!(!PermissionEvaluator::has_super_admin(&[grant("leads", "*")]));
        assert!(!PermissionEvaluator::has_super_admin(&[grant("*", vec!["view"])]));
        assert!(!PermissionEvaluator::has_super_admin(&[]));
    }

    #[test]
    fn test_super_admin_requires_actions() {
        let missing = PermissionGrant {
            page: Some("*".to_string()),
            actions: None,
        };
        let empty = grant("*", Vec::<String>::new());
        assert!(!PermissionEvaluator::is_super_admin_grant(&missing));
        assert!(!PermissionEvaluator::is_super_admin_grant(&empty));
    }

    #[test]
    fn test_single_wildcard_built_by_hand_counts() {
        let grants = [PermissionGrant {
            page: Some("any".to_string()),
            actions: Some(Actions::Single("*".to_string())),
        }];
        assert!(PermissionEvaluator::has_super_admin(&grants));
        assert!(PermissionEvaluator::authorize(&grants, &AccessQuery::new("x", "y")));
    }

    #[test]
    fn test_malformed_grants_never_match() {
        let grants = [
            PermissionGrant {
                page: None,
                actions: Some(Actions::All),
            },
            PermissionGrant {
                page: Some("leads".to_string()),
                actions: None,
            },
        ];
        assert!(!PermissionEvaluator::authorize(&grants, &AccessQuery::new("leads", "view")));
        assert!(!PermissionEvaluator::authorize(&grants, &AccessQuery::new("", "view")));
    }

    #[test]
    fn test_empty_query_fails_closed() {
        let grants = [
            grant("leads", vec!["view"]),
            PermissionGrant {
                page: Some(String::new()),
                actions: Some(Actions::Single(String::new())),
            },
        ];
        assert!(!PermissionEvaluator::authorize(&grants, &AccessQuery::new("", "")));
        assert!(!PermissionEvaluator::authorize(&grants, &AccessQuery::new("leads", "")));
    }

    #[test]
    fn test_empty_query_passes_only_wildcards() {
        let grants = [grant("leads", "*")];
        assert!(PermissionEvaluator::authorize(&grants, &AccessQuery::new("leads", "")));
        assert!(!PermissionEvaluator::authorize(&grants, &AccessQuery::new("", "view")));
    }

    #[test]
    fn test_case_folding_beyond_ascii() {
        let grants = [grant("Équipe", vec!["Prüfen"])];
        assert!(PermissionEvaluator::authorize(&grants, &AccessQuery::new("ÉQUIPE", "PRÜFEN")));
        assert!(PermissionEvaluator::authorize(&grants, &AccessQuery::new("équipe", "prüfen")));
        assert!(!PermissionEvaluator::authorize(&grants, &AccessQuery::new("equipe", "prufen")));
    }

    #[test]
    fn test_folding_compares_whole_values() {
        let grants = [grant("lead", vec!["view"])];
        assert!(!PermissionEvaluator::authorize(&grants, &AccessQuery::new("leads", "view")));
        assert!(!PermissionEvaluator::authorize(&grants, &AccessQuery::new("lead", "views")));
        assert!(!PermissionEvaluator::authorize(&grants, &AccessQuery::new("lead", "vie")));
    }

    #[test]
    fn test_empty_actions_match_nothing() {
        let grants = [
            grant("*", Vec::<String>::new()),
            PermissionGrant {
                page: Some("leads".to_string()),
                actions: Some(Actions::Single(String::new())),
            },
        ];
        for (page, action) in [("leads", "view"), ("leads", ""), ("", "")] {
            assert!(!PermissionEvaluator::authorize(&grants, &AccessQuery::new(page, action)));
        }
        assert!(!PermissionEvaluator::has_super_admin(&grants));
    }
}
