//! Folder permission checks
//!
//! All checks here are total: a missing role, missing grant or missing
//! contractor listing yields `false`, never an error.

use super::role::resolve_role;
use crate::models::{Folder, FolderAction, Role, User};

/// Whether `user` may perform `action` on `folder`
///
/// Uses the folder's stored grants as-is. Callers that honour inheritance
/// resolve effective permissions first (see [`super::inheritance`]).
pub fn can_perform(folder: &Folder, user: &User, action: FolderAction) -> bool {
    let Some(role) = resolve_role(user, &folder.team_id) else {
        return false;
    };

    if folder.permissions.is_empty() {
        return default_allows(role, action);
    }

    let Some(grant) = folder.permission_for(role) else {
        return false;
    };

    // Contractors need an explicit listing on top of the role grant.
    if role == Role::Contractor && !folder.contractor_access.iter().any(|id| id == &user.id) {
        return false;
    }

    grant.allows(action)
}

/// Built-in rules for folders that carry no grants at all
fn default_allows(role: Role, action: FolderAction) -> bool {
    match role {
        Role::Admin => true,
        Role::Employee => action == FolderAction::View,
        Role::Contractor => false,
    }
}

/// Folders `user` may view, in input order
pub fn filter_visible(folders: &[Folder], user: &User) -> Vec<Folder> {
    folders
        .iter()
        .filter(|folder| can_perform(folder, user, FolderAction::View))
        .cloned()
        .collect()
}

/// Only team admins may change folder grants, tags and colors
pub fn can_manage_folder(user: &User, team_id: &str) -> bool {
    resolve_role(user, team_id) == Some(Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FolderPermission, TeamMembership};
    use crate::test_support::{folder, member as user, TEAM};

    #[test]
    fn test_empty_permissions_use_role_defaults() {
        let f = folder("f", Vec::new(), &["c1"]);
        let admin = user("a1", Role::Admin);
        let employee = user("e1", Role::Employee);
        let contractor = user("c1", Role::Contractor);

        for action in FolderAction::ALL {
            assert!(can_perform(&f, &admin, action));
            assert!(!can_perform(&f, &contractor, action));
        }
        assert!(can_perform(&f, &employee, FolderAction::View));
        assert!(!can_perform(&f, &employee, FolderAction::Edit));
        assert!(!can_perform(&f, &employee, FolderAction::Delete));
    }

    #[test]
    fn test_unlisted_contractor_always_denied() {
        let everything = FolderAction::ALL.to_vec();
        let f = folder(
            "f",
            vec![FolderPermission::new(Role::Contractor, everything)],
            &["someone-else"],
        );
        let contractor = user("c1", Role::Contractor);
        for action in FolderAction::ALL {
            assert!(!can_perform(&f, &contractor, action));
        }
    }

    #[test]
    fn test_listed_contractor_limited_to_grant() {
        let f = folder("f", Folder::default_permissions(), &["c1"]);
        let contractor = user("c1", Role::Contractor);
        assert!(can_perform(&f, &contractor, FolderAction::View));
        assert!(!can_perform(&f, &contractor, FolderAction::Edit));
    }

    #[test]
    fn test_missing_role_entry_denies() {
        let f = folder(
            "f",
            vec![FolderPermission::new(Role::Admin, FolderAction::ALL.to_vec())],
            &[],
        );
        assert!(!can_perform(&f, &user("e1", Role::Employee), FolderAction::View));
        assert!(can_perform(&f, &user("a1", Role::Admin), FolderAction::Delete));
    }

    #[test]
    fn test_explicit_grant_can_restrict_admin() {
        let f = folder(
            "f",
            vec![FolderPermission::new(Role::Admin, [FolderAction::View])],
            &[],
        );
        let admin = user("a1", Role::Admin);
        assert!(can_perform(&f, &admin, FolderAction::View));
        assert!(!can_perform(&f, &admin, FolderAction::Delete));
    }

    #[test]
    fn test_other_team_user_denied() {
        let f = folder("f", Vec::new(), &[]);
        let mut outsider = User::new("x", "x", "x@example.com");
        outsider
            .join_team(TeamMembership::new("other-team", Role::Admin))
            .unwrap();
        assert!(!can_perform(&f, &outsider, FolderAction::View));
        assert!(filter_visible(&[f], &outsider).is_empty());
    }

    #[test]
    fn test_filter_preserves_order_and_is_idempotent() {
        let folders = vec![
            folder("a", Folder::default_permissions(), &[]),
            folder(
                "b",
                vec![FolderPermission::new(Role::Admin, FolderAction::ALL.to_vec())],
                &[],
            ),
            folder("c", Vec::new(), &[]),
            folder("d", Folder::default_permissions(), &[]),
        ];
        let employee = user("e1", Role::Employee);

        let once = filter_visible(&folders, &employee);
        let ids: Vec<&str> = once.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
        assert_eq!(filter_visible(&once, &employee), once);
        assert_eq!(folders.len(), 4);
    }

    #[test]
    fn test_only_admins_manage_folders() {
        assert!(can_manage_folder(&user("a1", Role::Admin), TEAM));
        assert!(!can_manage_folder(&user("e1", Role::Employee), TEAM));
        assert!(!can_manage_folder(&user("a1", Role::Admin), "other-team"));
    }
}
