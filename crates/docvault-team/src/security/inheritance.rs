//! Permission inheritance along the folder tree

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::permission::can_perform;
use crate::models::{Folder, FolderAction, FolderPermission, User};

/// Id-indexed view over a set of folders
pub type FolderMap<'a> = HashMap<&'a str, &'a Folder>;

/// Build a [`FolderMap`] over `folders`
pub fn index_folders(folders: &[Folder]) -> FolderMap<'_> {
    folders.iter().map(|f| (f.id.as_str(), f)).collect()
}

/// How far an inheriting folder looks for its permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritanceMode {
    /// Take the immediate parent's stored grants, even if the parent itself inherits
    #[default]
    OneLevel,
    /// Walk up to the nearest ancestor that does not inherit
    Transitive,
}

impl std::fmt::Display for InheritanceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InheritanceMode::OneLevel => write!(f, "one_level"),
            InheritanceMode::Transitive => write!(f, "transitive"),
        }
    }
}

impl std::str::FromStr for InheritanceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "one_level" | "onelevel" => Ok(InheritanceMode::OneLevel),
            "transitive" => Ok(InheritanceMode::Transitive),
            _ => Err(format!("Invalid inheritance mode: {}", s)),
        }
    }
}

/// Grants that apply to a folder once inheritance is taken into account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectivePermissions {
    pub permissions: Vec<FolderPermission>,
    pub contractor_access: Vec<String>,
}

impl EffectivePermissions {
    fn stored_on(folder: &Folder) -> Self {
        Self {
            permissions: folder.permissions.clone(),
            contractor_access: folder.contractor_access.clone(),
        }
    }

    /// Copy of `folder` carrying these grants in place of its stored ones
    pub fn apply_to(&self, folder: &Folder) -> Folder {
        let mut resolved = folder.clone();
        resolved.permissions = self.permissions.clone();
        resolved.contractor_access = self.contractor_access.clone();
        resolved
    }
}

/// Resolve `folder`'s grants exactly one level up
///
/// A folder that inherits takes its parent's *stored* grants when the
/// parent is in `folder_map`; otherwise, and for folders that do not
/// inherit, its own stored grants apply.
pub fn resolve_effective_permissions(folder: &Folder, folder_map: &FolderMap<'_>) -> EffectivePermissions {
    resolve_with_mode(folder, folder_map, InheritanceMode::OneLevel)
}

/// Resolve `folder`'s grants using `mode`
pub fn resolve_with_mode(
    folder: &Folder,
    folder_map: &FolderMap<'_>,
    mode: InheritanceMode,
) -> EffectivePermissions {
    EffectivePermissions::stored_on(permission_source(folder, folder_map, mode))
}

fn permission_source<'a>(
    folder: &'a Folder,
    folder_map: &FolderMap<'a>,
    mode: InheritanceMode,
) -> &'a Folder {
    match mode {
        InheritanceMode::OneLevel => inherited_parent(folder, folder_map).unwrap_or(folder),
        InheritanceMode::Transitive => {
            let mut current = folder;
            let mut visited = HashSet::from([folder.id.as_str()]);
            while let Some(parent) = inherited_parent(current, folder_map) {
                // Corrupt parent links must not loop forever.
                if !visited.insert(parent.id.as_str()) {
                    break;
                }
                current = parent;
            }
            current
        }
    }
}

fn inherited_parent<'a>(folder: &Folder, folder_map: &FolderMap<'a>) -> Option<&'a Folder> {
    if !folder.inherit_permissions {
        return None;
    }
    folder
        .parent_folder_id
        .as_deref()
        .and_then(|parent_id| folder_map.get(parent_id).copied())
}

/// Copies of `folders` with effective grants applied, in input order
pub fn apply_inheritance(folders: &[Folder], mode: InheritanceMode) -> Vec<Folder> {
    let folder_map = index_folders(folders);
    folders
        .iter()
        .map(|folder| resolve_with_mode(folder, &folder_map, mode).apply_to(folder))
        .collect()
}

/// Folders `user` may view once inheritance is resolved
///
/// Returns the stored records unchanged, in input order; inheritance only
/// decides which of them are kept.
pub fn filter_visible_with_inheritance(
    folders: &[Folder],
    user: &User,
    mode: InheritanceMode,
) -> Vec<Folder> {
    let folder_map = index_folders(folders);
    folders
        .iter()
        .filter(|folder| {
            let effective = resolve_with_mode(folder, &folder_map, mode).apply_to(folder);
            can_perform(&effective, user, FolderAction::View)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::test_support::{child_of, folder, member};

    fn admin_only() -> Vec<FolderPermission> {
        vec![FolderPermission::new(Role::Admin, FolderAction::ALL.to_vec())]
    }

    #[test]
    fn test_non_inheriting_folder_keeps_own_grants() {
        let parent = folder("p", admin_only(), &[]);
        let child = child_of(&parent, folder("c", Folder::default_permissions(), &["k"]));
        let all = vec![parent, child.clone()];
        let effective = resolve_effective_permissions(&child, &index_folders(&all));
        assert_eq!(effective.permissions, Folder::default_permissions());
        assert_eq!(effective.contractor_access, vec!["k".to_string()]);
    }

    #[test]
    fn test_inherits_parent_grants_one_level() {
        let parent = folder("p", admin_only(), &["k1"]);
        let mut child = child_of(&parent, folder("c", Folder::default_permissions(), &["k2"]));
        child.inherit_permissions = true;
        let all = vec![parent, child.clone()];
        let effective = resolve_effective_permissions(&child, &index_folders(&all));
        assert_eq!(effective.permissions, admin_only());
        assert_eq!(effective.contractor_access, vec!["k1".to_string()]);
    }

    #[test]
    fn test_missing_parent_falls_back_to_own_grants() {
        let parent = folder("p", admin_only(), &[]);
        let mut child = child_of(&parent, folder("c", Folder::default_permissions(), &[]));
        child.inherit_permissions = true;
        let only_child = vec![child.clone()];
        let effective = resolve_effective_permissions(&child, &index_folders(&only_child));
        assert_eq!(effective.permissions, Folder::default_permissions());
    }

    #[test]
    fn test_inheriting_root_uses_own_grants() {
        let mut root = folder("r", admin_only(), &[]);
        root.inherit_permissions = true;
        let all = vec![root.clone()];
        assert_eq!(
            resolve_effective_permissions(&root, &index_folders(&all)).permissions,
            admin_only()
        );
    }

    fn three_level_chain() -> Vec<Folder> {
        let grand = folder("g", admin_only(), &[]);
        let mut parent = child_of(&grand, folder("p", Folder::default_permissions(), &[]));
        parent.inherit_permissions = true;
        let mut child = child_of(&parent, folder("c", Vec::new(), &[]));
        child.inherit_permissions = true;
        vec![grand, parent, child]
    }

    #[test]
    fn test_one_level_stops_at_inheriting_parent() {
        let all = three_level_chain();
        let map = index_folders(&all);
        let effective = resolve_with_mode(&all[2], &map, InheritanceMode::OneLevel);
        // The parent's stored grants win, even though the parent itself inherits.
        assert_eq!(effective.permissions, Folder::default_permissions());
    }

    #[test]
    fn test_transitive_walks_to_concrete_ancestor() {
        let all = three_level_chain();
        let map = index_folders(&all);
        let effective = resolve_with_mode(&all[2], &map, InheritanceMode::Transitive);
        assert_eq!(effective.permissions, admin_only());
    }

    #[test]
    fn test_transitive_survives_parent_cycle() {
        let mut a = folder("a", admin_only(), &[]);
        let mut b = folder("b", Folder::default_permissions(), &[]);
        a.parent_folder_id = Some("b".into());
        a.inherit_permissions = true;
        b.parent_folder_id = Some("a".into());
        b.inherit_permissions = true;
        let all = vec![a, b];
        let map = index_folders(&all);
        let effective = resolve_with_mode(&all[0], &map, InheritanceMode::Transitive);
        assert_eq!(effective.permissions, Folder::default_permissions());
    }

    #[test]
    fn test_filter_with_inheritance_hides_restricted_children() {
        let parent = folder("p", admin_only(), &[]);
        let mut hidden = child_of(&parent, folder("c1", Folder::default_permissions(), &[]));
        hidden.inherit_permissions = true;
        let shown = child_of(&parent, folder("c2", Folder::default_permissions(), &[]));
        let all = vec![parent, hidden, shown.clone()];

        let employee = member("e1", Role::Employee);
        let visible = filter_visible_with_inheritance(&all, &employee, InheritanceMode::OneLevel);
        assert_eq!(visible, vec![shown]);

        let admin = member("a1", Role::Admin);
        let visible = filter_visible_with_inheritance(&all, &admin, InheritanceMode::OneLevel);
        assert_eq!(visible.len(), 3);
        // Stored records come back untouched.
        assert_eq!(visible[1].permissions, Folder::default_permissions());
    }

    #[test]
    fn test_apply_inheritance_rewrites_grants() {
        let parent = folder("p", admin_only(), &["k"]);
        let mut child = child_of(&parent, folder("c", Vec::new(), &[]));
        child.inherit_permissions = true;
        let resolved = apply_inheritance(&[parent, child], InheritanceMode::OneLevel);
        assert_eq!(resolved[1].permissions, admin_only());
        assert_eq!(resolved[1].contractor_access, vec!["k".to_string()]);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("one-level".parse::<InheritanceMode>().unwrap(), InheritanceMode::OneLevel);
        assert_eq!("Transitive".parse::<InheritanceMode>().unwrap(), InheritanceMode::Transitive);
        assert!("deep".parse::<InheritanceMode>().is_err());
    }
}
