//! Builders shared by unit tests

use chrono::Utc;

use crate::models::{Folder, FolderColor, FolderPermission, LineageEntry, Role, TeamMembership, User};

pub const TEAM: &str = "team-1";

/// User with a single membership in [`TEAM`]
pub fn member(id: &str, role: Role) -> User {
    let mut user = User::new(id, id, format!("{}@example.com", id));
    user.join_team(TeamMembership::new(TEAM, role)).unwrap();
    user
}

/// Root folder in [`TEAM`] with the given grants
pub fn folder(id: &str, permissions: Vec<FolderPermission>, contractors: &[&str]) -> Folder {
    let now = Utc::now();
    Folder {
        id: id.to_string(),
        name: id.to_string(),
        path: id.to_string(),
        parent_folder_id: None,
        team_id: TEAM.to_string(),
        lineage: vec![LineageEntry {
            id: id.to_string(),
            name: id.to_string(),
            parent_folder_id: None,
        }],
        permissions,
        contractor_access: contractors.iter().map(|s| s.to_string()).collect(),
        inherit_permissions: false,
        tags: Vec::new(),
        color: FolderColor::Blue,
        created_by: "admin".to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// `folder` placed under `parent`, extending its lineage
pub fn child_of(parent: &Folder, mut folder: Folder) -> Folder {
    folder.parent_folder_id = Some(parent.id.clone());
    folder.path = format!("{}/{}", parent.path, folder.id);
    folder.lineage = parent.lineage.clone();
    folder.lineage.push(folder.own_lineage_entry());
    folder
}
