//! Team folder model and its permission data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{FolderAction, Role};

/// One step of a folder's ancestor chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageEntry {
    pub id: String,
    pub name: String,
    pub parent_folder_id: Option<String>,
}

/// Actions one role is granted on a folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderPermission {
    pub role: Role,
    #[serde(default)]
    pub actions: Vec<FolderAction>,
}

impl FolderPermission {
    pub fn new(role: Role, actions: impl Into<Vec<FolderAction>>) -> Self {
        Self {
            role,
            actions: actions.into(),
        }
    }

    pub fn allows(&self, action: FolderAction) -> bool {
        self.actions.contains(&action)
    }
}

/// Display color of a folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderColor {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
    Red,
    Yellow,
    Gray,
}

impl std::fmt::Display for FolderColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FolderColor::Blue => "blue",
            FolderColor::Green => "green",
            FolderColor::Purple => "purple",
            FolderColor::Orange => "orange",
            FolderColor::Red => "red",
            FolderColor::Yellow => "yellow",
            FolderColor::Gray => "gray",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for FolderColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blue" => Ok(FolderColor::Blue),
            "green" => Ok(FolderColor::Green),
            "purple" => Ok(FolderColor::Purple),
            "orange" => Ok(FolderColor::Orange),
            "red" => Ok(FolderColor::Red),
            "yellow" => Ok(FolderColor::Yellow),
            "gray" => Ok(FolderColor::Gray),
            _ => Err(format!("Invalid folder color: {}", s)),
        }
    }
}

/// Folder node in a team's hierarchy
///
/// `lineage` runs from the tree root down to this folder and always ends
/// with this folder's own `{id, name, parent_folder_id}`. An empty
/// `permissions` list means the built-in role defaults apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub path: String,
    pub parent_folder_id: Option<String>,
    pub team_id: String,
    #[serde(default)]
    pub lineage: Vec<LineageEntry>,
    #[serde(default)]
    pub permissions: Vec<FolderPermission>,
    /// User ids of contractors explicitly allowed into this folder
    #[serde(default)]
    pub contractor_access: Vec<String>,
    #[serde(default)]
    pub inherit_permissions: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub color: FolderColor,
    #[serde(default)]
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Grants applied to new folders when the caller supplies none
    pub fn default_permissions() -> Vec<FolderPermission> {
        vec![
            FolderPermission::new(
                Role::Admin,
                [FolderAction::View, FolderAction::Edit, FolderAction::Delete],
            ),
            FolderPermission::new(Role::Employee, [FolderAction::View]),
            FolderPermission::new(Role::Contractor, [FolderAction::View]),
        ]
    }

    pub fn is_root(&self) -> bool {
        self.parent_folder_id.is_none()
    }

    /// Permission entry for a role
    pub fn permission_for(&self, role: Role) -> Option<&FolderPermission> {
        self.permissions.iter().find(|p| p.role == role)
    }

    /// Lineage entry describing this folder itself
    pub fn own_lineage_entry(&self) -> LineageEntry {
        LineageEntry {
            id: self.id.clone(),
            name: self.name.clone(),
            parent_folder_id: self.parent_folder_id.clone(),
        }
    }

    /// Ids of every ancestor, root first, excluding this folder
    pub fn ancestor_ids(&self) -> impl Iterator<Item = &str> {
        self.lineage
            .iter()
            .map(|entry| entry.id.as_str())
            .filter(move |id| *id != self.id)
    }
}

/// Optional RBAC settings supplied when creating a folder
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RbacOptions {
    #[serde(default)]
    pub permissions: Option<Vec<FolderPermission>>,
    #[serde(default)]
    #[validate(length(max = 500, message = "too many contractor grants"))]
    pub contractor_access: Option<Vec<String>>,
    #[serde(default)]
    pub inherit_permissions: Option<bool>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub color: Option<FolderColor>,
}

/// Request to create a new folder
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    #[validate(length(min = 1, message = "folder name cannot be empty"))]
    pub name: String,
    #[serde(default)]
    pub parent_folder_id: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub rbac: RbacOptions,
}

/// Admin request to change a folder's access settings and labels
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderSettingsRequest {
    #[serde(default)]
    pub permissions: Option<Vec<FolderPermission>>,
    #[serde(default)]
    #[validate(length(max = 500, message = "too many contractor grants"))]
    pub contractor_access: Option<Vec<String>>,
    #[serde(default)]
    pub inherit_permissions: Option<bool>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub color: Option<FolderColor>,
}

/// Folder tree node for hierarchical display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderTreeNode {
    pub id: String,
    pub name: String,
    pub path: String,
    pub color: FolderColor,
    pub children: Vec<FolderTreeNode>,
}
