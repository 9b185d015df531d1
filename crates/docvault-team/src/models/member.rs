//! Team roles, folder actions and team memberships

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Role a user holds within one team
///
/// Folder permission entries historically tag roles in upper case
/// (`ADMIN`) while membership records use lower case (`admin`). Both
/// spellings parse into the same variant; the canonical serialized form is
/// the upper-case tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Admin,
    Employee,
    Contractor,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Employee, Role::Contractor];

    /// Canonical tag for this role
    pub fn as_tag(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Employee => "EMPLOYEE",
            Role::Contractor => "CONTRACTOR",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            "contractor" => Ok(Role::Contractor),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_tag())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Action that folder permissions grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderAction {
    View,
    Edit,
    Delete,
}

impl FolderAction {
    pub const ALL: [FolderAction; 3] = [FolderAction::View, FolderAction::Edit, FolderAction::Delete];
}

impl std::fmt::Display for FolderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FolderAction::View => write!(f, "view"),
            FolderAction::Edit => write!(f, "edit"),
            FolderAction::Delete => write!(f, "delete"),
        }
    }
}

impl std::str::FromStr for FolderAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "view" => Ok(FolderAction::View),
            "edit" => Ok(FolderAction::Edit),
            "delete" => Ok(FolderAction::Delete),
            _ => Err(format!("Invalid folder action: {}", s)),
        }
    }
}

/// A user's membership in one team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMembership {
    pub team_id: String,
    pub role: Role,
    /// Team display name
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_url: String,
}

impl TeamMembership {
    pub fn new(team_id: impl Into<String>, role: Role) -> Self {
        Self {
            team_id: team_id.into(),
            role,
            name: String::new(),
            image_url: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
