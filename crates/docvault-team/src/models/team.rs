//! Team model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of workspace a team represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TeamType {
    /// Single-owner workspace created at signup
    #[serde(rename = "self")]
    Personal,
    #[default]
    #[serde(rename = "team")]
    Collaborative,
}

impl std::fmt::Display for TeamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamType::Personal => write!(f, "self"),
            TeamType::Collaborative => write!(f, "team"),
        }
    }
}

impl std::str::FromStr for TeamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "self" => Ok(TeamType::Personal),
            "team" => Ok(TeamType::Collaborative),
            _ => Err(format!("Invalid team type: {}", s)),
        }
    }
}

/// Team entity: the tenant boundary for folders and documents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub created_by: String,
    #[serde(rename = "type", default)]
    pub team_type: TeamType,
    /// Member user ids
    #[serde(default)]
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Create a collaborative team owned by `created_by`
    pub fn new(name: String, created_by: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            members: vec![created_by.clone()],
            created_by,
            team_type: TeamType::Collaborative,
            created_at: Utc::now(),
        }
    }

    /// Create the personal workspace a user gets at signup
    pub fn personal(created_by: String) -> Self {
        let mut team = Self::new("Personal".to_string(), created_by);
        team.team_type = TeamType::Personal;
        team
    }

    pub fn is_personal(&self) -> bool {
        self.team_type == TeamType::Personal
    }

    /// Personal workspaces never take invitations or contractor grants
    pub fn accepts_contractors(&self) -> bool {
        !self.is_personal()
    }
}
