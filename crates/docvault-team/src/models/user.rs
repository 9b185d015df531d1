//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TeamMembership;
use crate::error::{VaultError, VaultResult};

/// User record with its team memberships
///
/// Holds at most one membership per team. `current_team` is UI session
/// state; access checks always take the team id explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub teams: Vec<TeamMembership>,
    #[serde(default)]
    pub current_team: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user with no team memberships
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            teams: Vec::new(),
            current_team: None,
            created_at: Utc::now(),
        }
    }

    /// Membership entry for a team, if any
    pub fn membership(&self, team_id: &str) -> Option<&TeamMembership> {
        self.teams.iter().find(|m| m.team_id == team_id)
    }

    /// Add a membership. The first membership becomes the current team.
    pub fn join_team(&mut self, membership: TeamMembership) -> VaultResult<()> {
        if self.membership(&membership.team_id).is_some() {
            return Err(VaultError::MemberExists {
                team_id: membership.team_id,
            });
        }
        if self.current_team.is_none() {
            self.current_team = Some(membership.team_id.clone());
        }
        self.teams.push(membership);
        Ok(())
    }

    /// Select the active team; it must be one the user belongs to
    pub fn switch_team(&mut self, team_id: &str) -> VaultResult<()> {
        if self.membership(team_id).is_none() {
            return Err(VaultError::MemberNotFound {
                team_id: team_id.to_string(),
            });
        }
        self.current_team = Some(team_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_first_membership_becomes_current() {
        let mut user = User::new("u1", "Ada", "ada@example.com");
        user.join_team(TeamMembership::new("personal", Role::Admin))
            .unwrap();
        user.join_team(TeamMembership::new("acme", Role::Employee))
            .unwrap();
        assert_eq!(user.current_team.as_deref(), Some("personal"));
        assert_eq!(user.teams.len(), 2);
    }

    #[test]
    fn test_duplicate_membership_rejected() {
        let mut user = User::new("u1", "Ada", "ada@example.com");
        user.join_team(TeamMembership::new("acme", Role::Employee))
            .unwrap();
        let err = user
            .join_team(TeamMembership::new("acme", Role::Admin))
            .unwrap_err();
        assert!(matches!(err, VaultError::MemberExists { .. }));
        assert_eq!(user.membership("acme").unwrap().role, Role::Employee);
    }

    #[test]
    fn test_switch_team_requires_membership() {
        let mut user = User::new("u1", "Ada", "ada@example.com");
        user.join_team(TeamMembership::new("a", Role::Admin)).unwrap();
        user.join_team(TeamMembership::new("b", Role::Contractor))
            .unwrap();
        user.switch_team("b").unwrap();
        assert_eq!(user.current_team.as_deref(), Some("b"));
        assert!(user.switch_team("c").is_err());
        assert_eq!(user.current_team.as_deref(), Some("b"));
    }
}
