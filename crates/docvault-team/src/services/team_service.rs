//! Team service - member and contractor listings

use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use super::store::VaultStore;
use crate::error::{VaultError, VaultResult};
use crate::models::{Role, Team, User};
use crate::security::resolve_role;

/// One member as shown in team listings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberListResponse {
    pub team_id: String,
    pub team_name: String,
    pub members: Vec<TeamMemberSummary>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractorListResponse {
    pub contractors: Vec<TeamMemberSummary>,
    pub count: usize,
}

/// Team service over any [`VaultStore`]
pub struct TeamService {
    store: Arc<dyn VaultStore>,
}

impl TeamService {
    pub fn new(store: Arc<dyn VaultStore>) -> Self {
        Self { store }
    }

    /// Members of `team_id`, visible to any member of that team
    pub async fn list_members(&self, user: &User, team_id: &str) -> VaultResult<MemberListResponse> {
        let team = self.load_team(team_id).await?;
        if resolve_role(user, team_id).is_none() {
            return Err(VaultError::MemberNotFound {
                team_id: team_id.to_string(),
            });
        }

        let members = self.summaries(team_id, |_| true).await?;
        Ok(MemberListResponse {
            team_id: team.id,
            team_name: team.name,
            count: members.len(),
            members,
        })
    }

    /// Contractors of `team_id`, the candidates for folder contractor grants
    ///
    /// Only team admins may list them, and personal workspaces have none.
    pub async fn list_contractors(
        &self,
        user: &User,
        team_id: &str,
    ) -> VaultResult<ContractorListResponse> {
        let team = self.load_team(team_id).await?;
        if resolve_role(user, team_id) != Some(Role::Admin) {
            warn!(user_id = %user.id, team_id, "Contractor listing refused");
            return Err(VaultError::denied("list contractors"));
        }
        if !team.accepts_contractors() {
            return Err(VaultError::Validation(
                "Personal workspaces have no contractors".to_string(),
            ));
        }

        let contractors = self
            .summaries(team_id, |role| role == Role::Contractor)
            .await?;
        Ok(ContractorListResponse {
            count: contractors.len(),
            contractors,
        })
    }

    async fn load_team(&self, team_id: &str) -> VaultResult<Team> {
        self.store
            .get_team(team_id)
            .await?
            .ok_or_else(|| VaultError::TeamNotFound(team_id.to_string()))
    }

    async fn summaries(
        &self,
        team_id: &str,
        keep: impl Fn(Role) -> bool,
    ) -> VaultResult<Vec<TeamMemberSummary>> {
        let users = self.store.list_team_users(team_id).await?;
        Ok(users
            .into_iter()
            .filter_map(|user| {
                let membership = user.membership(team_id)?;
                let role = membership.role;
                let image_url = membership.image_url.clone();
                keep(role).then(|| TeamMemberSummary {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                    image_url,
                    role,
                })
            })
            .collect())
    }
}
