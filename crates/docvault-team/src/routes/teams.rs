//! Team member HTTP routes

use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};

use super::{current_user, VaultState};
use crate::error::VaultError;
use crate::services::{ContractorListResponse, MemberListResponse};
use crate::AuthenticatedUserId;

/// Configure team routes
pub fn routes(state: VaultState) -> Router {
    Router::new()
        .route("/teams/{team_id}/members", get(list_members))
        .route("/teams/{team_id}/contractors", get(list_contractors))
        .with_state(state)
}

/// List members of a team
async fn list_members(
    State(state): State<VaultState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(team_id): Path<String>,
) -> Result<Json<MemberListResponse>, VaultError> {
    let user = current_user(auth_user.as_ref(), &state).await?;
    let members = state.teams().list_members(&user, &team_id).await?;
    Ok(Json(members))
}

/// List contractors of a team (admins only)
async fn list_contractors(
    State(state): State<VaultState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(team_id): Path<String>,
) -> Result<Json<ContractorListResponse>, VaultError> {
    let user = current_user(auth_user.as_ref(), &state).await?;
    let contractors = state.teams().list_contractors(&user, &team_id).await?;
    Ok(Json(contractors))
}
