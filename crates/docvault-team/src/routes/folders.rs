//! Folder HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{current_user, VaultState};
use crate::error::VaultError;
use crate::models::{
    CreateFolderRequest, Folder, FolderAction, FolderTreeNode, UpdateFolderSettingsRequest,
};
use crate::services::DeletionPlan;
use crate::AuthenticatedUserId;

/// Query params for listing folders
#[derive(Debug, Deserialize)]
pub struct ListFoldersParams {
    /// Parent folder id; absent or the root sentinel lists root folders
    pub parent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AccessParams {
    pub action: FolderAction,
}

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub action: FolderAction,
    pub allowed: bool,
}

/// Folder listing response
#[derive(Debug, Serialize)]
pub struct FolderListResponse {
    pub folders: Vec<Folder>,
    pub count: usize,
}

/// Summary of a completed recursive delete
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFolderResponse {
    pub deleted_folders: Vec<String>,
    pub deleted_documents: usize,
}

impl From<DeletionPlan> for DeleteFolderResponse {
    fn from(plan: DeletionPlan) -> Self {
        Self {
            deleted_documents: plan.documents.len(),
            deleted_folders: plan.folders.into_iter().map(|f| f.id).collect(),
        }
    }
}

/// Configure folder routes
pub fn routes(state: VaultState) -> Router {
    Router::new()
        .route(
            "/teams/{team_id}/folders",
            get(list_folders).post(create_folder),
        )
        .route("/teams/{team_id}/folders/tree", get(folder_tree))
        .route("/folders/{folder_id}", get(get_folder).delete(delete_folder))
        .route("/folders/{folder_id}/settings", put(update_settings))
        .route("/folders/{folder_id}/access", get(check_access))
        .route("/folders/{folder_id}/deletion-plan", get(deletion_plan))
        .with_state(state)
}

/// List folders the caller may view under one parent
async fn list_folders(
    State(state): State<VaultState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(team_id): Path<String>,
    Query(params): Query<ListFoldersParams>,
) -> Result<Json<FolderListResponse>, VaultError> {
    let user = current_user(auth_user.as_ref(), &state).await?;
    let folders = state
        .folders()
        .list_visible(&user, &team_id, params.parent.as_deref())
        .await?;

    Ok(Json(FolderListResponse {
        count: folders.len(),
        folders,
    }))
}

/// Create a folder
async fn create_folder(
    State(state): State<VaultState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(team_id): Path<String>,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<Folder>), VaultError> {
    let user = current_user(auth_user.as_ref(), &state).await?;
    let folder = state.folders().create_for(&user, &team_id, req).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

async fn folder_tree(
    State(state): State<VaultState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(team_id): Path<String>,
) -> Result<Json<Vec<FolderTreeNode>>, VaultError> {
    let user = current_user(auth_user.as_ref(), &state).await?;
    let tree = state.folders().folder_tree(&user, &team_id).await?;
    Ok(Json(tree))
}

async fn get_folder(
    State(state): State<VaultState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(folder_id): Path<String>,
) -> Result<Json<Folder>, VaultError> {
    let user = current_user(auth_user.as_ref(), &state).await?;
    let folder = state.folders().get_folder_for(&user, &folder_id).await?;
    Ok(Json(folder))
}

/// Update grants, tags and color (admins only)
async fn update_settings(
    State(state): State<VaultState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(folder_id): Path<String>,
    Json(req): Json<UpdateFolderSettingsRequest>,
) -> Result<Json<Folder>, VaultError> {
    let user = current_user(auth_user.as_ref(), &state).await?;
    let folder = state
        .folders()
        .update_settings(&user, &folder_id, req)
        .await?;
    Ok(Json(folder))
}

/// Report whether the caller may perform an action on a folder
async fn check_access(
    State(state): State<VaultState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(folder_id): Path<String>,
    Query(params): Query<AccessParams>,
) -> Result<Json<AccessResponse>, VaultError> {
    let user = current_user(auth_user.as_ref(), &state).await?;
    let service = state.folders();
    let folder = service.get_folder_for(&user, &folder_id).await?;
    let allowed = service.check_action(&user, &folder, params.action).await?;

    Ok(Json(AccessResponse {
        action: params.action,
        allowed,
    }))
}

/// Preview what a recursive delete would remove
async fn deletion_plan(
    State(state): State<VaultState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(folder_id): Path<String>,
) -> Result<Json<DeletionPlan>, VaultError> {
    let user = current_user(auth_user.as_ref(), &state).await?;
    let plan = state.folders().plan_deletion(&user, &folder_id).await?;
    Ok(Json(plan))
}

/// Delete a folder and everything below it
async fn delete_folder(
    State(state): State<VaultState>,
    auth_user: Option<Extension<AuthenticatedUserId>>,
    Path(folder_id): Path<String>,
) -> Result<Json<DeleteFolderResponse>, VaultError> {
    let user = current_user(auth_user.as_ref(), &state).await?;
    let plan = state
        .folders()
        .delete_folder_recursive(&user, &folder_id)
        .await?;
    Ok(Json(DeleteFolderResponse::from(plan)))
}
