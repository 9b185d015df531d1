//! Routes module - HTTP API endpoints

pub mod folders;
pub mod teams;

use axum::{Extension, Router};
use std::sync::Arc;

use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};
use crate::models::User;
use crate::services::{FolderService, TeamService, VaultStore};

pub use crate::AuthenticatedUserId;

/// Shared state for vault routes
#[derive(Clone)]
pub struct VaultState {
    pub store: Arc<dyn VaultStore>,
    pub config: VaultConfig,
}

impl VaultState {
    pub fn new(store: Arc<dyn VaultStore>, config: VaultConfig) -> Self {
        Self { store, config }
    }

    pub fn folders(&self) -> FolderService {
        FolderService::new(self.store.clone(), self.config.clone())
    }

    pub fn teams(&self) -> TeamService {
        TeamService::new(self.store.clone())
    }
}

/// Load the calling user from the identity extension
///
/// Requests without an identity, or with one the directory does not know,
/// are unauthenticated.
pub async fn current_user(
    auth_user: Option<&Extension<AuthenticatedUserId>>,
    state: &VaultState,
) -> VaultResult<User> {
    let user_id = auth_user.ok_or(VaultError::Unauthenticated)?.0.as_str();
    state
        .store
        .get_user(user_id)
        .await?
        .ok_or(VaultError::Unauthenticated)
}

/// Configure all vault routes
pub fn configure(state: VaultState) -> Router {
    Router::new()
        .merge(folders::routes(state.clone()))
        .merge(teams::routes(state))
}
