//! Storage seams consumed by the vault services
//!
//! The document database, blob store and identity service live outside
//! this crate. Services only see them through these traits.

use async_trait::async_trait;

use crate::error::VaultResult;
use crate::models::{Document, Folder, Team, User};

/// Folder records
#[async_trait]
pub trait FolderStore: Send + Sync {
    async fn get_folder(&self, folder_id: &str) -> VaultResult<Option<Folder>>;

    /// Insert or replace a folder record
    async fn set_folder(&self, folder: &Folder) -> VaultResult<()>;

    /// Direct children of `parent_folder_id`, or the team's root folders for `None`
    async fn list_folders(
        &self,
        team_id: &str,
        parent_folder_id: Option<&str>,
    ) -> VaultResult<Vec<Folder>>;

    /// Every folder of a team
    async fn list_team_folders(&self, team_id: &str) -> VaultResult<Vec<Folder>>;

    /// Returns whether a record was removed
    async fn delete_folder(&self, folder_id: &str) -> VaultResult<bool>;
}

/// Document records
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_documents(&self, folder_id: &str) -> VaultResult<Vec<Document>>;

    async fn delete_document(&self, document_id: &str) -> VaultResult<bool>;
}

/// User and team records
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn get_user(&self, user_id: &str) -> VaultResult<Option<User>>;

    async fn get_team(&self, team_id: &str) -> VaultResult<Option<Team>>;

    async fn list_team_users(&self, team_id: &str) -> VaultResult<Vec<User>>;
}

/// Everything the vault services need from storage
pub trait VaultStore: FolderStore + DocumentStore + DirectoryStore {}

impl<T: FolderStore + DocumentStore + DirectoryStore> VaultStore for T {}
