//! In-memory store

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::store::{DirectoryStore, DocumentStore, FolderStore};
use crate::error::VaultResult;
use crate::models::{Document, Folder, Team, User};

/// Map-backed implementation of every store seam
///
/// Folder listings come back in creation order.
#[derive(Default)]
pub struct MemoryStore {
    folders: RwLock<Vec<Folder>>,
    documents: RwLock<Vec<Document>>,
    users: RwLock<HashMap<String, User>>,
    teams: RwLock<HashMap<String, Team>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_user(&self, user: User) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    pub async fn put_team(&self, team: Team) {
        self.teams.write().await.insert(team.id.clone(), team);
    }

    pub async fn put_document(&self, document: Document) {
        let mut documents = self.documents.write().await;
        documents.retain(|d| d.id != document.id);
        documents.push(document);
    }

    pub async fn folder_count(&self) -> usize {
        self.folders.read().await.len()
    }

    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[async_trait]
impl FolderStore for MemoryStore {
    async fn get_folder(&self, folder_id: &str) -> VaultResult<Option<Folder>> {
        let folders = self.folders.read().await;
        Ok(folders.iter().find(|f| f.id == folder_id).cloned())
    }

    async fn set_folder(&self, folder: &Folder) -> VaultResult<()> {
        let mut folders = self.folders.write().await;
        match folders.iter_mut().find(|f| f.id == folder.id) {
            Some(existing) => *existing = folder.clone(),
            None => folders.push(folder.clone()),
        }
        Ok(())
    }

    async fn list_folders(
        &self,
        team_id: &str,
        parent_folder_id: Option<&str>,
    ) -> VaultResult<Vec<Folder>> {
        let folders = self.folders.read().await;
        Ok(folders
            .iter()
            .filter(|f| f.team_id == team_id && f.parent_folder_id.as_deref() == parent_folder_id)
            .cloned()
            .collect())
    }

    async fn list_team_folders(&self, team_id: &str) -> VaultResult<Vec<Folder>> {
        let folders = self.folders.read().await;
        Ok(folders
            .iter()
            .filter(|f| f.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn delete_folder(&self, folder_id: &str) -> VaultResult<bool> {
        let mut folders = self.folders.write().await;
        let before = folders.len();
        folders.retain(|f| f.id != folder_id);
        Ok(folders.len() != before)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(&self, folder_id: &str) -> VaultResult<Vec<Document>> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|d| d.folder_id == folder_id)
            .cloned()
            .collect())
    }

    async fn delete_document(&self, document_id: &str) -> VaultResult<bool> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|d| d.id != document_id);
        Ok(documents.len() != before)
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn get_user(&self, user_id: &str) -> VaultResult<Option<User>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn get_team(&self, team_id: &str) -> VaultResult<Option<Team>> {
        Ok(self.teams.read().await.get(team_id).cloned())
    }

    async fn list_team_users(&self, team_id: &str) -> VaultResult<Vec<User>> {
        let users = self.users.read().await;
        let mut members: Vec<User> = users
            .values()
            .filter(|u| u.membership(team_id).is_some())
            .cloned()
            .collect();
        members.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(members)
    }
}
