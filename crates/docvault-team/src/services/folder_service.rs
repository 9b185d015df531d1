//! Folder service - creation, visibility and deletion of team folders

use chrono::Utc;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::store::VaultStore;
use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};
use crate::models::{
    CreateFolderRequest, Document, Folder, FolderAction, FolderTreeNode, LineageEntry,
    RbacOptions, Role, UpdateFolderSettingsRequest, User,
};
use crate::security::{
    can_manage_folder, can_perform, filter_visible_with_inheritance, index_folders, resolve_role,
    resolve_with_mode, validate_folder_name, validate_rbac_options, validate_settings_update,
    FolderMap,
};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Path segment for a folder name
///
/// Lowercases and collapses whitespace runs into single hyphens. Applying
/// it to its own output changes nothing.
pub fn slugify(name: &str) -> String {
    WHITESPACE.replace_all(name.trim(), "-").to_lowercase()
}

/// Everything a recursive delete would remove
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionPlan {
    /// Subtree folders, deepest first, ending with the requested folder
    pub folders: Vec<Folder>,
    pub documents: Vec<Document>,
}

impl DeletionPlan {
    pub fn folder_ids(&self) -> Vec<&str> {
        self.folders.iter().map(|f| f.id.as_str()).collect()
    }
}

/// Folder service over any [`VaultStore`]
pub struct FolderService {
    store: Arc<dyn VaultStore>,
    config: VaultConfig,
}

impl FolderService {
    pub fn new(store: Arc<dyn VaultStore>, config: VaultConfig) -> Self {
        Self { store, config }
    }

    /// Create a folder under `parent_folder_id`, or at the root of the team
    ///
    /// Input is validated before any store access. A missing parent, or one
    /// that belongs to another team, fails with `ParentNotFound` and nothing
    /// is written.
    pub async fn create_folder(
        &self,
        name: &str,
        parent_folder_id: Option<&str>,
        team_id: &str,
        created_by: &str,
        options: RbacOptions,
    ) -> VaultResult<Folder> {
        validate_folder_name(name, &self.config)?;
        validate_rbac_options(&options, &self.config)?;

        if options
            .contractor_access
            .as_ref()
            .is_some_and(|ids| !ids.is_empty())
        {
            self.ensure_accepts_contractors(team_id).await?;
        }

        let id = Uuid::new_v4().to_string();
        let name = name.trim().to_string();

        let (parent_folder_id, mut lineage, path) =
            if self.config.is_root_parent(parent_folder_id) {
                (None, Vec::new(), slugify(&name))
            } else {
                let parent_id = parent_folder_id.unwrap_or_default();
                let parent = self
                    .store
                    .get_folder(parent_id)
                    .await?
                    .filter(|p| p.team_id == team_id)
                    .ok_or_else(|| VaultError::ParentNotFound(parent_id.to_string()))?;
                let path = format!("{}/{}", parent.path, slugify(&name));
                let lineage = if parent.lineage.is_empty() {
                    vec![parent.own_lineage_entry()]
                } else {
                    parent.lineage
                };
                (Some(parent.id), lineage, path)
            };

        lineage.push(LineageEntry {
            id: id.clone(),
            name: name.clone(),
            parent_folder_id: parent_folder_id.clone(),
        });

        let now = Utc::now();
        let folder = Folder {
            id,
            name,
            path,
            parent_folder_id,
            team_id: team_id.to_string(),
            lineage,
            permissions: options
                .permissions
                .unwrap_or_else(Folder::default_permissions),
            contractor_access: options.contractor_access.unwrap_or_default(),
            inherit_permissions: options.inherit_permissions.unwrap_or(false),
            tags: options.tags.unwrap_or_default(),
            color: options.color.unwrap_or_default(),
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.store.set_folder(&folder).await?;
        info!(
            folder_id = %folder.id,
            team_id = %folder.team_id,
            path = %folder.path,
            "Folder created"
        );
        Ok(folder)
    }

    /// Create a folder on behalf of `user` once they are allowed to
    pub async fn create_for(
        &self,
        user: &User,
        team_id: &str,
        request: CreateFolderRequest,
    ) -> VaultResult<Folder> {
        self.authorize_create(user, team_id, request.parent_folder_id.as_deref())
            .await?;

        let rbac = &request.rbac;
        let sets_grants = rbac.permissions.is_some()
            || rbac.contractor_access.is_some()
            || rbac.inherit_permissions.is_some();
        if sets_grants && !can_manage_folder(user, team_id) {
            warn!(user_id = %user.id, team_id, "Folder grants at creation refused");
            return Err(VaultError::denied("configure folder permissions"));
        }

        self.create_folder(
            &request.name,
            request.parent_folder_id.as_deref(),
            team_id,
            &user.id,
            request.rbac,
        )
        .await
    }

    /// Check whether `user` may add a folder under `parent_folder_id`
    ///
    /// Admins and employees may create at the root. Below that the caller
    /// needs to be able to edit the parent.
    pub async fn authorize_create(
        &self,
        user: &User,
        team_id: &str,
        parent_folder_id: Option<&str>,
    ) -> VaultResult<()> {
        if self.config.is_root_parent(parent_folder_id) {
            return match resolve_role(user, team_id) {
                Some(Role::Admin | Role::Employee) => Ok(()),
                _ => {
                    warn!(user_id = %user.id, team_id, "Root folder creation refused");
                    Err(VaultError::denied("create folders"))
                }
            };
        }

        let parent_id = parent_folder_id.unwrap_or_default();
        let parent = self
            .store
            .get_folder(parent_id)
            .await?
            .filter(|p| p.team_id == team_id)
            .ok_or_else(|| VaultError::ParentNotFound(parent_id.to_string()))?;

        if !self.check_action(user, &parent, FolderAction::Edit).await? {
            warn!(user_id = %user.id, parent_id, "Subfolder creation refused");
            return Err(VaultError::denied("create folders"));
        }
        Ok(())
    }

    /// Folders directly under `parent_folder_id` that `user` may view
    pub async fn list_visible(
        &self,
        user: &User,
        team_id: &str,
        parent_folder_id: Option<&str>,
    ) -> VaultResult<Vec<Folder>> {
        let parent = if self.config.is_root_parent(parent_folder_id) {
            None
        } else {
            parent_folder_id
        };

        let team_folders = self.store.list_team_folders(team_id).await?;
        let folder_map = index_folders(&team_folders);
        let listed = self.store.list_folders(team_id, parent).await?;
        let total = listed.len();

        let visible: Vec<Folder> = listed
            .into_iter()
            .filter(|f| self.allowed(f, &folder_map, user, FolderAction::View))
            .collect();

        debug!(
            team_id,
            user_id = %user.id,
            total,
            visible = visible.len(),
            "Filtered folder listing"
        );
        Ok(visible)
    }

    /// Visible folders of a team arranged by parent
    ///
    /// A folder whose parent is hidden from `user` is left out together
    /// with its descendants.
    pub async fn folder_tree(&self, user: &User, team_id: &str) -> VaultResult<Vec<FolderTreeNode>> {
        let team_folders = self.store.list_team_folders(team_id).await?;
        let visible =
            filter_visible_with_inheritance(&team_folders, user, self.config.inheritance_mode);
        Ok(build_tree(&visible, None))
    }

    /// Fetch a folder `user` may view
    ///
    /// Folders that exist but are hidden from `user` are reported as not found.
    pub async fn get_folder_for(&self, user: &User, folder_id: &str) -> VaultResult<Folder> {
        let folder = self
            .store
            .get_folder(folder_id)
            .await?
            .ok_or_else(|| VaultError::FolderNotFound(folder_id.to_string()))?;

        if !self.check_action(user, &folder, FolderAction::View).await? {
            return Err(VaultError::FolderNotFound(folder_id.to_string()));
        }
        Ok(folder)
    }

    /// Whether `user` may perform `action` on `folder` once inheritance is resolved
    pub async fn check_action(
        &self,
        user: &User,
        folder: &Folder,
        action: FolderAction,
    ) -> VaultResult<bool> {
        let mut chain = Vec::new();
        if folder.inherit_permissions {
            for ancestor_id in folder.ancestor_ids() {
                if let Some(ancestor) = self.store.get_folder(ancestor_id).await? {
                    chain.push(ancestor);
                }
            }
        }
        chain.push(folder.clone());

        let folder_map = index_folders(&chain);
        Ok(self.allowed(folder, &folder_map, user, action))
    }

    /// Change a folder's grants, inherit flag, tags or color
    pub async fn update_settings(
        &self,
        user: &User,
        folder_id: &str,
        request: UpdateFolderSettingsRequest,
    ) -> VaultResult<Folder> {
        validate_settings_update(&request, &self.config)?;

        // Admins may repair folders whose grants no longer let them view.
        let mut folder = self
            .store
            .get_folder(folder_id)
            .await?
            .ok_or_else(|| VaultError::FolderNotFound(folder_id.to_string()))?;
        if !can_manage_folder(user, &folder.team_id) {
            if !self.check_action(user, &folder, FolderAction::View).await? {
                return Err(VaultError::FolderNotFound(folder_id.to_string()));
            }
            warn!(user_id = %user.id, folder_id, "Folder settings update refused");
            return Err(VaultError::denied("manage this folder"));
        }

        if request
            .contractor_access
            .as_ref()
            .is_some_and(|ids| !ids.is_empty())
        {
            self.ensure_accepts_contractors(&folder.team_id).await?;
        }

        if let Some(permissions) = request.permissions {
            folder.permissions = permissions;
        }
        if let Some(contractor_access) = request.contractor_access {
            folder.contractor_access = contractor_access;
        }
        if let Some(inherit) = request.inherit_permissions {
            folder.inherit_permissions = inherit;
        }
        if let Some(tags) = request.tags {
            folder.tags = tags;
        }
        if let Some(color) = request.color {
            folder.color = color;
        }
        folder.updated_at = Utc::now();

        self.store.set_folder(&folder).await?;
        info!(folder_id, user_id = %user.id, "Folder settings updated");
        Ok(folder)
    }

    /// Enumerate the subtree rooted at `folder_id` without touching it
    ///
    /// `user` needs effective delete rights on each folder of the subtree,
    /// the same check a recursive delete makes.
    pub async fn plan_deletion(&self, user: &User, folder_id: &str) -> VaultResult<DeletionPlan> {
        self.get_folder_for(user, folder_id).await?;
        let (plan, team_folders) = self.collect_plan(folder_id).await?;

        let folder_map = index_folders(&team_folders);
        if let Some(blocked) = plan
            .folders
            .iter()
            .find(|f| !self.allowed(f, &folder_map, user, FolderAction::Delete))
        {
            warn!(
                user_id = %user.id,
                folder_id,
                blocked_by = %blocked.id,
                "Recursive delete refused"
            );
            return Err(VaultError::denied(FolderAction::Delete));
        }
        Ok(plan)
    }

    /// Delete a folder together with every subfolder and document below it
    ///
    /// Nothing is removed unless [`plan_deletion`](Self::plan_deletion)
    /// succeeds for `user`.
    pub async fn delete_folder_recursive(
        &self,
        user: &User,
        folder_id: &str,
    ) -> VaultResult<DeletionPlan> {
        let plan = self.plan_deletion(user, folder_id).await?;

        for document in &plan.documents {
            self.store.delete_document(&document.id).await?;
        }
        for folder in &plan.folders {
            self.store.delete_folder(&folder.id).await?;
        }

        info!(
            folder_id,
            user_id = %user.id,
            folders = plan.folders.len(),
            documents = plan.documents.len(),
            "Folder subtree deleted"
        );
        Ok(plan)
    }

    async fn collect_plan(&self, folder_id: &str) -> VaultResult<(DeletionPlan, Vec<Folder>)> {
        let root = self
            .store
            .get_folder(folder_id)
            .await?
            .ok_or_else(|| VaultError::FolderNotFound(folder_id.to_string()))?;
        let team_folders = self.store.list_team_folders(&root.team_id).await?;

        let mut folders = subtree(&root, &team_folders);
        folders.reverse();

        let mut documents = Vec::new();
        for folder in &folders {
            documents.extend(self.store.list_documents(&folder.id).await?);
        }

        Ok((DeletionPlan { folders, documents }, team_folders))
    }

    async fn ensure_accepts_contractors(&self, team_id: &str) -> VaultResult<()> {
        let team = self
            .store
            .get_team(team_id)
            .await?
            .ok_or_else(|| VaultError::TeamNotFound(team_id.to_string()))?;
        if !team.accepts_contractors() {
            return Err(VaultError::Validation(
                "Personal workspaces cannot grant contractor access".to_string(),
            ));
        }
        Ok(())
    }

    fn allowed(
        &self,
        folder: &Folder,
        folder_map: &FolderMap<'_>,
        user: &User,
        action: FolderAction,
    ) -> bool {
        let effective =
            resolve_with_mode(folder, folder_map, self.config.inheritance_mode).apply_to(folder);
        can_perform(&effective, user, action)
    }
}

/// `root` and its descendants in breadth-first order, following parent links
fn subtree(root: &Folder, team_folders: &[Folder]) -> Vec<Folder> {
    let mut seen = HashSet::from([root.id.clone()]);
    let mut ordered = vec![root.clone()];
    let mut next = 0;

    while next < ordered.len() {
        let parent_id = ordered[next].id.clone();
        for child in team_folders
            .iter()
            .filter(|f| f.parent_folder_id.as_deref() == Some(parent_id.as_str()))
        {
            if seen.insert(child.id.clone()) {
                ordered.push(child.clone());
            }
        }
        next += 1;
    }
    ordered
}

fn build_tree(folders: &[Folder], parent: Option<&str>) -> Vec<FolderTreeNode> {
    folders
        .iter()
        .filter(|f| f.parent_folder_id.as_deref() == parent)
        .map(|f| FolderTreeNode {
            id: f.id.clone(),
            name: f.name.clone(),
            path: f.path.clone(),
            color: f.color,
            children: build_tree(folders, Some(&f.id)),
        })
        .collect()
}
