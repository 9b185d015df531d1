//! Boundary validation for folder names and RBAC settings
//!
//! Unknown role tags and actions never reach this point: they fail to
//! deserialize into [`Role`](crate::models::Role) and
//! [`FolderAction`](crate::models::FolderAction). What remains is checked
//! here once, before anything is persisted, so the evaluator can trust
//! stored records.

use std::collections::HashSet;
use validator::Validate;

use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};
use crate::models::{FolderPermission, RbacOptions, UpdateFolderSettingsRequest};

/// Validate a folder name before it becomes part of a path
pub fn validate_folder_name(name: &str, config: &VaultConfig) -> VaultResult<()> {
    if name.trim().is_empty() {
        return Err(VaultError::Validation(
            "Folder name cannot be empty".to_string(),
        ));
    }

    // Path segments are joined with '/', so a name may not contain one.
    if name.contains('/') || name.contains('\0') {
        return Err(VaultError::Validation(format!(
            "Folder name contains forbidden characters: {}",
            name
        )));
    }

    if name.chars().count() > config.max_folder_name_length {
        return Err(VaultError::Validation(format!(
            "Folder name exceeds {} characters",
            config.max_folder_name_length
        )));
    }

    Ok(())
}

/// At most one entry per role and no repeated actions within an entry
pub fn validate_permissions(permissions: &[FolderPermission]) -> VaultResult<()> {
    let mut roles = HashSet::new();
    for permission in permissions {
        if !roles.insert(permission.role) {
            return Err(VaultError::Validation(format!(
                "Duplicate permission entry for role {}",
                permission.role
            )));
        }

        let mut actions = HashSet::new();
        if let Some(repeated) = permission.actions.iter().find(|a| !actions.insert(**a)) {
            return Err(VaultError::Validation(format!(
                "Action {} listed twice for role {}",
                repeated, permission.role
            )));
        }
    }
    Ok(())
}

pub fn validate_tags(tags: &[String], config: &VaultConfig) -> VaultResult<()> {
    if tags.len() > config.max_tags_per_folder {
        return Err(VaultError::Validation(format!(
            "A folder can carry at most {} tags",
            config.max_tags_per_folder
        )));
    }
    if tags.iter().any(|t| t.trim().is_empty()) {
        return Err(VaultError::Validation("Tags cannot be empty".to_string()));
    }
    Ok(())
}

pub fn validate_contractor_access(user_ids: &[String]) -> VaultResult<()> {
    if user_ids.iter().any(|id| id.trim().is_empty()) {
        return Err(VaultError::Validation(
            "Contractor access entries must be user ids".to_string(),
        ));
    }
    Ok(())
}

/// Validate options supplied at folder creation
pub fn validate_rbac_options(options: &RbacOptions, config: &VaultConfig) -> VaultResult<()> {
    options.validate()?;
    validate_optional_fields(
        options.permissions.as_deref(),
        options.contractor_access.as_deref(),
        options.tags.as_deref(),
        config,
    )
}

/// Validate an admin settings update
pub fn validate_settings_update(
    request: &UpdateFolderSettingsRequest,
    config: &VaultConfig,
) -> VaultResult<()> {
    request.validate()?;
    validate_optional_fields(
        request.permissions.as_deref(),
        request.contractor_access.as_deref(),
        request.tags.as_deref(),
        config,
    )
}

fn validate_optional_fields(
    permissions: Option<&[FolderPermission]>,
    contractor_access: Option<&[String]>,
    tags: Option<&[String]>,
    config: &VaultConfig,
) -> VaultResult<()> {
    if let Some(permissions) = permissions {
        validate_permissions(permissions)?;
    }
    if let Some(ids) = contractor_access {
        validate_contractor_access(ids)?;
    }
    if let Some(tags) = tags {
        validate_tags(tags, config)?;
    }
    Ok(())
}
