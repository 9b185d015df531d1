//! Vault configuration module

use serde::{Deserialize, Serialize};

use crate::security::InheritanceMode;

/// Folder and permission configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// How far inheriting folders look up the tree for permissions
    #[serde(default)]
    pub inheritance_mode: InheritanceMode,

    /// Maximum folder name length in characters
    #[serde(default = "default_max_name_length")]
    pub max_folder_name_length: usize,

    /// Maximum number of tags on a single folder
    #[serde(default = "default_max_tags")]
    pub max_tags_per_folder: usize,

    /// Parent id that callers use to address the top of a team's tree
    #[serde(default = "default_root_sentinel")]
    pub root_sentinel: String,
}

fn default_max_name_length() -> usize {
    200
}

fn default_max_tags() -> usize {
    20
}

fn default_root_sentinel() -> String {
    "home".to_string()
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            inheritance_mode: InheritanceMode::default(),
            max_folder_name_length: default_max_name_length(),
            max_tags_per_folder: default_max_tags(),
            root_sentinel: default_root_sentinel(),
        }
    }
}

impl VaultConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different inheritance mode
    pub fn with_inheritance_mode(mut self, mode: InheritanceMode) -> Self {
        self.inheritance_mode = mode;
        self
    }

    /// Whether a requested parent id denotes the root of the tree
    pub fn is_root_parent(&self, parent_folder_id: Option<&str>) -> bool {
        match parent_folder_id {
            None => true,
            Some(id) => id.is_empty() || id == self.root_sentinel,
        }
    }
}
