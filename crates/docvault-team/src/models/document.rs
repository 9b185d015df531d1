//! Document model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Uploaded document, owned by exactly one folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub team_id: String,
    pub folder_id: String,
    pub name: String,
    /// Blob store reference
    pub url: String,
    #[serde(default)]
    pub size: u64,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(team_id: String, folder_id: String, name: String, uploaded_by: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            team_id,
            folder_id,
            name,
            url: String::new(),
            size: 0,
            uploaded_by,
            created_at: Utc::now(),
        }
    }
}
