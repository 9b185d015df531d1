//! Error types for the vault module

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Result type alias for vault operations
pub type VaultResult<T> = Result<T, VaultError>;

/// Vault module error types
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Parent folder not found: {0}")]
    ParentNotFound(String),

    #[error("Team not found: {0}")]
    TeamNotFound(String),

    #[error("User is not a member of team: {team_id}")]
    MemberNotFound { team_id: String },

    #[error("User already has a membership in team: {team_id}")]
    MemberExists { team_id: String },

    #[error("Permission denied: {action}")]
    PermissionDenied { action: String },

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for VaultError {
    fn from(err: sqlx::Error) -> Self {
        VaultError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}

impl From<validator::ValidationErrors> for VaultError {
    fn from(err: validator::ValidationErrors) -> Self {
        VaultError::Validation(err.to_string())
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl VaultError {
    /// Convert to API error code
    pub fn code(&self) -> &'static str {
        match self {
            VaultError::FolderNotFound(_) => "FOLDER_NOT_FOUND",
            VaultError::ParentNotFound(_) => "PARENT_NOT_FOUND",
            VaultError::TeamNotFound(_) => "TEAM_NOT_FOUND",
            VaultError::MemberNotFound { .. } => "MEMBER_NOT_FOUND",
            VaultError::MemberExists { .. } => "MEMBER_EXISTS",
            VaultError::PermissionDenied { .. } => "PERMISSION_DENIED",
            VaultError::Unauthenticated => "UNAUTHENTICATED",
            VaultError::Validation(_) => "VALIDATION_ERROR",
            VaultError::Database(_) => "DATABASE_ERROR",
            VaultError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            VaultError::FolderNotFound(_)
            | VaultError::TeamNotFound(_)
            | VaultError::MemberNotFound { .. } => StatusCode::NOT_FOUND,

            // The request names a parent that cannot be used, so it is the caller's input at fault.
            VaultError::ParentNotFound(_) => StatusCode::UNPROCESSABLE_ENTITY,

            VaultError::PermissionDenied { .. } => StatusCode::FORBIDDEN,

            VaultError::Unauthenticated => StatusCode::UNAUTHORIZED,

            VaultError::MemberExists { .. } => StatusCode::CONFLICT,

            VaultError::Validation(_) => StatusCode::BAD_REQUEST,

            VaultError::Database(_) | VaultError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub(crate) fn denied(action: impl std::fmt::Display) -> Self {
        VaultError::PermissionDenied {
            action: action.to_string(),
        }
    }
}

impl IntoResponse for VaultError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        }
        let body = ApiError {
            code: self.code().to_string(),
            message: self.to_string(),
            details: None,
        };

        (status, axum::Json(body)).into_response()
    }
}
