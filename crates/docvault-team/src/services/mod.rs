//! Services module - business logic layer
//!
//! Services reach storage only through the traits in [`store`], so the same
//! logic runs over [`MemoryStore`] in tests and [`SqliteStore`] in the server.

pub mod folder_service;
pub mod memory_store;
pub mod sqlite_store;
pub mod store;
pub mod team_service;

pub use folder_service::{slugify, DeletionPlan, FolderService};
pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;
pub use store::{DirectoryStore, DocumentStore, FolderStore, VaultStore};
pub use team_service::{ContractorListResponse, MemberListResponse, TeamMemberSummary, TeamService};

use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared database pool type
pub type DbPool = Arc<SqlitePool>;
