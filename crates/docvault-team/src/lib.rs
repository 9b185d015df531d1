//! DocVault Team Folder Module
//!
//! This module provides the folder access-control core of a multi-tenant
//! document vault: teams own folder trees, and every folder carries
//! role-based grants plus an explicit contractor allow-list.
//!
//! # Features
//! - Role resolution from a user's team memberships
//! - Permission evaluation and visibility filtering
//! - One-level or transitive permission inheritance
//! - Folder creation with materialized lineage and slug paths
//! - Recursive folder deletion planned before anything is removed
//! - SQLite and in-memory storage backends
//! - Axum HTTP routes

pub mod config;
pub mod error;
pub mod migrations;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;

#[cfg(test)]
mod test_support;

pub use config::VaultConfig;
pub use error::{VaultError, VaultResult};

/// Authenticated user ID from auth middleware
#[derive(Clone, Debug)]
pub struct AuthenticatedUserId(pub String);

impl AuthenticatedUserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
