//! Application state

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::Config;

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<SqlitePool>,
    pub config: Config,
}
