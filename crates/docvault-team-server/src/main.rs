//! DocVault Team Server - Standalone team folder server
//!
//! Serves the folder API over SQLite. Users are authenticated upstream and
//! identified by a forwarded header.

mod config;
mod identity;
mod state;

use anyhow::Result;
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docvault_team::routes::VaultState;
use docvault_team::services::SqliteStore;

use crate::config::{Config, LogFormat};
use crate::identity::identity_middleware;
use crate::state::AppState;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "docvault-team-server", version, about)]
struct Cli {
    /// TOML config file; environment variables are used when absent
    #[arg(short, long, env = "DOCVAULT_CONFIG")]
    config: Option<String>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let mut config = match cli.config.as_deref() {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    init_tracing(config.log_format);
    info!(
        "Starting DocVault Team Server on {}:{} (inheritance: {})",
        config.host, config.port, config.vault.inheritance_mode
    );

    // Initialize database
    let database_url = config.database_url.clone();
    info!("Connecting to database: {}", database_url);

    // Ensure parent directory exists for SQLite
    if database_url.starts_with("sqlite:") {
        let path = database_url.trim_start_matches("sqlite:");
        let path = path.trim_start_matches("//");
        // Remove query string for path extraction
        let path = path.split('?').next().unwrap_or(path);
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&database_url)
        .await?;

    // Run migrations
    info!("Running database migrations...");
    docvault_team::migrations::run_migration(&pool).await?;
    info!("Database migrations completed");

    let state = Arc::new(AppState {
        pool: Arc::new(pool),
        config: config.clone(),
    });

    let app = build_router(state);

    // Start server
    let addr = SocketAddr::new(config.host.parse()?, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "docvault_team_server=info,docvault_team=info,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // CORS configuration
    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    }
    .allow_methods(Any)
    .allow_headers(Any);

    // Public routes (no identity required)
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .with_state(state.clone());

    let store = Arc::new(SqliteStore::new(state.pool.clone()));
    let vault_routes = docvault_team::routes::configure(VaultState::new(
        store,
        state.config.vault.clone(),
    ))
    .layer(axum::middleware::from_fn_with_state(
        state.clone(),
        identity_middleware,
    ));

    Router::new()
        .merge(public_routes)
        .nest("/api/vault", vault_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn root() -> &'static str {
    "DocVault Team Server"
}

async fn health_check(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>, StatusCode> {
    // Check database connection
    match sqlx::query("SELECT 1").fetch_one(state.pool.as_ref()).await {
        Ok(_) => Ok(Json(serde_json::json!({
            "status": "healthy",
            "database": "connected",
            "version": env!("CARGO_PKG_VERSION")
        }))),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}
