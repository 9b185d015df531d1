//! Database migrations for the vault module

/// Migration SQL for vault tables
pub const MIGRATION_SQL: &str = r#"
-- teams: tenant boundary, 'self' marks a personal workspace
CREATE TABLE IF NOT EXISTS teams (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_by TEXT NOT NULL,
    team_type TEXT NOT NULL DEFAULT 'team',
    created_at TEXT DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_teams_creator ON teams(created_by);

-- users: identity records mirrored from the identity service
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL DEFAULT '',
    current_team TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);

-- team_memberships: one row per (user, team)
CREATE TABLE IF NOT EXISTS team_memberships (
    user_id TEXT NOT NULL,
    team_id TEXT NOT NULL,
    role TEXT NOT NULL,
    team_name TEXT NOT NULL DEFAULT '',
    image_url TEXT NOT NULL DEFAULT '',
    position INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, team_id)
);
CREATE INDEX IF NOT EXISTS idx_memberships_team ON team_memberships(team_id);

-- folders: per-team hierarchy with materialized lineage and grants
CREATE TABLE IF NOT EXISTS folders (
    id TEXT PRIMARY KEY,
    team_id TEXT NOT NULL,
    name TEXT NOT NULL,
    path TEXT NOT NULL,
    parent_folder_id TEXT,
    lineage_json TEXT NOT NULL DEFAULT '[]',
    permissions_json TEXT NOT NULL DEFAULT '[]',
    contractor_access_json TEXT NOT NULL DEFAULT '[]',
    inherit_permissions INTEGER NOT NULL DEFAULT 0,
    tags_json TEXT NOT NULL DEFAULT '[]',
    color TEXT NOT NULL DEFAULT 'blue',
    created_by TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_folders_team ON folders(team_id);
CREATE INDEX IF NOT EXISTS idx_folders_parent ON folders(team_id, parent_folder_id);

-- documents: leaf records owned by one folder
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    team_id TEXT NOT NULL,
    folder_id TEXT NOT NULL,
    name TEXT NOT NULL,
    url TEXT NOT NULL DEFAULT '',
    size INTEGER NOT NULL DEFAULT 0,
    uploaded_by TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_documents_folder ON documents(folder_id);
"#;

/// Create every table and index that is still missing
pub async fn run_migration(pool: &sqlx::SqlitePool) -> Result<(), sqlx::Error> {
    for statement in MIGRATION_SQL.split(';').map(str::trim) {
        if !statement.is_empty() {
            sqlx::query(statement).execute(pool).await?;
        }
    }
    Ok(())
}
