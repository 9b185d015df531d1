//! SQLite-backed store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::warn;

use super::store::{DirectoryStore, DocumentStore, FolderStore};
use super::DbPool;
use crate::error::{VaultError, VaultResult};
use crate::models::{Document, Folder, Role, Team, TeamMembership, User};

type FolderRow = (
    String,
    String,
    String,
    String,
    Option<String>,
    String,
    String,
    String,
    bool,
    String,
    String,
    String,
    String,
    String,
);

const FOLDER_COLUMNS: &str = "id, team_id, name, path, parent_folder_id, lineage_json, permissions_json, \
     contractor_access_json, inherit_permissions, tags_json, color, created_by, created_at, updated_at";

type DocumentRow = (String, String, String, String, String, i64, String, String);

/// Store implementation over the vault's SQLite schema
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert or replace a user together with its memberships
    pub async fn upsert_user(&self, user: &User) -> VaultResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, current_team, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                current_team = excluded.current_team
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.current_team)
        .bind(user.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM team_memberships WHERE user_id = ?")
            .bind(&user.id)
            .execute(&mut *tx)
            .await?;

        for (position, membership) in user.teams.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO team_memberships (user_id, team_id, role, team_name, image_url, position)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&user.id)
            .bind(&membership.team_id)
            .bind(membership.role.as_tag().to_lowercase())
            .bind(&membership.name)
            .bind(&membership.image_url)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Insert or replace a team record
    pub async fn upsert_team(&self, team: &Team) -> VaultResult<()> {
        sqlx::query(
            r#"
            INSERT INTO teams (id, name, created_by, team_type, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                team_type = excluded.team_type
            "#,
        )
        .bind(&team.id)
        .bind(&team.name)
        .bind(&team.created_by)
        .bind(team.team_type.to_string())
        .bind(team.created_at.to_rfc3339())
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    pub async fn insert_document(&self, document: &Document) -> VaultResult<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (id, team_id, folder_id, name, url, size, uploaded_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&document.id)
        .bind(&document.team_id)
        .bind(&document.folder_id)
        .bind(&document.name)
        .bind(&document.url)
        .bind(i64::try_from(document.size).map_err(|_| {
            VaultError::Validation(format!("Document size out of range: {}", document.size))
        })?)
        .bind(&document.uploaded_by)
        .bind(document.created_at.to_rfc3339())
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    async fn memberships(&self, user_id: &str) -> VaultResult<Vec<TeamMembership>> {
        let rows = sqlx::query_as::<_, (String, String, String, String)>(
            r#"
            SELECT team_id, role, team_name, image_url
            FROM team_memberships
            WHERE user_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(team_id, role, name, image_url)| match role.parse::<Role>() {
                Ok(role) => Some(TeamMembership {
                    team_id,
                    role,
                    name,
                    image_url,
                }),
                Err(e) => {
                    // An unreadable role grants nothing.
                    warn!(user_id, team_id = %team_id, "Dropping membership: {}", e);
                    None
                }
            })
            .collect())
    }
}

fn parse_timestamp(raw: &str) -> VaultResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| VaultError::Database(format!("Invalid timestamp '{}': {}", raw, e)))
}

fn folder_from_row(row: FolderRow) -> VaultResult<Folder> {
    let color = row.10.parse().unwrap_or_else(|e| {
        warn!(folder_id = %row.0, "{}", e);
        Default::default()
    });

    Ok(Folder {
        lineage: serde_json::from_str(&row.5)?,
        permissions: serde_json::from_str(&row.6)?,
        contractor_access: serde_json::from_str(&row.7)?,
        inherit_permissions: row.8,
        tags: serde_json::from_str(&row.9)?,
        color,
        created_by: row.11,
        created_at: parse_timestamp(&row.12)?,
        updated_at: parse_timestamp(&row.13)?,
        id: row.0,
        team_id: row.1,
        name: row.2,
        path: row.3,
        parent_folder_id: row.4,
    })
}

fn document_from_row(row: DocumentRow) -> VaultResult<Document> {
    Ok(Document {
        size: u64::try_from(row.5)
            .map_err(|_| VaultError::Database(format!("Negative size for document {}", row.0)))?,
        created_at: parse_timestamp(&row.7)?,
        id: row.0,
        team_id: row.1,
        folder_id: row.2,
        name: row.3,
        url: row.4,
        uploaded_by: row.6,
    })
}

#[async_trait]
impl FolderStore for SqliteStore {
    async fn get_folder(&self, folder_id: &str) -> VaultResult<Option<Folder>> {
        let row = sqlx::query_as::<_, FolderRow>(&format!(
            "SELECT {} FROM folders WHERE id = ?",
            FOLDER_COLUMNS
        ))
        .bind(folder_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(folder_from_row).transpose()
    }

    async fn set_folder(&self, folder: &Folder) -> VaultResult<()> {
        sqlx::query(
            r#"
            INSERT INTO folders (id, team_id, name, path, parent_folder_id, lineage_json, permissions_json,
                                 contractor_access_json, inherit_permissions, tags_json, color, created_by,
                                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                path = excluded.path,
                parent_folder_id = excluded.parent_folder_id,
                lineage_json = excluded.lineage_json,
                permissions_json = excluded.permissions_json,
                contractor_access_json = excluded.contractor_access_json,
                inherit_permissions = excluded.inherit_permissions,
                tags_json = excluded.tags_json,
                color = excluded.color,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&folder.id)
        .bind(&folder.team_id)
        .bind(&folder.name)
        .bind(&folder.path)
        .bind(&folder.parent_folder_id)
        .bind(serde_json::to_string(&folder.lineage)?)
        .bind(serde_json::to_string(&folder.permissions)?)
        .bind(serde_json::to_string(&folder.contractor_access)?)
        .bind(folder.inherit_permissions)
        .bind(serde_json::to_string(&folder.tags)?)
        .bind(folder.color.to_string())
        .bind(&folder.created_by)
        .bind(folder.created_at.to_rfc3339())
        .bind(folder.updated_at.to_rfc3339())
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    async fn list_folders(
        &self,
        team_id: &str,
        parent_folder_id: Option<&str>,
    ) -> VaultResult<Vec<Folder>> {
        // `IS` matches NULL as well as equal values.
        let rows = sqlx::query_as::<_, FolderRow>(&format!(
            "SELECT {} FROM folders WHERE team_id = ? AND parent_folder_id IS ? ORDER BY created_at ASC, rowid ASC",
            FOLDER_COLUMNS
        ))
        .bind(team_id)
        .bind(parent_folder_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(folder_from_row).collect()
    }

    async fn list_team_folders(&self, team_id: &str) -> VaultResult<Vec<Folder>> {
        let rows = sqlx::query_as::<_, FolderRow>(&format!(
            "SELECT {} FROM folders WHERE team_id = ? ORDER BY created_at ASC, rowid ASC",
            FOLDER_COLUMNS
        ))
        .bind(team_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(folder_from_row).collect()
    }

    async fn delete_folder(&self, folder_id: &str) -> VaultResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = ?")
            .bind(folder_id)
            .execute(self.pool.as_ref())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn list_documents(&self, folder_id: &str) -> VaultResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, team_id, folder_id, name, url, size, uploaded_by, created_at
            FROM documents
            WHERE folder_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(folder_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(document_from_row).collect()
    }

    async fn delete_document(&self, document_id: &str) -> VaultResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(document_id)
            .execute(self.pool.as_ref())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl DirectoryStore for SqliteStore {
    async fn get_user(&self, user_id: &str) -> VaultResult<Option<User>> {
        let row = sqlx::query_as::<_, (String, String, String, Option<String>, String)>(
            "SELECT id, name, email, current_team, created_at FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        let Some((id, name, email, current_team, created_at)) = row else {
            return Ok(None);
        };

        let teams = self.memberships(&id).await?;
        Ok(Some(User {
            id,
            name,
            email,
            teams,
            current_team,
            created_at: parse_timestamp(&created_at)?,
        }))
    }

    async fn get_team(&self, team_id: &str) -> VaultResult<Option<Team>> {
        let row = sqlx::query_as::<_, (String, String, String, String, String)>(
            "SELECT id, name, created_by, team_type, created_at FROM teams WHERE id = ?",
        )
        .bind(team_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        let Some((id, name, created_by, team_type, created_at)) = row else {
            return Ok(None);
        };

        let members: Vec<(String,)> = sqlx::query_as(
            "SELECT user_id FROM team_memberships WHERE team_id = ? ORDER BY user_id ASC",
        )
        .bind(&id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(Some(Team {
            team_type: team_type.parse().map_err(VaultError::Database)?,
            members: members.into_iter().map(|(user_id,)| user_id).collect(),
            created_at: parse_timestamp(&created_at)?,
            id,
            name,
            created_by,
        }))
    }

    async fn list_team_users(&self, team_id: &str) -> VaultResult<Vec<User>> {
        let user_ids: Vec<(String,)> = sqlx::query_as(
            "SELECT user_id FROM team_memberships WHERE team_id = ? ORDER BY user_id ASC",
        )
        .bind(team_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut users = Vec::with_capacity(user_ids.len());
        for (user_id,) in user_ids {
            if let Some(user) = self.get_user(&user_id).await? {
                users.push(user);
            }
        }
        Ok(users)
    }
}
