//! Postgres [`ProjectStore`] over sqlx.
//!
//! Projects are stored with typed columns for everything queried or
//! CAS-checked, plus the item tree as one JSONB column. Pool creation,
//! health checking and migrations live here so the binary has a single
//! module to call at startup.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use docforge_core::project::{ContentItem, Project};
use docforge_core::types::Timestamp;

use crate::{ProjectStore, StoreError};

/// Maximum connections held by the pool.
const MAX_CONNECTIONS: u32 = 20;

/// Column list for `projects` queries.
const COLUMNS: &str = "\
    id, user_id, title, kind, topic, description, \
    version, created_at, updated_at, items";

/// Create a connection pool for the given database URL.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Apply pending migrations from `crates/store/migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

/// Raw `projects` row; `kind` stays a string until decoded.
#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    user_id: String,
    title: String,
    kind: String,
    topic: String,
    description: Option<String>,
    version: i64,
    created_at: Timestamp,
    updated_at: Timestamp,
    items: sqlx::types::Json<Vec<ContentItem>>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = StoreError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let kind = row.kind.parse().map_err(|_| {
            StoreError::Decode(format!(
                "unknown document kind '{}' on project {}",
                row.kind, row.id
            ))
        })?;

        Ok(Project {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            kind,
            topic: row.topic,
            description: row.description,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
            items: row.items.0,
        })
    }
}

// ---------------------------------------------------------------------------
// Store implementation
// ---------------------------------------------------------------------------

/// Postgres-backed project storage.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProjectStore for PgStore {
    async fn create(&self, project: &Project) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO projects \
                 (id, user_id, title, kind, topic, description, \
                  version, created_at, updated_at, items) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(project.id)
        .bind(&project.user_id)
        .bind(&project.title)
        .bind(project.kind.as_str())
        .bind(&project.topic)
        .bind(&project.description)
        .bind(project.version)
        .bind(project.created_at)
        .bind(project.updated_at)
        .bind(sqlx::types::Json(&project.items))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Project::try_from).transpose()
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Project>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Project::try_from).collect()
    }

    async fn update(&self, project: &Project, expected_version: i64) -> Result<bool, StoreError> {
        // Compare-and-swap: the WHERE clause enforces the version match,
        // rows_affected tells us who won.
        let result = sqlx::query(
            "UPDATE projects SET \
                 title = $1, topic = $2, description = $3, \
                 items = $4, version = $5, updated_at = $6 \
             WHERE id = $7 AND version = $8",
        )
        .bind(&project.title)
        .bind(&project.topic)
        .bind(&project.description)
        .bind(sqlx::types::Json(&project.items))
        .bind(project.version)
        .bind(project.updated_at)
        .bind(project.id)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
