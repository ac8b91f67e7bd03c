//! Storage capability for projects.
//!
//! This crate provides:
//!
//! - [`ProjectStore`] — the storage trait handlers talk to, chosen at
//!   startup (Postgres or in-memory) and injected as a trait object.
//! - [`PgStore`] — Postgres implementation over sqlx.
//! - [`MemoryStore`] — in-memory implementation for development without a
//!   database and for tests.
//! - [`mutate`] — the single typed mutation path, owning the
//!   optimistic-concurrency protocol (version compare-and-swap with
//!   bounded retries).

pub mod memory;
pub mod pg;

use async_trait::async_trait;
use uuid::Uuid;

use docforge_core::error::CoreError;
use docforge_core::project::Project;

pub use memory::MemoryStore;
pub use pg::PgStore;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced by a [`ProjectStore`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Stored data could not be decoded: {0}")]
    Decode(String),
}

/// Errors produced by the [`mutate`] path.
#[derive(Debug, thiserror::Error)]
pub enum MutateError {
    #[error("Entity not found: Project with id {0}")]
    NotFound(Uuid),
    #[error("Project {0} was modified concurrently and retries were exhausted")]
    Contention(Uuid),
    #[error(transparent)]
    Domain(#[from] CoreError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Storage operations for projects.
///
/// `update` is a compare-and-swap: the write applies only when the stored
/// version still equals `expected_version`. Callers that lose the race get
/// `Ok(false)` and are expected to reload (see [`mutate`]).
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Persist a new project.
    async fn create(&self, project: &Project) -> Result<(), StoreError>;

    /// Fetch a project by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, StoreError>;

    /// List a user's projects, newest first.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Project>, StoreError>;

    /// Write `project` if the stored version equals `expected_version`.
    ///
    /// Returns `Ok(false)` when the version no longer matches or the row
    /// is gone.
    async fn update(&self, project: &Project, expected_version: i64) -> Result<bool, StoreError>;

    /// Delete a project. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Cheap backend reachability probe for the health endpoint.
    async fn health_check(&self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Mutation path
// ---------------------------------------------------------------------------

/// How many times [`mutate`] attempts the load-apply-swap cycle before
/// giving up with [`MutateError::Contention`].
pub const MAX_MUTATE_ATTEMPTS: u32 = 3;

/// Load a project, apply `f`, and save with a version compare-and-swap.
///
/// On a lost race the cycle restarts from a fresh load, up to
/// [`MAX_MUTATE_ATTEMPTS`] times. Every successful write bumps `version`
/// and refreshes `updated_at`, so the closure only has to express the
/// domain change itself. Returns the saved project plus whatever `f`
/// produced on the winning attempt.
pub async fn mutate<S, F, T>(store: &S, id: Uuid, mut f: F) -> Result<(Project, T), MutateError>
where
    S: ProjectStore + ?Sized,
    F: FnMut(&mut Project) -> Result<T, CoreError>,
{
    for attempt in 1..=MAX_MUTATE_ATTEMPTS {
        let mut project = store
            .find_by_id(id)
            .await?
            .ok_or(MutateError::NotFound(id))?;
        let expected = project.version;

        let value = f(&mut project)?;

        project.touch();
        project.version = expected + 1;

        if store.update(&project, expected).await? {
            return Ok((project, value));
        }

        tracing::debug!(
            project_id = %id,
            attempt,
            "Lost project version race, reloading"
        );
    }

    Err(MutateError::Contention(id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
