//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use docforge_core::error::CoreError;
use docforge_core::project::{NewProject, Project, UpdateProject};
use docforge_genai::fallback;
use docforge_store::mutate;

use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a project and verify it belongs to `user`.
///
/// Shared by every read path; write paths re-check ownership inside the
/// [`mutate`] closure so the check runs against the freshly loaded row.
pub(crate) async fn load_owned(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<Project> {
    let project = state
        .store
        .find_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    project.ensure_owned_by(&user.user_id)?;
    Ok(project)
}

/// POST /api/v1/projects
///
/// Generates the outline before the project is persisted; if generation
/// fails the project is still created, seeded from [`fallback::outline`].
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<NewProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input.validate()?;

    let outline = match state.generator.generate_outline(&input.topic, input.kind).await {
        Ok(titles) => titles,
        Err(error) => {
            tracing::warn!(%error, "Outline generation failed, seeding the fallback outline");
            fallback::outline()
        }
    };

    let project = Project::new(user.user_id.clone(), input, outline);
    state.store.create(&project).await?;

    tracing::info!(
        user_id = %user.user_id,
        project_id = %project.id,
        items = project.items.len(),
        "Project created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = state.store.list_by_user(&user.user_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = load_owned(&state, &user, id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
///
/// Partial update: absent fields keep their stored values.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    input.validate()?;

    let (project, _) = mutate(state.store.as_ref(), id, |p| {
        p.ensure_owned_by(&user.user_id)?;
        p.apply_update(input.clone());
        Ok(())
    })
    .await?;

    tracing::info!(user_id = %user.user_id, project_id = %id, "Project updated");
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let project = load_owned(&state, &user, id).await?;
    let deleted = state.store.delete(project.id).await?;
    if deleted {
        tracing::info!(user_id = %user.user_id, project_id = %id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}
