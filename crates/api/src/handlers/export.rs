//! Handler for document export.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use uuid::Uuid;

use docforge_export::export_project;

use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::handlers::project::load_owned;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/export
///
/// Returns the assembled file with an attachment disposition. Image
/// fetch failures degrade to placeholders inside the document; only
/// packaging failures surface as errors here.
pub async fn export(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let project = load_owned(&state, &user, id).await?;

    let file = export_project(&project, &state.image_fetcher)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(
        user_id = %user.user_id,
        project_id = %id,
        filename = %file.filename,
        size_bytes = file.bytes.len(),
        "Project exported"
    );

    let headers = [
        (header::CONTENT_TYPE, file.media_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.filename),
        ),
    ];
    Ok((headers, file.bytes))
}
