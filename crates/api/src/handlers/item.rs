//! Handlers for content items nested under `/projects/{id}/items`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use docforge_core::error::CoreError;
use docforge_core::project::{validate_feedback, ContentItem, ItemPatch, NewItem};
use docforge_store::mutate;

use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Reader reaction on one item.
#[derive(Debug, Deserialize)]
pub struct FeedbackInput {
    pub feedback: String,
}

/// Free-text comment on one item.
#[derive(Debug, Deserialize)]
pub struct CommentInput {
    pub comment: String,
}

/// POST /api/v1/projects/{id}/items
///
/// Appends at the end of the document; the item type defaults to the
/// project kind's unit when the request omits it.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewItem>,
) -> AppResult<(StatusCode, Json<DataResponse<ContentItem>>)> {
    input.validate()?;

    let (project, item_id) = mutate(state.store.as_ref(), id, |p| {
        p.ensure_owned_by(&user.user_id)?;
        let item_type = input.item_type.unwrap_or_else(|| p.kind.default_item_type());
        Ok(p.append_item(input.title.clone(), item_type))
    })
    .await?;

    let item = project.item(item_id)?.clone();
    tracing::info!(
        user_id = %user.user_id,
        project_id = %id,
        item_id = %item_id,
        "Item appended"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PATCH /api/v1/projects/{id}/items/{item_id}
///
/// Edits title and/or content; absent fields keep their stored values.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<ItemPatch>,
) -> AppResult<Json<DataResponse<ContentItem>>> {
    input.validate()?;

    let (project, _) = mutate(state.store.as_ref(), id, |p| {
        p.ensure_owned_by(&user.user_id)?;
        let item = p.item_mut(item_id)?;
        if let Some(title) = input.title.clone() {
            item.title = title;
        }
        if let Some(content) = input.content.clone() {
            item.content = content;
        }
        Ok(())
    })
    .await?;

    let item = project.item(item_id)?.clone();
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/projects/{id}/items/{item_id}
///
/// Remaining items keep their `order` values; gaps are fine because
/// rendering sorts by `order` rather than indexing by it.
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    mutate(state.store.as_ref(), id, |p| {
        p.ensure_owned_by(&user.user_id)?;
        if p.remove_item(item_id) {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity: "ContentItem",
                id: item_id,
            })
        }
    })
    .await?;

    tracing::info!(
        user_id = %user.user_id,
        project_id = %id,
        item_id = %item_id,
        "Item removed"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/items/{item_id}/feedback
///
/// Overwrites any previous reaction; the value must be `like` or
/// `dislike`.
pub async fn feedback(
    user: AuthUser,
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<FeedbackInput>,
) -> AppResult<Json<DataResponse<ContentItem>>> {
    validate_feedback(&input.feedback)?;

    let (project, _) = mutate(state.store.as_ref(), id, |p| {
        p.ensure_owned_by(&user.user_id)?;
        p.item_mut(item_id)?.feedback = Some(input.feedback.clone());
        Ok(())
    })
    .await?;

    let item = project.item(item_id)?.clone();
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/v1/projects/{id}/items/{item_id}/comments
///
/// Comments are append-only; there is no edit or delete.
pub async fn comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<CommentInput>,
) -> AppResult<Json<DataResponse<ContentItem>>> {
    let (project, _) = mutate(state.store.as_ref(), id, |p| {
        p.ensure_owned_by(&user.user_id)?;
        p.item_mut(item_id)?.comments.push(input.comment.clone());
        Ok(())
    })
    .await?;

    let item = project.item(item_id)?.clone();
    Ok(Json(DataResponse { data: item }))
}
