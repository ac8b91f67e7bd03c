//! Handlers for the `/generate` endpoints.
//!
//! Every endpoint here makes exactly one generation call and substitutes
//! the matching [`fallback`] value on failure, so an upstream outage
//! degrades responses instead of erroring them. Ownership and not-found
//! problems still surface as errors.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docforge_core::markdown;
use docforge_core::project::ContentItem;
use docforge_genai::fallback;
use docforge_store::mutate;

use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::handlers::project::load_owned;
use crate::response::DataResponse;
use crate::state::AppState;

/// Item reference shared by the item-scoped generation endpoints.
#[derive(Debug, Deserialize)]
pub struct GenerateTarget {
    pub project_id: Uuid,
    pub item_id: Uuid,
}

/// Body of a content-generation response.
#[derive(Debug, Serialize)]
pub struct ContentPayload {
    pub content: String,
}

/// Request body for stateless refinement.
#[derive(Debug, Deserialize)]
pub struct RefineInput {
    pub text: String,
    pub instruction: String,
}

/// Body of a refinement response.
#[derive(Debug, Serialize)]
pub struct RefinePayload {
    pub refined: String,
}

/// POST /api/v1/generate/content
///
/// Writes the generated text into the item and echoes it back. Stored
/// content carries no literal `**` markers; bold stays a render-time
/// concern of the exporters.
pub async fn content(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<GenerateTarget>,
) -> AppResult<Json<DataResponse<ContentPayload>>> {
    let project = load_owned(&state, &user, input.project_id).await?;
    let item = project.item(input.item_id)?;

    let generated = match state
        .generator
        .generate_content(&project.topic, &item.title, project.kind)
        .await
    {
        Ok(text) => text,
        Err(error) => {
            tracing::warn!(
                %error,
                item_id = %input.item_id,
                "Content generation failed, storing the fallback text"
            );
            fallback::content(&item.title)
        }
    };
    let content = markdown::strip_bold_markers(&generated);

    mutate(state.store.as_ref(), input.project_id, |p| {
        p.ensure_owned_by(&user.user_id)?;
        p.item_mut(input.item_id)?.content = content.clone();
        Ok(())
    })
    .await?;

    tracing::info!(
        user_id = %user.user_id,
        project_id = %input.project_id,
        item_id = %input.item_id,
        "Item content generated"
    );
    Ok(Json(DataResponse {
        data: ContentPayload { content },
    }))
}

/// POST /api/v1/generate/chart
///
/// Converts the item to a chart and returns it; any previous image
/// fields are cleared by the conversion.
pub async fn chart(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<GenerateTarget>,
) -> AppResult<Json<DataResponse<ContentItem>>> {
    let project = load_owned(&state, &user, input.project_id).await?;
    let item = project.item(input.item_id)?;

    let data = match state
        .generator
        .generate_chart(&project.topic, &item.title)
        .await
    {
        Ok(data) => data,
        Err(error) => {
            tracing::warn!(
                %error,
                item_id = %input.item_id,
                "Chart generation failed, storing the sample chart"
            );
            fallback::chart()
        }
    };

    let (saved, _) = mutate(state.store.as_ref(), input.project_id, |p| {
        p.ensure_owned_by(&user.user_id)?;
        p.item_mut(input.item_id)?.apply_chart(data.clone());
        Ok(())
    })
    .await?;

    let item = saved.item(input.item_id)?.clone();
    tracing::info!(
        user_id = %user.user_id,
        project_id = %input.project_id,
        item_id = %input.item_id,
        "Item chart generated"
    );
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/v1/generate/image
///
/// Two-stage: generate search keywords from the item, then look up a
/// stock image. A failed lookup still records the prompt, leaving the
/// item to export with a placeholder.
pub async fn image(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<GenerateTarget>,
) -> AppResult<Json<DataResponse<ContentItem>>> {
    let project = load_owned(&state, &user, input.project_id).await?;
    let item = project.item(input.item_id)?;

    let query = match state
        .generator
        .generate_image_query(&project.topic, &item.title)
        .await
    {
        Ok(query) => query,
        Err(error) => {
            tracing::warn!(
                %error,
                item_id = %input.item_id,
                "Image query generation failed, using the generic query"
            );
            fallback::image_query()
        }
    };

    let image_url = match state.image_search.search(&query).await {
        Ok(url) => url,
        Err(error) => {
            tracing::warn!(%error, query = %query, "Image search failed, storing no URL");
            None
        }
    };

    let (saved, _) = mutate(state.store.as_ref(), input.project_id, |p| {
        p.ensure_owned_by(&user.user_id)?;
        p.item_mut(input.item_id)?
            .apply_image(query.clone(), image_url.clone());
        Ok(())
    })
    .await?;

    let item = saved.item(input.item_id)?.clone();
    tracing::info!(
        user_id = %user.user_id,
        project_id = %input.project_id,
        item_id = %input.item_id,
        found = item.image_url.is_some(),
        "Item image assigned"
    );
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/v1/generate/refine
///
/// Stateless: reworks the submitted text without touching any project.
/// On failure the input text comes back unchanged.
pub async fn refine(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RefineInput>,
) -> AppResult<Json<DataResponse<RefinePayload>>> {
    let refined = match state
        .generator
        .refine_content(&input.text, &input.instruction)
        .await
    {
        Ok(text) => text,
        Err(error) => {
            tracing::warn!(
                %error,
                user_id = %user.user_id,
                "Refinement failed, returning the input unchanged"
            );
            input.text
        }
    };

    Ok(Json(DataResponse {
        data: RefinePayload { refined },
    }))
}
