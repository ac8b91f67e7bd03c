pub mod generate;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                        list, create
/// /projects/{id}                                   get, update, delete
/// /projects/{id}/export                            download document (GET)
///
/// /projects/{id}/items                             append item (POST)
/// /projects/{id}/items/{item_id}                   edit, remove (PATCH, DELETE)
/// /projects/{id}/items/{item_id}/feedback          set reaction (POST)
/// /projects/{id}/items/{item_id}/comments          add comment (POST)
///
/// /generate/content                                write item body (POST)
/// /generate/chart                                  convert item to chart (POST)
/// /generate/image                                  assign stock image (POST)
/// /generate/refine                                 rework free text (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/generate", generate::router())
}
