//! Route definitions for the `/projects` resource.
//!
//! Also nests item routes and the export download under
//! `/projects/{project_id}/...`.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{export, item, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// GET    /{id}/export                       -> export
///
/// POST   /{project_id}/items                        -> create
/// PATCH  /{project_id}/items/{item_id}              -> update
/// DELETE /{project_id}/items/{item_id}              -> delete
/// POST   /{project_id}/items/{item_id}/feedback     -> feedback
/// POST   /{project_id}/items/{item_id}/comments     -> comment
/// ```
pub fn router() -> Router<AppState> {
    let item_routes = Router::new()
        .route("/", post(item::create))
        .route("/{item_id}", patch(item::update).delete(item::delete))
        .route("/{item_id}/feedback", post(item::feedback))
        .route("/{item_id}/comments", post(item::comment));

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/export", get(export::export))
        .nest("/{project_id}/items", item_routes)
}
