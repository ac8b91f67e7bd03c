//! Route definitions for the `/generate` endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::generate;
use crate::state::AppState;

/// Routes mounted at `/generate`.
///
/// ```text
/// POST   /content                           -> content
/// POST   /chart                             -> chart
/// POST   /image                             -> image
/// POST   /refine                            -> refine
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/content", post(generate::content))
        .route("/chart", post(generate::chart))
        .route("/image", post(generate::image))
        .route("/refine", post(generate::refine))
}
