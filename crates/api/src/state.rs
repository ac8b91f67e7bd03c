use std::sync::Arc;

use docforge_export::ImageFetcher;
use docforge_genai::{Generator, ImageSearch};
use docforge_store::ProjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (everything is behind `Arc`). The store and
/// generation clients are trait objects chosen at startup, so tests swap
/// in in-memory and stub implementations without touching handlers.
#[derive(Clone)]
pub struct AppState {
    /// Project persistence (Postgres or in-memory).
    pub store: Arc<dyn ProjectStore>,
    /// Text/chart generation client.
    pub generator: Arc<dyn Generator>,
    /// Stock-image search client.
    pub image_search: Arc<dyn ImageSearch>,
    /// Image downloader used during slide-deck export.
    pub image_fetcher: Arc<ImageFetcher>,
    /// Server configuration (accessed by auth and middleware).
    pub config: Arc<ServerConfig>,
}
