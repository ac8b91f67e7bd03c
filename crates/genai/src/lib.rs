//! Generative clients for the document platform.
//!
//! This crate provides:
//!
//! - [`Generator`] — the text/chart generation capability handlers
//!   consume, implemented by [`GenAiClient`] over an OpenAI-compatible
//!   chat-completions endpoint.
//! - [`ImageSearch`] — stock-image lookup, implemented by
//!   [`ImageSearchClient`].
//! - [`fallback`] — the fixed values callers substitute when generation
//!   fails. Failures never propagate past the handler layer; they degrade
//!   to these values exactly once, with no retries.

pub mod client;
pub mod fallback;
pub mod image;

use async_trait::async_trait;

use docforge_core::chart::ChartData;
use docforge_core::project::DocumentKind;

pub use client::GenAiClient;
pub use image::ImageSearchClient;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the generation and image-search clients.
#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream service returned a non-2xx status code.
    #[error("Generation API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response arrived but could not be used.
    #[error("Malformed generation response: {0}")]
    Malformed(String),
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or a [`GenAiError::Api`] containing the status
/// and body text on failure.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, GenAiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(GenAiError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Text and chart generation, one model call per operation.
///
/// Implementations return errors freely; applying [`fallback`] values is
/// the caller's job.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Ordered outline titles for a new project.
    async fn generate_outline(
        &self,
        topic: &str,
        kind: DocumentKind,
    ) -> Result<Vec<String>, GenAiError>;

    /// Body text for one item, returned verbatim (markdown-lite allowed).
    async fn generate_content(
        &self,
        topic: &str,
        item_title: &str,
        kind: DocumentKind,
    ) -> Result<String, GenAiError>;

    /// Rework `text` per `instruction`.
    async fn refine_content(&self, text: &str, instruction: &str)
        -> Result<String, GenAiError>;

    /// Chart data for one item.
    async fn generate_chart(
        &self,
        topic: &str,
        item_title: &str,
    ) -> Result<ChartData, GenAiError>;

    /// Short stock-image search keywords for one item.
    async fn generate_image_query(
        &self,
        topic: &str,
        item_title: &str,
    ) -> Result<String, GenAiError>;
}

/// Stock-image lookup by keyword query.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// URL of the best match, or `None` when nothing was found.
    async fn search(&self, query: &str) -> Result<Option<String>, GenAiError>;
}
