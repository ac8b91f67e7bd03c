//! Image fetching for slide-deck export.
//!
//! All item images are downloaded before assembly starts, concurrently and
//! under a per-request timeout and size cap. Individual failures are
//! logged and dropped; the assembler renders a placeholder for any item
//! whose image is missing from the fetched set.

use std::collections::HashMap;
use std::io::Cursor;
use std::time::Duration;

use futures::future::join_all;
use uuid::Uuid;

use docforge_core::project::ContentItem;

/// Refuse images larger than this many bytes.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Why a single image download was discarded.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Image exceeds {MAX_IMAGE_BYTES} byte limit ({0} bytes)")]
    TooLarge(usize),
    #[error("Unrecognized image data: {0}")]
    Unreadable(String),
    #[error("Unsupported image format (only PNG and JPEG are embedded)")]
    UnsupportedFormat,
}

/// Supported embedded image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Png,
    Jpeg,
}

impl MediaKind {
    /// Part-name extension inside the package.
    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::Png => "png",
            MediaKind::Jpeg => "jpeg",
        }
    }

    /// Content type declared for the extension.
    pub fn content_type(self) -> &'static str {
        match self {
            MediaKind::Png => "image/png",
            MediaKind::Jpeg => "image/jpeg",
        }
    }
}

/// A downloaded image ready for embedding.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub kind: MediaKind,
    pub width_px: u32,
    pub height_px: u32,
}

impl FetchedImage {
    /// Scale the image to fit a bounding box, preserving aspect ratio.
    ///
    /// Dimensions are in EMU (or any consistent unit). Degenerate pixel
    /// sizes fall back to the full box.
    pub fn fit_into(&self, max_cx: i64, max_cy: i64) -> (i64, i64) {
        if self.width_px == 0 || self.height_px == 0 {
            return (max_cx, max_cy);
        }
        let scale = f64::min(
            max_cx as f64 / self.width_px as f64,
            max_cy as f64 / self.height_px as f64,
        );
        (
            (self.width_px as f64 * scale) as i64,
            (self.height_px as f64 * scale) as i64,
        )
    }
}

/// Downloads item images with a bounded timeout.
pub struct ImageFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl ImageFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Fetch every item image concurrently.
    ///
    /// Returns the successes keyed by item id; failures are logged and
    /// simply absent, which the assembler renders as placeholders.
    pub async fn fetch_all(&self, items: &[&ContentItem]) -> HashMap<Uuid, FetchedImage> {
        let downloads = items.iter().filter_map(|item| {
            item.image_url.as_ref().map(|url| {
                let id = item.id;
                let url = url.clone();
                async move { (id, self.fetch(&url).await) }
            })
        });

        let mut images = HashMap::new();
        for (id, result) in join_all(downloads).await {
            match result {
                Ok(img) => {
                    images.insert(id, img);
                }
                Err(e) => {
                    tracing::warn!(
                        item_id = %id,
                        error = %e,
                        "Image fetch failed, slide will fall back to a placeholder"
                    );
                }
            }
        }
        images
    }

    /// Download and probe one image.
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(FetchError::TooLarge(bytes.len()));
        }

        let reader = image::ImageReader::new(Cursor::new(bytes.as_ref()))
            .with_guessed_format()
            .map_err(|e| FetchError::Unreadable(e.to_string()))?;

        let kind = match reader.format() {
            Some(image::ImageFormat::Png) => MediaKind::Png,
            Some(image::ImageFormat::Jpeg) => MediaKind::Jpeg,
            _ => return Err(FetchError::UnsupportedFormat),
        };

        let (width_px, height_px) = reader
            .into_dimensions()
            .map_err(|e| FetchError::Unreadable(e.to_string()))?;

        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            kind,
            width_px,
            height_px,
        })
    }
}
