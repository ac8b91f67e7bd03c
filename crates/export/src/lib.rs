//! Export assembly: project snapshot in, finished OOXML file out.
//!
//! The assemblers ([`docx`], [`pptx`]) are pure transforms of an in-memory
//! snapshot. The only I/O in an export is image fetching, which
//! [`export_project`] performs up front via [`fetch::ImageFetcher`] so the
//! assembler receives a complete set of already-downloaded images. A failed
//! image degrades that one slide to a text placeholder; it never fails the
//! export.

pub mod docx;
pub mod fetch;
pub mod pptx;

use docforge_core::project::{DocumentKind, Project};

pub use fetch::ImageFetcher;

/// MIME type for `.docx` output.
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// MIME type for `.pptx` output.
pub const PPTX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Errors from export assembly. Note that image problems are NOT here:
/// they degrade to placeholders instead of failing the export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to assemble .docx: {0}")]
    Docx(String),
    #[error("Failed to assemble .pptx: {0}")]
    Pptx(#[from] pptx::PptxError),
}

/// A finished export artifact ready to be served.
#[derive(Debug)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub media_type: &'static str,
}

/// Export a project to its document format.
///
/// Items are rendered in ascending `order`. For slide decks all item
/// images are fetched first (bounded, failure-tolerant), then the pure
/// assembler runs on the snapshot plus the fetched set.
pub async fn export_project(
    project: &Project,
    fetcher: &ImageFetcher,
) -> Result<ExportFile, ExportError> {
    let items = project.sorted_items();

    let bytes = match project.kind {
        DocumentKind::FlowDocument => docx::assemble(&project.title, &items)?,
        DocumentKind::SlideDeck => {
            let images = fetcher.fetch_all(&items).await;
            pptx::assemble(&project.title, &project.topic, &items, &images)?
        }
    };

    let media_type = match project.kind {
        DocumentKind::FlowDocument => DOCX_MEDIA_TYPE,
        DocumentKind::SlideDeck => PPTX_MEDIA_TYPE,
    };

    Ok(ExportFile {
        bytes,
        filename: format!(
            "{}.{}",
            sanitize_filename(&project.title),
            project.kind.extension()
        ),
        media_type,
    })
}

/// Make a project title safe for a `Content-Disposition` filename.
fn sanitize_filename(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | '"' | '<' | '>' | ':' | '*' | '?' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        "export".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use docforge_core::project::NewProject;

    use super::*;

    fn project(kind: DocumentKind) -> Project {
        Project::new(
            "u1",
            NewProject {
                title: "Plan".to_string(),
                kind,
                topic: "Planning".to_string(),
                description: None,
            },
            vec!["One".to_string(), "Two".to_string()],
        )
    }

    #[test]
    fn filenames_lose_separator_and_quote_characters() {
        assert_eq!(sanitize_filename("Q3: the \"plan\""), "Q3_ the _plan_");
        assert_eq!(sanitize_filename("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_filename("plain title"), "plain title");
    }

    #[test]
    fn blank_titles_fall_back() {
        assert_eq!(sanitize_filename("   "), "export");
        assert_eq!(sanitize_filename("///"), "___");
    }

    // -- Format selection --

    #[tokio::test]
    async fn flow_document_exports_docx() {
        let fetcher = ImageFetcher::new(Duration::from_secs(1));
        let file = export_project(&project(DocumentKind::FlowDocument), &fetcher)
            .await
            .expect("exports");

        assert_eq!(file.filename, "Plan.docx");
        assert_eq!(file.media_type, DOCX_MEDIA_TYPE);
        assert!(!file.bytes.is_empty());
    }

    #[tokio::test]
    async fn slide_deck_exports_pptx() {
        let fetcher = ImageFetcher::new(Duration::from_secs(1));
        let file = export_project(&project(DocumentKind::SlideDeck), &fetcher)
            .await
            .expect("exports");

        assert_eq!(file.filename, "Plan.pptx");
        assert_eq!(file.media_type, PPTX_MEDIA_TYPE);
        assert!(!file.bytes.is_empty());
    }
}
