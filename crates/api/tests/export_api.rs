//! HTTP-level integration tests for project export.
//!
//! Responses are unzipped and inspected as OPC packages. The stub image
//! URL points at a closed local port, so slides with images exercise the
//! placeholder path without any network access.

mod common;

use std::io::{Cursor, Read};

use axum::http::StatusCode;
use axum::Router;
use common::{body_bytes, body_json, get, post_json};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a project of the given kind and return `(project_id, item_ids)`.
async fn seed_project(app: Router, kind: &str, title: &str) -> (String, Vec<String>) {
    let response = post_json(
        app,
        "/api/v1/projects",
        serde_json::json!({
            "title": title,
            "type": kind,
            "topic": "Grid-scale batteries",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let project = body_json(response).await["data"].clone();
    let id = project["id"].as_str().unwrap().to_string();
    let item_ids = project["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect();
    (id, item_ids)
}

/// Read one part of the zipped package as UTF-8 text.
fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("response should be a zip");
    let mut part = archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("package should contain {name}"));
    let mut xml = String::new();
    part.read_to_string(&mut xml).expect("part should be UTF-8");
    xml
}

/// All part names in the zipped package.
fn part_names(bytes: &[u8]) -> Vec<String> {
    let archive =
        zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("response should be a zip");
    archive.file_names().map(str::to_string).collect()
}

// ---------------------------------------------------------------------------
// Word export
// ---------------------------------------------------------------------------

/// A flow document downloads as .docx with the right headers.
#[tokio::test]
async fn flow_document_exports_as_docx() {
    let app = common::build_test_app();
    let (id, _) = seed_project(app.clone(), "flow-document", "Annual Report").await;

    let response = get(app, &format!("/api/v1/projects/{id}/export")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert_eq!(
        content_type,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    let disposition = response.headers()["content-disposition"].to_str().unwrap();
    assert_eq!(disposition, "attachment; filename=\"Annual Report.docx\"");

    let bytes = body_bytes(response).await;
    let document = read_part(&bytes, "word/document.xml");
    assert!(document.contains("Annual Report"));
}

/// Sections are rendered in order with their generated bodies.
#[tokio::test]
async fn docx_renders_sections_in_order() {
    let app = common::build_test_app();
    let (id, item_ids) = seed_project(app.clone(), "flow-document", "Ordered Report").await;

    // Generate a body for the first section.
    let response = post_json(
        app.clone(),
        "/api/v1/generate/content",
        serde_json::json!({ "project_id": id, "item_id": item_ids[0] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app, &format!("/api/v1/projects/{id}/export")).await;
    let bytes = body_bytes(response).await;
    let document = read_part(&bytes, "word/document.xml");

    assert!(document.contains("Generated Alpha body."));
    assert!(document.contains("first point"));

    let alpha = document.find("Alpha").expect("first section title present");
    let beta = document.find("Beta").expect("second section title present");
    assert!(alpha < beta, "sections must appear in item order");
}

// ---------------------------------------------------------------------------
// PowerPoint export
// ---------------------------------------------------------------------------

/// A slide deck downloads as .pptx with a title slide plus one slide per
/// item.
#[tokio::test]
async fn slide_deck_exports_as_pptx() {
    let app = common::build_test_app();
    let (id, _) = seed_project(app.clone(), "slide-deck", "Board Deck").await;

    let response = get(app, &format!("/api/v1/projects/{id}/export")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert_eq!(
        content_type,
        "application/vnd.openxmlformats-officedocument.presentationml.presentation"
    );
    let disposition = response.headers()["content-disposition"].to_str().unwrap();
    assert_eq!(disposition, "attachment; filename=\"Board Deck.pptx\"");

    let bytes = body_bytes(response).await;
    let names = part_names(&bytes);

    // Two stub outline items plus the title slide.
    assert!(names.iter().any(|n| n == "ppt/slides/slide1.xml"));
    assert!(names.iter().any(|n| n == "ppt/slides/slide3.xml"));
    assert!(!names.iter().any(|n| n == "ppt/slides/slide4.xml"));

    let title_slide = read_part(&bytes, "ppt/slides/slide1.xml");
    assert!(title_slide.contains("Board Deck"));
    assert!(title_slide.contains("Grid-scale batteries"));
}

/// A chart item becomes a native chart part wired into its slide.
#[tokio::test]
async fn pptx_embeds_chart_part() {
    let app = common::build_test_app();
    let (id, item_ids) = seed_project(app.clone(), "slide-deck", "Chart Deck").await;

    let response = post_json(
        app.clone(),
        "/api/v1/generate/chart",
        serde_json::json!({ "project_id": id, "item_id": item_ids[0] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app, &format!("/api/v1/projects/{id}/export")).await;
    let bytes = body_bytes(response).await;

    let chart = read_part(&bytes, "ppt/charts/chart1.xml");
    assert!(chart.contains("<c:barChart>"));
    assert!(chart.contains("Stub Chart"));

    // The first item's slide (slide2, after the title slide) hosts the frame.
    let slide = read_part(&bytes, "ppt/slides/slide2.xml");
    assert!(slide.contains("graphicFrame"));

    let rels = read_part(&bytes, "ppt/slides/_rels/slide2.xml.rels");
    assert!(rels.contains("charts/chart1.xml"));
}

/// An unreachable image URL degrades the slide to a text placeholder and
/// embeds no media.
#[tokio::test]
async fn pptx_unreachable_image_becomes_placeholder() {
    let app = common::build_test_app();
    let (id, item_ids) = seed_project(app.clone(), "slide-deck", "Image Deck").await;

    // Attach the stub image URL (closed port, fetch will fail).
    let response = post_json(
        app.clone(),
        "/api/v1/generate/image",
        serde_json::json!({ "project_id": id, "item_id": item_ids[0] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app, &format!("/api/v1/projects/{id}/export")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body_bytes(response).await;

    let slide = read_part(&bytes, "ppt/slides/slide2.xml");
    assert!(slide.contains("[IMAGE UNAVAILABLE]"));
    assert!(slide.contains("Prompt: stock photo Alpha"));

    let names = part_names(&bytes);
    assert!(
        !names.iter().any(|n| n.starts_with("ppt/media/")),
        "no media should be embedded when the fetch fails"
    );
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn export_unknown_project_returns_404() {
    let app = common::build_test_app();
    let response = get(
        app,
        "/api/v1/projects/00000000-0000-0000-0000-000000000000/export",
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
