//! Slide deck writer.
//!
//! Builds a minimal OPC presentation from scratch: a title slide, then
//! one slide per item. Chart items embed a native chart part, image
//! items embed downloaded media or a text placeholder, and items that
//! carry both content and an image split the slide into two regions.

mod chart;
mod package;
mod shapes;

use std::collections::HashMap;

use uuid::Uuid;

use docforge_core::chart::ChartSpec;
use docforge_core::project::{ContentItem, ItemType};

use crate::fetch::FetchedImage;

use package::{PackageBuilder, Rel, REL_CHART, REL_IMAGE};
use shapes::Rect;

/// Placeholder text rendered when an image could not be fetched.
pub const IMAGE_UNAVAILABLE: &str = "[IMAGE UNAVAILABLE]";

#[derive(Debug, thiserror::Error)]
pub enum PptxError {
    #[error("archive write failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("part write failed: {0}")]
    Io(#[from] std::io::Error),
}

// Layout geometry, in EMU, on a 12192000 x 6858000 slide.
const TITLE_RECT: Rect = Rect {
    x: 914_400,
    y: 2_057_400,
    cx: 10_363_200,
    cy: 1_371_600,
};
const SUBTITLE_RECT: Rect = Rect {
    x: 914_400,
    y: 3_657_600,
    cx: 10_363_200,
    cy: 914_400,
};
const HEADER_RECT: Rect = Rect {
    x: 457_200,
    y: 274_320,
    cx: 11_277_600,
    cy: 1_143_000,
};
const BODY_RECT: Rect = Rect {
    x: 457_200,
    y: 1_600_200,
    cx: 11_277_600,
    cy: 4_800_600,
};
const LEFT_BODY_RECT: Rect = Rect {
    x: 457_200,
    y: 1_600_200,
    cx: 5_486_400,
    cy: 4_800_600,
};
const RIGHT_REGION: Rect = Rect {
    x: 6_172_200,
    y: 1_600_200,
    cx: 5_562_600,
    cy: 4_572_000,
};
const CHART_RECT: Rect = Rect {
    x: 2_286_000,
    y: 1_270_000,
    cx: 7_620_000,
    cy: 5_080_000,
};
const IMAGE_REGION: Rect = Rect {
    x: 2_286_000,
    y: 1_714_500,
    cx: 7_620_000,
    cy: 4_572_000,
};
const PLACEHOLDER_RECT: Rect = Rect {
    x: 2_286_000,
    y: 1_714_500,
    cx: 7_620_000,
    cy: 3_810_000,
};

/// Assemble a complete deck. `items` is expected in render order;
/// `images` maps item ids to media fetched ahead of time.
pub fn assemble(
    title: &str,
    topic: &str,
    items: &[&ContentItem],
    images: &HashMap<Uuid, FetchedImage>,
) -> Result<Vec<u8>, PptxError> {
    let mut package = PackageBuilder::new();

    package.add_slide(title_slide(title, topic), vec![PackageBuilder::layout_rel()]);

    for item in items {
        match item.item_type {
            ItemType::Chart => add_chart_slide(&mut package, item),
            ItemType::ImagePrompt => add_image_slide(&mut package, item, images.get(&item.id)),
            ItemType::Section | ItemType::Slide => {
                if item.image_url.is_some() {
                    add_two_region_slide(&mut package, item, images.get(&item.id));
                } else {
                    add_content_slide(&mut package, item);
                }
            }
        }
    }

    package.finish()
}

// ---------------------------------------------------------------------------
// Slide builders
// ---------------------------------------------------------------------------

fn title_slide(title: &str, topic: &str) -> String {
    let mut shapes_xml = shapes::text_box(
        2,
        "Title",
        &TITLE_RECT,
        &shapes::paragraph(&shapes::run(title, shapes::SZ_DECK_TITLE, true)),
    );
    if !topic.trim().is_empty() {
        shapes_xml.push_str(&shapes::text_box(
            3,
            "Subtitle",
            &SUBTITLE_RECT,
            &shapes::paragraph(&shapes::run(topic, shapes::SZ_DECK_SUBTITLE, false)),
        ));
    }
    shapes::slide_xml(&shapes_xml)
}

fn title_box(title: &str) -> String {
    shapes::text_box(
        2,
        "Title",
        &HEADER_RECT,
        &shapes::paragraph(&shapes::run(title, shapes::SZ_SLIDE_TITLE, true)),
    )
}

fn add_content_slide(package: &mut PackageBuilder, item: &ContentItem) {
    let mut shapes_xml = title_box(&item.title);
    shapes_xml.push_str(&shapes::text_box(
        3,
        "Body",
        &BODY_RECT,
        &shapes::body_paragraphs(&item.content),
    ));
    package.add_slide(
        shapes::slide_xml(&shapes_xml),
        vec![PackageBuilder::layout_rel()],
    );
}

fn add_chart_slide(package: &mut PackageBuilder, item: &ContentItem) {
    let mut shapes_xml = title_box(&item.title);
    let mut rels = vec![PackageBuilder::layout_rel()];

    // A chart item without drawable data degrades to a title-only slide.
    let spec = item
        .chart_data
        .as_ref()
        .map(ChartSpec::from_data)
        .filter(ChartSpec::is_renderable);
    if let Some(spec) = spec {
        let target = package.add_chart(chart::chart_space_xml(&spec));
        rels.push(Rel::new("rId2", REL_CHART, target));
        shapes_xml.push_str(&shapes::chart_frame(3, "rId2", &CHART_RECT));
    }

    package.add_slide(shapes::slide_xml(&shapes_xml), rels);
}

fn add_image_slide(package: &mut PackageBuilder, item: &ContentItem, image: Option<&FetchedImage>) {
    let mut shapes_xml = title_box(&item.title);
    let mut rels = vec![PackageBuilder::layout_rel()];

    match image {
        Some(image) => {
            let target = package.add_media(image);
            rels.push(Rel::new("rId2", REL_IMAGE, target));
            let (cx, cy) = image.fit_into(IMAGE_REGION.cx, IMAGE_REGION.cy);
            shapes_xml.push_str(&shapes::picture(3, "rId2", &IMAGE_REGION.center(cx, cy)));
        }
        None => {
            shapes_xml.push_str(&shapes::text_box(
                3,
                "Placeholder",
                &PLACEHOLDER_RECT,
                &unavailable_paragraphs(item),
            ));
        }
    }

    package.add_slide(shapes::slide_xml(&shapes_xml), rels);
}

fn add_two_region_slide(
    package: &mut PackageBuilder,
    item: &ContentItem,
    image: Option<&FetchedImage>,
) {
    let mut shapes_xml = title_box(&item.title);
    shapes_xml.push_str(&shapes::text_box(
        3,
        "Body",
        &LEFT_BODY_RECT,
        &shapes::body_paragraphs(&item.content),
    ));
    let mut rels = vec![PackageBuilder::layout_rel()];

    match image {
        Some(image) => {
            let target = package.add_media(image);
            rels.push(Rel::new("rId2", REL_IMAGE, target));
            let (cx, cy) = image.fit_into(RIGHT_REGION.cx, RIGHT_REGION.cy);
            shapes_xml.push_str(&shapes::picture(4, "rId2", &RIGHT_REGION.center(cx, cy)));
        }
        None => {
            shapes_xml.push_str(&shapes::text_box(
                4,
                "Placeholder",
                &RIGHT_REGION,
                &unavailable_paragraphs(item),
            ));
        }
    }

    package.add_slide(shapes::slide_xml(&shapes_xml), rels);
}

fn unavailable_paragraphs(item: &ContentItem) -> String {
    let mut paragraphs = shapes::paragraph(&shapes::run(
        IMAGE_UNAVAILABLE,
        shapes::SZ_BODY,
        true,
    ));
    if let Some(prompt) = item.image_prompt.as_deref().filter(|p| !p.trim().is_empty()) {
        paragraphs.push_str(&shapes::paragraph(&shapes::run(
            &format!("Prompt: {prompt}"),
            shapes::SZ_BODY,
            false,
        )));
    }
    paragraphs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    use docforge_core::chart::{ChartData, ChartSeries};
    use docforge_core::project::{ContentItem, ItemType};

    use crate::fetch::MediaKind;

    fn read_part(buf: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(buf.to_vec())).expect("valid archive");
        let mut part = archive.by_name(name).expect("part present");
        let mut xml = String::new();
        part.read_to_string(&mut xml).expect("utf-8 part");
        xml
    }

    fn has_part(buf: &[u8], name: &str) -> bool {
        let mut archive = zip::ZipArchive::new(Cursor::new(buf.to_vec())).expect("valid archive");
        let present = archive.by_name(name).is_ok();
        present
    }

    fn png(width_px: u32, height_px: u32) -> FetchedImage {
        FetchedImage {
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
            kind: MediaKind::Png,
            width_px,
            height_px,
        }
    }

    #[test]
    fn deck_has_title_slide_then_one_slide_per_item() {
        let first = ContentItem::new("Opening", ItemType::Slide, 0);
        let second = ContentItem::new("Closing", ItemType::Slide, 1);
        let buf = assemble("Deck", "topic", &[&first, &second], &HashMap::new())
            .expect("assembles");

        assert!(has_part(&buf, "ppt/slides/slide1.xml"));
        assert!(has_part(&buf, "ppt/slides/slide3.xml"));
        assert!(!has_part(&buf, "ppt/slides/slide4.xml"));

        let presentation = read_part(&buf, "ppt/presentation.xml");
        assert_eq!(presentation.matches("<p:sldId ").count(), 3);

        assert!(read_part(&buf, "ppt/slides/slide2.xml").contains("Opening"));
        assert!(read_part(&buf, "ppt/slides/slide3.xml").contains("Closing"));
    }

    #[test]
    fn title_slide_carries_escaped_title_and_topic() {
        let buf = assemble("R&D <2026>", "launch & beyond", &[], &HashMap::new())
            .expect("assembles");

        let slide = read_part(&buf, "ppt/slides/slide1.xml");
        assert!(slide.contains("R&amp;D &lt;2026&gt;"));
        assert!(slide.contains("launch &amp; beyond"));
    }

    #[test]
    fn chart_item_embeds_a_chart_part() {
        let mut item = ContentItem::new("Numbers", ItemType::Slide, 0);
        item.apply_chart(ChartData {
            kind: "bar".to_string(),
            title: "Sales".to_string(),
            categories: vec!["Q1".to_string(), "Q2".to_string()],
            series: vec![ChartSeries {
                name: "Revenue".to_string(),
                values: vec![1.0, 2.0],
            }],
        });
        let buf = assemble("Deck", "", &[&item], &HashMap::new()).expect("assembles");

        let chart = read_part(&buf, "ppt/charts/chart1.xml");
        assert!(chart.contains("Revenue"));
        assert!(chart.contains("<c:barChart>"));

        let slide = read_part(&buf, "ppt/slides/slide2.xml");
        assert!(slide.contains("<p:graphicFrame>"));
        let rels = read_part(&buf, "ppt/slides/_rels/slide2.xml.rels");
        assert!(rels.contains("../charts/chart1.xml"));
    }

    #[test]
    fn chart_item_without_data_degrades_to_title_slide() {
        let mut item = ContentItem::new("Numbers", ItemType::Slide, 0);
        item.apply_chart(ChartData::default());
        let buf = assemble("Deck", "", &[&item], &HashMap::new()).expect("assembles");

        assert!(!has_part(&buf, "ppt/charts/chart1.xml"));
        let slide = read_part(&buf, "ppt/slides/slide2.xml");
        assert!(slide.contains("Numbers"));
        assert!(!slide.contains("<p:graphicFrame>"));
    }

    #[test]
    fn image_item_embeds_fetched_media() {
        let mut item = ContentItem::new("Skyline", ItemType::ImagePrompt, 0);
        item.apply_image("city skyline", Some("https://img.example/1".to_string()));
        let images = HashMap::from([(item.id, png(400, 300))]);
        let buf = assemble("Deck", "", &[&item], &images).expect("assembles");

        assert!(has_part(&buf, "ppt/media/image1.png"));
        let slide = read_part(&buf, "ppt/slides/slide2.xml");
        assert!(slide.contains("<p:pic>"));
        assert!(slide.contains("r:embed=\"rId2\""));
        assert!(read_part(&buf, "[Content_Types].xml").contains("Extension=\"png\""));
    }

    #[test]
    fn missing_image_renders_placeholder_with_prompt() {
        let mut item = ContentItem::new("Skyline", ItemType::ImagePrompt, 0);
        item.apply_image("city skyline at dusk", None);
        let buf = assemble("Deck", "", &[&item], &HashMap::new()).expect("assembles");

        let slide = read_part(&buf, "ppt/slides/slide2.xml");
        assert!(slide.contains(IMAGE_UNAVAILABLE));
        assert!(slide.contains("Prompt: city skyline at dusk"));
        assert!(!slide.contains("<p:pic>"));
    }

    #[test]
    fn slide_with_content_and_image_splits_into_two_regions() {
        let mut item = ContentItem::new("Market", ItemType::Slide, 0);
        item.content = "- growth\n- churn".to_string();
        item.apply_image("market snapshot", Some("https://img.example/2".to_string()));
        assert_eq!(item.item_type, ItemType::Slide);

        let images = HashMap::from([(item.id, png(800, 600))]);
        let buf = assemble("Deck", "", &[&item], &images).expect("assembles");

        let slide = read_part(&buf, "ppt/slides/slide2.xml");
        assert!(slide.contains("growth"));
        assert!(slide.contains("<a:buChar"));
        assert!(slide.contains("<p:pic>"));
    }

    #[test]
    fn unfetched_image_url_on_slide_keeps_content_and_placeholder() {
        let mut item = ContentItem::new("Market", ItemType::Slide, 0);
        item.content = "growth".to_string();
        item.apply_image("market snapshot", Some("https://img.example/3".to_string()));

        let buf = assemble("Deck", "", &[&item], &HashMap::new()).expect("assembles");

        let slide = read_part(&buf, "ppt/slides/slide2.xml");
        assert!(slide.contains("growth"));
        assert!(slide.contains(IMAGE_UNAVAILABLE));
        assert!(!slide.contains("<p:pic>"));
    }

    #[test]
    fn empty_deck_still_packages_required_parts() {
        let buf = assemble("Deck", "", &[], &HashMap::new()).expect("assembles");

        assert!(has_part(&buf, "[Content_Types].xml"));
        assert!(has_part(&buf, "_rels/.rels"));
        assert!(has_part(&buf, "ppt/presentation.xml"));
        assert!(has_part(&buf, "ppt/slideMasters/slideMaster1.xml"));
        assert!(has_part(&buf, "ppt/slideLayouts/slideLayout1.xml"));
        assert!(has_part(&buf, "ppt/theme/theme1.xml"));
        assert!(has_part(&buf, "ppt/slides/slide1.xml"));
    }
}
