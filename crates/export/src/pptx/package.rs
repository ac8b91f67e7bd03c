//! OPC package scaffolding: content types, relationships, the
//! presentation part and the fixed master/layout/theme parts.
//!
//! Slides are explicit-geometry shapes on a blank layout, so the master
//! and layout carry no placeholders; they exist to satisfy the required
//! part chain presentation -> master -> layout/theme.

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::fetch::FetchedImage;

use super::PptxError;

pub(super) const XML_DECL: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>";

// Slide size: 16:9, in EMU.
pub(super) const SLIDE_CX: i64 = 12_192_000;
pub(super) const SLIDE_CY: i64 = 6_858_000;

// XML namespaces.
pub(super) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(super) const NS_R: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(super) const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub(super) const NS_C: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";

// Relationship types.
const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub(super) const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
pub(super) const REL_CHART: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart";
pub(super) const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

/// One `<Relationship>` entry in a part's `.rels`.
pub(super) struct Rel {
    pub id: String,
    pub rel_type: &'static str,
    pub target: String,
}

impl Rel {
    pub(super) fn new(
        id: impl Into<String>,
        rel_type: &'static str,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            rel_type,
            target: target.into(),
        }
    }
}

fn rels_xml(rels: &[Rel]) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    );
    for rel in rels {
        xml.push_str(&format!(
            "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>",
            rel.id, rel.rel_type, rel.target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

// ---------------------------------------------------------------------------
// Package builder
// ---------------------------------------------------------------------------

pub(super) struct SlidePart {
    xml: String,
    rels: Vec<Rel>,
}

struct MediaPart {
    filename: String,
    extension: &'static str,
    content_type: &'static str,
    bytes: Vec<u8>,
}

/// Collects slides, charts and media, then serializes the archive.
pub(super) struct PackageBuilder {
    slides: Vec<SlidePart>,
    charts: Vec<String>,
    media: Vec<MediaPart>,
}

impl PackageBuilder {
    pub(super) fn new() -> Self {
        Self {
            slides: Vec::new(),
            charts: Vec::new(),
            media: Vec::new(),
        }
    }

    /// The rId1 -> blank layout relationship every slide carries.
    pub(super) fn layout_rel() -> Rel {
        Rel::new(
            "rId1",
            REL_SLIDE_LAYOUT,
            "../slideLayouts/slideLayout1.xml",
        )
    }

    pub(super) fn add_slide(&mut self, xml: String, rels: Vec<Rel>) {
        self.slides.push(SlidePart { xml, rels });
    }

    /// Register a chart part; returns its target path relative to a slide.
    pub(super) fn add_chart(&mut self, xml: String) -> String {
        self.charts.push(xml);
        format!("../charts/chart{}.xml", self.charts.len())
    }

    /// Register an image part; returns its target path relative to a slide.
    pub(super) fn add_media(&mut self, image: &FetchedImage) -> String {
        let filename = format!("image{}.{}", self.media.len() + 1, image.kind.extension());
        let target = format!("../media/{filename}");
        self.media.push(MediaPart {
            filename,
            extension: image.kind.extension(),
            content_type: image.kind.content_type(),
            bytes: image.bytes.clone(),
        });
        target
    }

    /// Serialize every part into the final zip archive.
    pub(super) fn finish(self) -> Result<Vec<u8>, PptxError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        write_part(
            &mut zip,
            options,
            "[Content_Types].xml",
            self.content_types_xml().as_bytes(),
        )?;
        write_part(
            &mut zip,
            options,
            "_rels/.rels",
            rels_xml(&[Rel::new(
                "rId1",
                REL_OFFICE_DOCUMENT,
                "ppt/presentation.xml",
            )])
            .as_bytes(),
        )?;
        write_part(
            &mut zip,
            options,
            "ppt/presentation.xml",
            presentation_xml(self.slides.len()).as_bytes(),
        )?;

        let mut pres_rels = vec![Rel::new(
            "rId1",
            REL_SLIDE_MASTER,
            "slideMasters/slideMaster1.xml",
        )];
        for i in 0..self.slides.len() {
            pres_rels.push(Rel::new(
                format!("rId{}", i + 2),
                REL_SLIDE,
                format!("slides/slide{}.xml", i + 1),
            ));
        }
        write_part(
            &mut zip,
            options,
            "ppt/_rels/presentation.xml.rels",
            rels_xml(&pres_rels).as_bytes(),
        )?;

        write_part(
            &mut zip,
            options,
            "ppt/slideMasters/slideMaster1.xml",
            SLIDE_MASTER_XML.as_bytes(),
        )?;
        write_part(
            &mut zip,
            options,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            rels_xml(&[
                Rel::new("rId1", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
                Rel::new("rId2", REL_THEME, "../theme/theme1.xml"),
            ])
            .as_bytes(),
        )?;
        write_part(
            &mut zip,
            options,
            "ppt/slideLayouts/slideLayout1.xml",
            SLIDE_LAYOUT_XML.as_bytes(),
        )?;
        write_part(
            &mut zip,
            options,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            rels_xml(&[Rel::new(
                "rId1",
                REL_SLIDE_MASTER,
                "../slideMasters/slideMaster1.xml",
            )])
            .as_bytes(),
        )?;
        write_part(&mut zip, options, "ppt/theme/theme1.xml", THEME_XML.as_bytes())?;

        for (i, slide) in self.slides.iter().enumerate() {
            write_part(
                &mut zip,
                options,
                &format!("ppt/slides/slide{}.xml", i + 1),
                slide.xml.as_bytes(),
            )?;
            write_part(
                &mut zip,
                options,
                &format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
                rels_xml(&slide.rels).as_bytes(),
            )?;
        }

        for (i, chart) in self.charts.iter().enumerate() {
            write_part(
                &mut zip,
                options,
                &format!("ppt/charts/chart{}.xml", i + 1),
                chart.as_bytes(),
            )?;
        }

        for media in &self.media {
            write_part(
                &mut zip,
                options,
                &format!("ppt/media/{}", media.filename),
                &media.bytes,
            )?;
        }

        Ok(zip.finish()?.into_inner())
    }

    fn content_types_xml(&self) -> String {
        let mut xml = String::from(XML_DECL);
        xml.push_str(
            "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
        );
        xml.push_str(
            "<Default Extension=\"rels\" \
             ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
        );
        xml.push_str("<Default Extension=\"xml\" ContentType=\"application/xml\"/>");

        // One Default per media extension actually present.
        let mut declared: Vec<&str> = Vec::new();
        for media in &self.media {
            if !declared.contains(&media.extension) {
                declared.push(media.extension);
                xml.push_str(&format!(
                    "<Default Extension=\"{}\" ContentType=\"{}\"/>",
                    media.extension, media.content_type
                ));
            }
        }

        xml.push_str(
            "<Override PartName=\"/ppt/presentation.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml\"/>",
        );
        xml.push_str(
            "<Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml\"/>",
        );
        xml.push_str(
            "<Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml\"/>",
        );
        xml.push_str(
            "<Override PartName=\"/ppt/theme/theme1.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>",
        );
        for i in 0..self.slides.len() {
            xml.push_str(&format!(
                "<Override PartName=\"/ppt/slides/slide{}.xml\" \
                 ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>",
                i + 1
            ));
        }
        for i in 0..self.charts.len() {
            xml.push_str(&format!(
                "<Override PartName=\"/ppt/charts/chart{}.xml\" \
                 ContentType=\"application/vnd.openxmlformats-officedocument.drawingml.chart+xml\"/>",
                i + 1
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}

fn write_part(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
    name: &str,
    bytes: &[u8],
) -> Result<(), PptxError> {
    zip.start_file(name, options)?;
    zip.write_all(bytes)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Fixed parts
// ---------------------------------------------------------------------------

fn presentation_xml(slide_count: usize) -> String {
    let mut slide_ids = String::new();
    for i in 0..slide_count {
        slide_ids.push_str(&format!(
            "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
            256 + i,
            i + 2
        ));
    }
    format!(
        "{XML_DECL}<p:presentation xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
         <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
         <p:sldIdLst>{slide_ids}</p:sldIdLst>\
         <p:sldSz cx=\"{SLIDE_CX}\" cy=\"{SLIDE_CY}\"/>\
         <p:notesSz cx=\"6858000\" cy=\"9144000\"/>\
         </p:presentation>"
    )
}

const SLIDE_MASTER_XML: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
    "<p:sldMaster xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" ",
    "xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" ",
    "xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">",
    "<p:cSld>",
    "<p:bg><p:bgRef idx=\"1001\"><a:schemeClr val=\"bg1\"/></p:bgRef></p:bg>",
    "<p:spTree>",
    "<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>",
    "<p:grpSpPr/>",
    "</p:spTree>",
    "</p:cSld>",
    "<p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" ",
    "accent2=\"accent2\" accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" ",
    "accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>",
    "<p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst>",
    "</p:sldMaster>",
);

const SLIDE_LAYOUT_XML: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
    "<p:sldLayout xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" ",
    "xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" ",
    "xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\" type=\"blank\">",
    "<p:cSld name=\"Blank\">",
    "<p:spTree>",
    "<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>",
    "<p:grpSpPr/>",
    "</p:spTree>",
    "</p:cSld>",
    "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>",
    "</p:sldLayout>",
);

const THEME_XML: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
    "<a:theme xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" name=\"Office Theme\">",
    "<a:themeElements>",
    "<a:clrScheme name=\"Office\">",
    "<a:dk1><a:sysClr val=\"windowText\" lastClr=\"000000\"/></a:dk1>",
    "<a:lt1><a:sysClr val=\"window\" lastClr=\"FFFFFF\"/></a:lt1>",
    "<a:dk2><a:srgbClr val=\"44546A\"/></a:dk2>",
    "<a:lt2><a:srgbClr val=\"E7E6E6\"/></a:lt2>",
    "<a:accent1><a:srgbClr val=\"4472C4\"/></a:accent1>",
    "<a:accent2><a:srgbClr val=\"ED7D31\"/></a:accent2>",
    "<a:accent3><a:srgbClr val=\"A5A5A5\"/></a:accent3>",
    "<a:accent4><a:srgbClr val=\"FFC000\"/></a:accent4>",
    "<a:accent5><a:srgbClr val=\"5B9BD5\"/></a:accent5>",
    "<a:accent6><a:srgbClr val=\"70AD47\"/></a:accent6>",
    "<a:hlink><a:srgbClr val=\"0563C1\"/></a:hlink>",
    "<a:folHlink><a:srgbClr val=\"954F72\"/></a:folHlink>",
    "</a:clrScheme>",
    "<a:fontScheme name=\"Office\">",
    "<a:majorFont><a:latin typeface=\"Calibri Light\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:majorFont>",
    "<a:minorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:minorFont>",
    "</a:fontScheme>",
    "<a:fmtScheme name=\"Office\">",
    "<a:fillStyleLst>",
    "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>",
    "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>",
    "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>",
    "</a:fillStyleLst>",
    "<a:lnStyleLst>",
    "<a:ln w=\"6350\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>",
    "<a:ln w=\"12700\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>",
    "<a:ln w=\"19050\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>",
    "</a:lnStyleLst>",
    "<a:effectStyleLst>",
    "<a:effectStyle><a:effectLst/></a:effectStyle>",
    "<a:effectStyle><a:effectLst/></a:effectStyle>",
    "<a:effectStyle><a:effectLst/></a:effectStyle>",
    "</a:effectStyleLst>",
    "<a:bgFillStyleLst>",
    "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>",
    "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>",
    "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>",
    "</a:bgFillStyleLst>",
    "</a:fmtScheme>",
    "</a:themeElements>",
    "</a:theme>",
);
