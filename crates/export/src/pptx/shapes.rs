//! DrawingML shape builders: text boxes, pictures and chart frames,
//! emitted as string fragments a slide part stitches together.

use quick_xml::escape::escape;

use docforge_core::markdown::{self, Block};

use super::package::{NS_A, NS_C, NS_P, NS_R, XML_DECL};

// Font sizes, in hundredths of a point.
pub(super) const SZ_DECK_TITLE: u32 = 4400;
pub(super) const SZ_DECK_SUBTITLE: u32 = 2400;
pub(super) const SZ_SLIDE_TITLE: u32 = 3200;
pub(super) const SZ_BODY: u32 = 1800;

const SZ_HEADING_1: u32 = 2400;
const SZ_HEADING_2: u32 = 2000;
const SZ_HEADING_3: u32 = 1800;

// Bullet indentation, in EMU.
const BULLET_MARGIN: i64 = 285_750;
const BULLET_STEP: i64 = 457_200;

/// Shape position and extent, in EMU.
pub(super) struct Rect {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Rect {
    /// A box of the given extent centered inside this one.
    pub(super) fn center(&self, cx: i64, cy: i64) -> Rect {
        Rect {
            x: self.x + (self.cx - cx) / 2,
            y: self.y + (self.cy - cy) / 2,
            cx,
            cy,
        }
    }
}

// ---------------------------------------------------------------------------
// Runs and paragraphs
// ---------------------------------------------------------------------------

pub(super) fn run(text: &str, size: u32, bold: bool) -> String {
    format!(
        "<a:r><a:rPr lang=\"en-US\" sz=\"{size}\" b=\"{}\" dirty=\"0\"/><a:t>{}</a:t></a:r>",
        u8::from(bold),
        escape(text),
    )
}

pub(super) fn paragraph(runs: &str) -> String {
    format!("<a:p><a:pPr><a:buNone/></a:pPr>{runs}</a:p>")
}

pub(super) fn bullet_paragraph(indent: u8, runs: &str) -> String {
    let margin = BULLET_MARGIN + BULLET_STEP * i64::from(indent);
    format!(
        "<a:p><a:pPr marL=\"{margin}\" indent=\"-{BULLET_MARGIN}\"><a:buChar char=\"\u{2022}\"/></a:pPr>{runs}</a:p>"
    )
}

// A txBody must hold at least one paragraph.
pub(super) fn empty_paragraph() -> &'static str {
    "<a:p><a:endParaRPr lang=\"en-US\"/></a:p>"
}

/// Render item content as a paragraph stream: headings bold and stepped
/// down in size, bullets with real bullet formatting, prose as-is.
pub(super) fn body_paragraphs(content: &str) -> String {
    let blocks = markdown::parse(content);
    if blocks.is_empty() {
        return empty_paragraph().to_string();
    }
    blocks.iter().map(block_paragraph).collect()
}

fn block_paragraph(block: &Block) -> String {
    match block {
        Block::Heading { level, runs } => {
            let size = match level {
                1 => SZ_HEADING_1,
                2 => SZ_HEADING_2,
                _ => SZ_HEADING_3,
            };
            let xml: String = runs.iter().map(|r| run(&r.text, size, true)).collect();
            paragraph(&xml)
        }
        Block::Bullet { indent, runs } => bullet_paragraph(*indent, &runs_xml(runs, SZ_BODY)),
        Block::Paragraph { runs } => paragraph(&runs_xml(runs, SZ_BODY)),
    }
}

fn runs_xml(runs: &[markdown::Run], size: u32) -> String {
    runs.iter().map(|r| run(&r.text, size, r.bold)).collect()
}

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

pub(super) fn text_box(id: u32, name: &str, rect: &Rect, paragraphs: &str) -> String {
    format!(
        "<p:sp>\
         <p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{name}\"/><p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
         <p:spPr><a:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr>\
         <p:txBody><a:bodyPr wrap=\"square\"><a:normAutofit/></a:bodyPr><a:lstStyle/>{paragraphs}</p:txBody>\
         </p:sp>",
        x = rect.x,
        y = rect.y,
        cx = rect.cx,
        cy = rect.cy,
    )
}

pub(super) fn picture(id: u32, rel_id: &str, rect: &Rect) -> String {
    format!(
        "<p:pic>\
         <p:nvPicPr><p:cNvPr id=\"{id}\" name=\"Picture {id}\"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>\
         <p:blipFill><a:blip r:embed=\"{rel_id}\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>\
         <p:spPr><a:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr>\
         </p:pic>",
        x = rect.x,
        y = rect.y,
        cx = rect.cx,
        cy = rect.cy,
    )
}

pub(super) fn chart_frame(id: u32, rel_id: &str, rect: &Rect) -> String {
    format!(
        "<p:graphicFrame>\
         <p:nvGraphicFramePr><p:cNvPr id=\"{id}\" name=\"Chart {id}\"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr>\
         <p:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></p:xfrm>\
         <a:graphic><a:graphicData uri=\"{NS_C}\">\
         <c:chart xmlns:c=\"{NS_C}\" xmlns:r=\"{NS_R}\" r:id=\"{rel_id}\"/>\
         </a:graphicData></a:graphic>\
         </p:graphicFrame>",
        x = rect.x,
        y = rect.y,
        cx = rect.cx,
        cy = rect.cy,
    )
}

/// Wrap assembled shapes into a complete slide part.
pub(super) fn slide_xml(shapes: &str) -> String {
    format!(
        "{XML_DECL}<p:sld xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
         <p:cSld><p:spTree>\
         <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
         <p:grpSpPr/>\
         {shapes}\
         </p:spTree></p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\
         </p:sld>"
    )
}
