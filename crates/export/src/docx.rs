//! Flow-document (.docx) assembler over `docx-rs`.

use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, Paragraph, Run};

use docforge_core::markdown::{self, Block, Run as TextRun};
use docforge_core::project::ContentItem;

use crate::ExportError;

// Font sizes in half-points.
const SIZE_DOC_TITLE: usize = 52;
const SIZE_HEADING_1: usize = 36;
const SIZE_HEADING_2: usize = 32;
const SIZE_HEADING_3: usize = 28;
const SIZE_BODY: usize = 22;

/// Visible bullet marker; list numbering definitions are overkill for
/// single-level bullets.
const BULLET_PREFIX: &str = "• ";

/// Assemble a flow document: title paragraph, then per item a level-1
/// heading followed by its parsed markdown blocks.
///
/// `items` must already be in render order.
pub fn assemble(title: &str, items: &[&ContentItem]) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new().add_paragraph(
        Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(Run::new().add_text(title).size(SIZE_DOC_TITLE).bold()),
    );

    for item in items {
        docx = docx.add_paragraph(
            Paragraph::new().add_run(
                Run::new()
                    .add_text(item.title.as_str())
                    .size(SIZE_HEADING_1)
                    .bold(),
            ),
        );

        for block in markdown::parse(&item.content) {
            docx = docx.add_paragraph(block_paragraph(&block));
        }
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(buffer.into_inner())
}

fn block_paragraph(block: &Block) -> Paragraph {
    match block {
        Block::Heading { level, runs } => {
            let size = match level {
                1 => SIZE_HEADING_1,
                2 => SIZE_HEADING_2,
                _ => SIZE_HEADING_3,
            };
            styled_paragraph(runs, size, true)
        }
        // Flow output flattens bullet nesting to a single level.
        Block::Bullet { runs, .. } => {
            let mut para = Paragraph::new()
                .add_run(Run::new().add_text(BULLET_PREFIX).size(SIZE_BODY));
            for run in runs {
                para = para.add_run(text_run(run, SIZE_BODY, false));
            }
            para
        }
        Block::Paragraph { runs } => styled_paragraph(runs, SIZE_BODY, false),
    }
}

fn styled_paragraph(runs: &[TextRun], size: usize, force_bold: bool) -> Paragraph {
    let mut para = Paragraph::new();
    for run in runs {
        para = para.add_run(text_run(run, size, force_bold));
    }
    para
}

fn text_run(run: &TextRun, size: usize, force_bold: bool) -> Run {
    let mut r = Run::new().add_text(run.text.as_str()).size(size);
    if force_bold || run.bold {
        r = r.bold();
    }
    r
}
