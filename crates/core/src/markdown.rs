//! Markdown-lite: the constrained markdown subset generated content is
//! written in (`#`/`##`/`###` headings, `-`/`*` bullets, inline
//! `**bold**` spans).
//!
//! Both export targets feed item content through [`parse`]; the blocks it
//! produces are the only structure the assemblers understand.

use std::sync::LazyLock;

use regex::Regex;

/// Pattern matching one non-greedy inline bold span.
const BOLD_PATTERN: &str = r"\*\*(.+?)\*\*";

/// Compiled bold-span regex. Compiled once, reused forever.
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BOLD_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Block model
// ---------------------------------------------------------------------------

/// One styled run of text within a block: plain or bold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
}

impl Run {
    /// A plain (unstyled) run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    /// A bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// A typed block produced from one non-empty input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `# ` / `## ` / `### ` prefixed line; `level` is 1..=3.
    Heading { level: u8, runs: Vec<Run> },
    /// `- ` / `* ` prefixed line. `indent` is 0, or 1 when the raw line was
    /// nested with exactly two leading spaces.
    Bullet { indent: u8, runs: Vec<Run> },
    /// Any other non-empty line.
    Paragraph { runs: Vec<Run> },
}

impl Block {
    /// The runs of this block, whatever its variant.
    pub fn runs(&self) -> &[Run] {
        match self {
            Block::Heading { runs, .. } => runs,
            Block::Bullet { runs, .. } => runs,
            Block::Paragraph { runs } => runs,
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a block of markdown-lite text into typed blocks.
///
/// Rules, applied per `\n`-separated line:
/// - blank (after trimming) -> skipped, no empty paragraph is emitted
/// - `# ` / `## ` / `### ` prefix -> heading level 1/2/3, prefix stripped
/// - `- ` / `* ` prefix -> bullet at indent 0
/// - exactly two leading spaces before `- `/`* ` -> bullet at indent 1
/// - anything else -> paragraph
///
/// Every block's text is split into plain/bold runs on `**...**` spans.
pub fn parse(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();

    for raw in text.lines() {
        // Nesting is decided before trimming; deeper or odd indents
        // collapse to a top-level bullet.
        let nested = raw.starts_with("  - ") || raw.starts_with("  * ");
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let block = if let Some(rest) = line.strip_prefix("### ") {
            Block::Heading {
                level: 3,
                runs: split_runs(rest),
            }
        } else if let Some(rest) = line.strip_prefix("## ") {
            Block::Heading {
                level: 2,
                runs: split_runs(rest),
            }
        } else if let Some(rest) = line.strip_prefix("# ") {
            Block::Heading {
                level: 1,
                runs: split_runs(rest),
            }
        } else if let Some(rest) = line
            .strip_prefix("- ")
            .or_else(|| line.strip_prefix("* "))
        {
            Block::Bullet {
                indent: if nested { 1 } else { 0 },
                runs: split_runs(rest),
            }
        } else {
            Block::Paragraph {
                runs: split_runs(line),
            }
        };
        blocks.push(block);
    }

    blocks
}

/// Split text into plain/bold runs on non-greedy `**...**` spans.
///
/// Delimiters are stripped from the output. Unmatched markers and empty
/// spans (`****`) are left as literal text in a plain run.
pub fn split_runs(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut last = 0;

    for m in BOLD_RE.find_iter(text) {
        if m.start() > last {
            runs.push(Run::plain(&text[last..m.start()]));
        }
        // The match is `**inner**`; peel two delimiter chars off each end.
        runs.push(Run::bold(&text[m.start() + 2..m.end() - 2]));
        last = m.end();
    }
    if last < text.len() {
        runs.push(Run::plain(&text[last..]));
    }

    runs
}

/// Remove literal `**` bold markers, keeping the inner text.
///
/// Applied by callers when echoing freshly generated content to storage.
/// The parser itself still understands bold for content arriving from any
/// other path (manual edits, older rows).
pub fn strip_bold_markers(text: &str) -> String {
    BOLD_RE.replace_all(text, "$1").into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
