/*!
 * Subtitle document model and per-dialect codecs.
 *
 * Control flow: `detector::detect` picks a dialect, the matching parser builds
 * a `Document`, the translation step replaces cue text, and the matching
 * serializer re-emits dialect-correct text.
 *
 * # Architecture
 *
 * - `timestamp`: timestamp grammar of each dialect
 * - `detector`: content/filename classification
 * - `model`: `Document`, `Cue` and the opaque per-dialect annotations
 * - `srt`, `vtt`, `ass`: one `parse`/`serialize` pair per dialect
 */

use log::debug;
use serde::Serialize;

use crate::errors::SubtitleError;

pub mod ass;
pub mod detector;
pub mod model;
pub mod srt;
pub mod timestamp;
pub mod vtt;

pub use detector::{detect, SubtitleFormat};
pub use model::{Annotations, Cue, Dialect, Document, ParseIssue};
pub use timestamp::Timestamp;

/// Parse `content` with the grammar of `dialect`
pub fn parse(dialect: Dialect, content: &str) -> Result<Document, SubtitleError> {
    let document = match dialect {
        Dialect::Srt => srt::parse(content)?,
        Dialect::Vtt => vtt::parse(content)?,
        Dialect::Ass => ass::parse(content)?,
    };
    debug!(
        "Parsed {} document: {} cues, {} issue(s)",
        dialect,
        document.cues.len(),
        document.issues.len()
    );
    Ok(document)
}

/// Detect the dialect of `content` and parse it, rejecting unknown formats
pub fn parse_with_hint(name: Option<&str>, content: &str) -> Result<Document, SubtitleError> {
    let dialect = detect(name, content)
        .dialect()
        .map_err(|_| SubtitleError::UnknownFormat(name.unwrap_or("<unnamed>").to_string()))?;
    parse(dialect, content)
}

/// Render `document` in its own dialect
pub fn serialize(document: &Document) -> String {
    match document.dialect {
        Dialect::Srt => srt::serialize(document),
        Dialect::Vtt => vtt::serialize(document),
        Dialect::Ass => ass::serialize(document),
    }
}

/// Outcome of parsing, serializing and re-parsing a file
#[derive(Debug, Clone, Serialize)]
pub struct RoundTripReport {
    pub dialect: Dialect,
    pub cues: usize,
    /// Re-parsing the output yields the same document
    pub structurally_equal: bool,
    /// Output equals the input after line-ending and trailing-blank normalization
    pub textually_equal: bool,
    pub issues: Vec<ParseIssue>,
}

impl RoundTripReport {
    pub fn is_lossless(&self) -> bool {
        self.structurally_equal
    }
}

/// Check that `serialize(parse(content))` preserves the document
pub fn round_trip(name: Option<&str>, content: &str) -> Result<RoundTripReport, SubtitleError> {
    let document = parse_with_hint(name, content)?;
    let output = serialize(&document);
    let reparsed = parse(document.dialect, &output)?;

    Ok(RoundTripReport {
        dialect: document.dialect,
        cues: document.cues.len(),
        structurally_equal: document.same_content(&reparsed),
        textually_equal: canonical_text(content) == canonical_text(&output),
        issues: document.issues,
    })
}

/// Strip the BOM and unify line endings
pub(crate) fn normalize(content: &str) -> String {
    content
        .strip_prefix('\u{feff}')
        .unwrap_or(content)
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

fn canonical_text(content: &str) -> String {
    let normalized = normalize(content);
    let lines: Vec<&str> = normalized.lines().map(str::trim_end).collect();
    lines.join("\n").trim_end().to_string()
}

/// A run of non-blank lines
pub(crate) struct Block<'a> {
    /// 1-based line number of the first line
    pub line: usize,
    /// Blank lines between the previous block and this one
    pub blank_before: usize,
    pub lines: Vec<&'a str>,
}

/// Split normalized content into blocks separated by blank lines
pub(crate) fn split_blocks(content: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current: Option<Block<'_>> = None;
    let mut blank_run = 0;

    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            blank_run += 1;
            continue;
        }

        current
            .get_or_insert_with(|| Block {
                line: number + 1,
                blank_before: std::mem::take(&mut blank_run),
                lines: Vec::new(),
            })
            .lines
            .push(line);
    }

    if let Some(block) = current {
        blocks.push(block);
    }
    blocks
}
