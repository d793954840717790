/*!
 * WebVTT (`.vtt`) parser and serializer.
 *
 * The header block and any `NOTE`, `STYLE` or `REGION` blocks before the first
 * cue form the preamble. `NOTE` blocks between cues travel with the cue that
 * follows them; those after the last cue form the trailer.
 */

use log::warn;

use crate::errors::SubtitleError;
use crate::subtitle::detector::is_webvtt_line;
use crate::subtitle::model::{Annotations, Cue, Dialect, Document, ParseIssue};
use crate::subtitle::timestamp::{split_timing_line, Timestamp};
use crate::subtitle::{normalize, split_blocks, Block};

const DEFAULT_HEADER: &str = "WEBVTT";

/// Parse WebVTT content into a document
pub fn parse(content: &str) -> Result<Document, SubtitleError> {
    let normalized = normalize(content);
    let mut document = Document::new(Dialect::Vtt);
    let mut blocks = split_blocks(&normalized).into_iter().peekable();

    let mut preamble: Vec<String> = Vec::new();
    match blocks.next_if(|block| is_webvtt_line(block.lines[0])) {
        Some(header) => preamble.push(block_text(&header)),
        None => {
            warn!("No WEBVTT header found, assuming one");
            document.issues.push(ParseIssue::MissingHeader);
            preamble.push(DEFAULT_HEADER.to_string());
        }
    }

    let mut pending_notes: Vec<String> = Vec::new();

    for block in blocks {
        let Some(timing_at) = block.lines.iter().position(|line| line.contains("-->")) else {
            if is_metadata_block(&block) || document.cues.is_empty() {
                if document.cues.is_empty() {
                    preamble.push(block_text(&block));
                } else {
                    pending_notes.push(block_text(&block));
                }
            } else if let Some(previous) = document.cues.last_mut() {
                previous
                    .text_lines
                    .extend(std::iter::repeat_n(String::new(), block.blank_before));
                previous
                    .text_lines
                    .extend(block.lines.iter().map(|line| line.trim_end().to_string()));
                warn!("Line {}: text without timing appended to previous cue", block.line);
                document.issues.push(ParseIssue::OrphanText { line: block.line });
            }
            continue;
        };

        let (start, end, settings) = match parse_timing(block.lines[timing_at]) {
            Ok(timing) => timing,
            Err(error) => {
                warn!("Line {}: skipping cue: {}", block.line, error);
                document.issues.push(ParseIssue::SkippedCue { line: block.line, error });
                continue;
            }
        };

        let identifier = (timing_at > 0).then(|| {
            block.lines[..timing_at]
                .iter()
                .map(|line| line.trim_end())
                .collect::<Vec<_>>()
                .join("\n")
        });

        let text_lines = block.lines[timing_at + 1..]
            .iter()
            .map(|line| line.trim_end().to_string())
            .collect();

        document.cues.push(
            Cue::new(None, start, end, text_lines).with_annotations(Annotations::Vtt {
                identifier,
                settings: settings.to_string(),
                notes: std::mem::take(&mut pending_notes),
            }),
        );
    }

    document.preamble = preamble.join("\n\n");
    document.trailer = pending_notes.join("\n\n");
    Ok(document)
}

fn parse_timing(line: &str) -> Result<(Timestamp, Timestamp, &str), SubtitleError> {
    let (start, end, settings) = split_timing_line(line).ok_or_else(|| SubtitleError::MalformedTimestamp {
        value: line.trim().to_string(),
        dialect: Dialect::Vtt,
    })?;
    Ok((
        Timestamp::parse(start, Dialect::Vtt)?,
        Timestamp::parse(end, Dialect::Vtt)?,
        settings,
    ))
}

fn is_metadata_block(block: &Block<'_>) -> bool {
    let first = block.lines[0].trim_end();
    ["NOTE", "STYLE", "REGION"].iter().any(|keyword| {
        first
            .strip_prefix(keyword)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    })
}

fn block_text(block: &Block<'_>) -> String {
    block
        .lines
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a document as WebVTT
pub fn serialize(document: &Document) -> String {
    let mut blocks: Vec<String> = Vec::with_capacity(document.cues.len() + 2);

    if document.preamble.is_empty() {
        blocks.push(DEFAULT_HEADER.to_string());
    } else {
        blocks.push(document.preamble.clone());
    }

    for cue in &document.cues {
        let mut block = String::new();
        let mut settings = "";

        if let Annotations::Vtt { identifier, settings: cue_settings, notes } = &cue.annotations {
            blocks.extend(notes.iter().cloned());
            if let Some(identifier) = identifier {
                block.push_str(identifier);
                block.push('\n');
            }
            settings = cue_settings;
        }

        block.push_str(&cue.timing_label(Dialect::Vtt));
        if !settings.is_empty() {
            block.push(' ');
            block.push_str(settings);
        }
        for line in &cue.text_lines {
            block.push('\n');
            block.push_str(line);
        }
        blocks.push(block);
    }

    if !document.trailer.is_empty() {
        blocks.push(document.trailer.clone());
    }

    let mut output = blocks.join("\n\n");
    output.push('\n');
    output
}
