/*!
 * SubRip (`.srt`) parser and serializer.
 */

use log::warn;

use crate::errors::SubtitleError;
use crate::subtitle::model::{Annotations, Cue, Dialect, Document, ParseIssue};
use crate::subtitle::timestamp::{split_timing_line, Timestamp};
use crate::subtitle::{normalize, split_blocks, Block};

/// Parse SRT content into a document.
///
/// A block without a timing line continues the previous cue, unless its first
/// line is a bare number: that reads as the index of a cue whose timing is
/// missing, and the whole parse fails with `TruncatedCue`. Cue text that
/// resumes after a blank line with a number-only line (e.g. `1984`) is
/// therefore rejected rather than guessed at.
pub fn parse(content: &str) -> Result<Document, SubtitleError> {
    let normalized = normalize(content);
    let mut document = Document::new(Dialect::Srt);

    for block in split_blocks(&normalized) {
        parse_block(&block, &mut document)?;
    }

    Ok(document)
}

fn parse_block(block: &Block<'_>, document: &mut Document) -> Result<(), SubtitleError> {
    let timing_at = if block.lines[0].contains("-->") { 0 } else { 1 };

    let Some(timing_line) = block.lines.get(timing_at).filter(|line| line.contains("-->")) else {
        let starts_cue = block.lines[0].trim().parse::<usize>().is_ok();
        return match document.cues.last_mut() {
            Some(previous) if !starts_cue => {
                append_orphan(previous, block);
                warn!("Line {}: text without timing appended to previous cue", block.line);
                document.issues.push(ParseIssue::OrphanText { line: block.line });
                Ok(())
            }
            _ => Err(SubtitleError::TruncatedCue { line: block.line }),
        };
    };

    let (start, end, position) = match parse_timing(timing_line) {
        Ok(timing) => timing,
        Err(error) => {
            warn!("Line {}: skipping cue: {}", block.line, error);
            document.issues.push(ParseIssue::SkippedCue { line: block.line, error });
            return Ok(());
        }
    };

    let parsed_index = if timing_at == 1 {
        block.lines[0].trim().parse::<usize>().ok()
    } else {
        None
    };
    let index = match parsed_index {
        Some(index) => index,
        None => {
            let position = document.cues.len();
            let next = document
                .cues
                .last()
                .and_then(|cue| cue.index)
                .and_then(|index| index.checked_add(1))
                .unwrap_or(position + 1);
            warn!("Line {}: missing or invalid cue index, using {}", block.line, next);
            document.issues.push(ParseIssue::RenumberedIndex { line: block.line });
            next
        }
    };

    let text_lines = block.lines[timing_at + 1..]
        .iter()
        .map(|line| line.trim_end().to_string())
        .collect();

    document.cues.push(
        Cue::new(Some(index), start, end, text_lines)
            .with_annotations(Annotations::Srt { position: position.to_string() }),
    );
    Ok(())
}

fn parse_timing(line: &str) -> Result<(Timestamp, Timestamp, &str), SubtitleError> {
    let (start, end, position) = split_timing_line(line).ok_or_else(|| SubtitleError::MalformedTimestamp {
        value: line.trim().to_string(),
        dialect: Dialect::Srt,
    })?;
    Ok((
        Timestamp::parse(start, Dialect::Srt)?,
        Timestamp::parse(end, Dialect::Srt)?,
        position,
    ))
}

fn append_orphan(previous: &mut Cue, block: &Block<'_>) {
    previous
        .text_lines
        .extend(std::iter::repeat_n(String::new(), block.blank_before));
    previous
        .text_lines
        .extend(block.lines.iter().map(|line| line.trim_end().to_string()));
}

/// Render a document as SRT
pub fn serialize(document: &Document) -> String {
    let blocks: Vec<String> = document
        .cues
        .iter()
        .enumerate()
        .map(|(position, cue)| {
            let index = cue.index.unwrap_or(position + 1);
            let mut block = format!("{}\n{}", index, cue.timing_label(Dialect::Srt));
            if let Annotations::Srt { position } = &cue.annotations {
                if !position.is_empty() {
                    block.push(' ');
                    block.push_str(position);
                }
            }
            for line in &cue.text_lines {
                block.push('\n');
                block.push_str(line);
            }
            block
        })
        .collect();

    if blocks.is_empty() {
        return String::new();
    }

    let mut output = blocks.join("\n\n");
    output.push('\n');
    output
}
