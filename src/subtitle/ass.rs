/*!
 * Advanced SubStation Alpha (`.ass`/`.ssa`) parser and serializer.
 *
 * Only `Dialogue:` lines inside `[Events]` become cues. Every other line
 * (script info, styles, `Format:`, `Comment:` events, later sections) is
 * carried verbatim. The `Text` field of an event is split into override tags
 * (`{...}` spans) and literal text; the literal text becomes the cue's lines,
 * split on the `\N` and `\n` markers.
 */

use log::warn;

use crate::errors::SubtitleError;
use crate::subtitle::model::{
    Annotations, AssEvent, AssField, AssLayout, AssLine, Cue, Dialect, Document, ParseIssue, TagAnchor,
};
use crate::subtitle::normalize;
use crate::subtitle::timestamp::Timestamp;

const DEFAULT_COLUMNS: [&str; 10] = [
    "layer", "start", "end", "style", "name", "marginl", "marginr", "marginv", "effect", "text",
];

const HARD_BREAK: &str = "\\N";

/// Column layout of event lines, taken from the `[Events]` `Format:` line
#[derive(Debug, Clone)]
struct EventFormat {
    columns: usize,
    start: usize,
    end: usize,
}

impl EventFormat {
    fn from_columns<S: AsRef<str>>(names: &[S]) -> Option<Self> {
        let position = |wanted: &str| names.iter().position(|name| name.as_ref() == wanted);
        let start = position("start")?;
        let end = position("end")?;
        if names.last().map(|name| name.as_ref()) != Some("text") {
            return None;
        }
        Some(EventFormat { columns: names.len(), start, end })
    }

    fn parse(body: &str) -> Option<Self> {
        let names: Vec<String> = body.split(',').map(|name| name.trim().to_lowercase()).collect();
        Self::from_columns(&names)
    }
}

impl Default for EventFormat {
    fn default() -> Self {
        EventFormat { columns: DEFAULT_COLUMNS.len(), start: 1, end: 2 }
    }
}

/// Return the text after `key:` when `line` is a `key:` line
fn strip_key<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.trim_start().strip_prefix(key)?.strip_prefix(':')
}

/// Parse ASS/SSA content into a document
pub fn parse(content: &str) -> Result<Document, SubtitleError> {
    let normalized = normalize(content);
    let mut document = Document::new(Dialect::Ass);
    let mut preamble: Vec<String> = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    let mut in_events = false;
    let mut format = EventFormat::default();

    for (number, line) in normalized.lines().enumerate() {
        let number = number + 1;
        let trimmed = line.trim();

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            in_events = trimmed.eq_ignore_ascii_case("[Events]");
        } else if in_events {
            if let Some(body) = strip_key(line, "Format") {
                match EventFormat::parse(body) {
                    Some(parsed) => format = parsed,
                    None => warn!("Line {}: unusable event format, keeping the default columns", number),
                }
            } else if let Some(body) = strip_key(line, "Dialogue") {
                match parse_event(body, &format, number, &mut document.issues) {
                    Ok((mut cue, mut event)) => {
                        event.leading = if document.cues.is_empty() {
                            split_trailing_blanks(&mut preamble)
                        } else {
                            std::mem::take(&mut pending)
                        };
                        cue.annotations = Annotations::Ass(event);
                        document.cues.push(cue);
                        continue;
                    }
                    Err(error) => {
                        warn!("Line {}: keeping event verbatim: {}", number, error);
                        document.issues.push(ParseIssue::PassedThrough { line: number, error });
                    }
                }
            }
        }

        if document.cues.is_empty() {
            preamble.push(line.to_string());
        } else {
            pending.push(line.to_string());
        }
    }

    trim_trailing_blanks(&mut preamble);
    trim_trailing_blanks(&mut pending);
    document.preamble = preamble.join("\n");
    document.trailer = pending.join("\n");
    Ok(document)
}

fn trim_trailing_blanks(lines: &mut Vec<String>) {
    split_trailing_blanks(lines);
}

/// Remove and return the blank lines at the end of `lines`
fn split_trailing_blanks(lines: &mut Vec<String>) -> Vec<String> {
    let keep = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |last| last + 1);
    lines.split_off(keep)
}

fn parse_event(
    body: &str,
    format: &EventFormat,
    number: usize,
    issues: &mut Vec<ParseIssue>,
) -> Result<(Cue, AssEvent), SubtitleError> {
    let values = body.trim_start();
    let spacing = &body[..body.len() - values.len()];

    let parts: Vec<&str> = values.splitn(format.columns, ',').collect();
    if parts.len() < format.columns {
        return Err(SubtitleError::TruncatedCue { line: number });
    }

    let start = Timestamp::parse(parts[format.start], Dialect::Ass)?;
    let end = Timestamp::parse(parts[format.end], Dialect::Ass)?;

    let fields = parts[..format.columns - 1]
        .iter()
        .enumerate()
        .map(|(column, raw)| match column {
            c if c == format.start => AssField::Start,
            c if c == format.end => AssField::End,
            _ => AssField::Raw(raw.to_string()),
        })
        .collect();

    let segmented = segment_text(parts[format.columns - 1]);
    if !segmented.balanced {
        warn!("Line {}: unbalanced override braces treated as text", number);
        issues.push(ParseIssue::UnbalancedBraces { line: number });
    }

    let cue = Cue::new(None, start, end, segmented.lines);
    let event = AssEvent {
        key: "Dialogue".to_string(),
        spacing: spacing.to_string(),
        fields,
        leading: Vec::new(),
        layout: segmented.layout,
    };
    Ok((cue, event))
}

struct SegmentedText {
    layout: AssLayout,
    lines: Vec<String>,
    balanced: bool,
}

/// Split a text field into literal lines and anchored override tags
fn segment_text(text: &str) -> SegmentedText {
    let mut layout = AssLayout::default();
    let mut lines = Vec::new();
    let mut literal = String::new();
    let mut literal_len = 0;
    let mut tags = Vec::new();
    let mut balanced = true;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if c == '{' {
            let inner = &rest[1..];
            match inner.find(|ch: char| ch == '{' || ch == '}') {
                Some(at) if inner[at..].starts_with('}') => {
                    let span = at + 2;
                    tags.push(TagAnchor { offset: literal_len, tag: rest[..span].to_string() });
                    rest = &rest[span..];
                    continue;
                }
                _ => balanced = false,
            }
        } else if c == '}' {
            balanced = false;
        } else if rest.starts_with("\\N") || rest.starts_with("\\n") {
            layout.lines.push(AssLine { literal_len, tags: std::mem::take(&mut tags) });
            layout.breaks.push(rest[..2].to_string());
            lines.push(std::mem::take(&mut literal));
            literal_len = 0;
            rest = &rest[2..];
            continue;
        }

        literal.push(c);
        literal_len += 1;
        rest = &rest[c.len_utf8()..];
    }

    layout.lines.push(AssLine { literal_len, tags });
    lines.push(literal);

    SegmentedText { layout, lines, balanced }
}

/// Rebuild a text field from (possibly replaced) lines and the original layout
fn render_text(lines: &[String], layout: Option<&AssLayout>) -> String {
    let mut output = String::new();

    for (position, line) in lines.iter().enumerate() {
        if position > 0 {
            let marker = layout
                .and_then(|layout| layout.breaks.get(position - 1))
                .map(String::as_str)
                .unwrap_or(HARD_BREAK);
            output.push_str(marker);
        }

        match layout.and_then(|layout| layout.lines.get(position)) {
            Some(ass_line) => place_tags(&mut output, ass_line, line),
            None => output.push_str(line),
        }
    }

    output
}

/// Interleave the tags of `ass_line` into `text`, preserving their order
fn place_tags(output: &mut String, ass_line: &AssLine, text: &str) {
    let chars: Vec<char> = text.chars().collect();
    let mut cursor = 0;

    for anchor in &ass_line.tags {
        let at = relocate(anchor.offset, ass_line.literal_len, &chars).max(cursor);
        output.extend(&chars[cursor..at]);
        output.push_str(&anchor.tag);
        cursor = at;
    }

    output.extend(&chars[cursor..]);
}

/// Map a tag offset from the original literal onto the replacement text.
///
/// Offsets at either end stay at the ends. Interior offsets are kept as-is
/// when the length is unchanged, otherwise scaled and moved back to the
/// start of the word they land in.
fn relocate(offset: usize, original_len: usize, chars: &[char]) -> usize {
    let new_len = chars.len();
    if offset == 0 {
        return 0;
    }
    if offset >= original_len {
        return new_len;
    }
    if new_len == original_len {
        return offset;
    }

    let scaled = ((offset * new_len + original_len / 2) / original_len).min(new_len);
    let mut at = scaled;
    while at > 0 && !chars[at - 1].is_whitespace() {
        at -= 1;
    }
    if at == 0 { scaled } else { at }
}

fn render_event(cue: &Cue, event: &AssEvent) -> String {
    let fields: Vec<String> = event
        .fields
        .iter()
        .map(|field| match field {
            AssField::Start => cue.start.format(Dialect::Ass),
            AssField::End => cue.end.format(Dialect::Ass),
            AssField::Raw(raw) => raw.clone(),
        })
        .collect();

    format!(
        "{}:{}{},{}",
        event.key,
        event.spacing,
        fields.join(","),
        render_text(&cue.text_lines, Some(&event.layout))
    )
}

fn default_event(cue: &Cue) -> String {
    format!(
        "Dialogue: 0,{},{},Default,,0,0,0,,{}",
        cue.start.format(Dialect::Ass),
        cue.end.format(Dialect::Ass),
        render_text(&cue.text_lines, None)
    )
}

/// Render a document as ASS
pub fn serialize(document: &Document) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(document.cues.len() + 2);

    if !document.preamble.is_empty() {
        lines.push(document.preamble.clone());
    }

    for cue in &document.cues {
        match &cue.annotations {
            Annotations::Ass(event) => {
                lines.extend(event.leading.iter().cloned());
                lines.push(render_event(cue, event));
            }
            _ => lines.push(default_event(cue)),
        }
    }

    if !document.trailer.is_empty() {
        lines.push(document.trailer.clone());
    }

    if lines.is_empty() {
        return String::new();
    }

    let mut output = lines.join("\n");
    output.push('\n');
    output
}
