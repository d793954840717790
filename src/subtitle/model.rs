/*!
 * Uniform in-memory representation of a subtitle file.
 *
 * A `Document` is built by one of the dialect parsers, has its cue text
 * replaced by the translation step, and is handed to the matching serializer.
 * Everything except `Cue::text_lines` is carried through untouched.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::subtitle::timestamp::Timestamp;

/// One of the supported subtitle grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Dialect {
    Srt,
    Vtt,
    Ass,
}

impl Dialect {
    /// Canonical file extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Ass => "ass",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Srt => "SRT",
            Self::Vtt => "VTT",
            Self::Ass => "ASS",
        };
        write!(f, "{}", name)
    }
}

/// Dialect-specific payload carried verbatim next to a cue
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "dialect", rename_all = "lowercase")]
pub enum Annotations {
    #[default]
    None,
    Srt {
        /// Text after the end timestamp (e.g. `X1:40 X2:600 Y1:20 Y2:50`)
        #[serde(default, skip_serializing_if = "String::is_empty")]
        position: String,
    },
    Vtt {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        identifier: Option<String>,
        /// Cue settings after the end timestamp (`align:start line:0`)
        #[serde(default, skip_serializing_if = "String::is_empty")]
        settings: String,
        /// `NOTE` blocks that appeared between the previous cue and this one
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        notes: Vec<String>,
    },
    Ass(AssEvent),
}

/// Opaque fields of an ASS event line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssEvent {
    /// Line key, normally `Dialogue`
    pub key: String,
    /// Whitespace between the colon and the first field
    pub spacing: String,
    /// Every field except `Text`, in file order
    pub fields: Vec<AssField>,
    /// Non-event lines (comments, blanks) between the previous event and this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading: Vec<String>,
    /// Where the override tags sit inside the text field
    pub layout: AssLayout,
}

/// A non-text field of an ASS event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssField {
    Start,
    End,
    Raw(String),
}

/// Structure of an ASS text field with the literal content removed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssLayout {
    pub lines: Vec<AssLine>,
    /// Line-break markers between lines (`\N` or `\n`), one fewer than `lines`
    pub breaks: Vec<String>,
}

/// Override tags of one visual line, anchored to literal character offsets
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssLine {
    /// Number of literal characters the line had when parsed
    pub literal_len: usize,
    pub tags: Vec<TagAnchor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAnchor {
    /// Character offset into the literal text of the line
    pub offset: usize,
    /// The full tag span including braces, e.g. `{\an8}`
    pub tag: String,
}

/// One timed caption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    /// Sequence number (SRT only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub start: Timestamp,
    pub end: Timestamp,
    /// Human-readable text, one entry per displayed line
    pub text_lines: Vec<String>,
    #[serde(default)]
    pub annotations: Annotations,
}

impl Cue {
    pub fn new(index: Option<usize>, start: Timestamp, end: Timestamp, text_lines: Vec<String>) -> Self {
        Cue {
            index,
            start,
            end,
            text_lines,
            annotations: Annotations::None,
        }
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// `start --> end` rendered in the grammar of `dialect`
    pub fn timing_label(&self, dialect: Dialect) -> String {
        format!("{} --> {}", self.start.format(dialect), self.end.format(dialect))
    }

    /// Text lines joined with newlines
    pub fn text(&self) -> String {
        self.text_lines.join("\n")
    }
}

/// Recoveries made while parsing, surfaced to the caller instead of aborting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseIssue {
    /// A cue was left out because its timing could not be decoded
    SkippedCue {
        line: usize,
        #[serde(serialize_with = "error_text")]
        error: SubtitleError,
    },
    /// An event line could not be decoded and is kept verbatim
    PassedThrough {
        line: usize,
        #[serde(serialize_with = "error_text")]
        error: SubtitleError,
    },
    /// Stray `{` or `}` treated as literal text
    UnbalancedBraces { line: usize },
    /// Missing or non-numeric SRT index replaced by the next number
    RenumberedIndex { line: usize },
    /// No `WEBVTT` header line was found
    MissingHeader,
    /// A text block without timing, appended to the previous cue
    OrphanText { line: usize },
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedCue { line, error } => write!(f, "line {}: cue skipped ({})", line, error),
            Self::PassedThrough { line, error } => {
                write!(f, "line {}: event kept verbatim ({})", line, error)
            }
            Self::UnbalancedBraces { line } => {
                write!(f, "line {}: unbalanced override braces treated as text", line)
            }
            Self::RenumberedIndex { line } => write!(f, "line {}: cue index renumbered", line),
            Self::MissingHeader => write!(f, "missing WEBVTT header"),
            Self::OrphanText { line } => {
                write!(f, "line {}: text without timing appended to previous cue", line)
            }
        }
    }
}

fn error_text<S: serde::Serializer>(error: &SubtitleError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&error.to_string())
}

/// A parsed subtitle file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub dialect: Dialect,
    /// Header block carried verbatim (empty for SRT)
    pub preamble: String,
    /// Cues in original file order
    pub cues: Vec<Cue>,
    /// Content after the last cue carried verbatim
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub trailer: String,
    #[serde(default, skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ParseIssue>,
}

impl Document {
    pub fn new(dialect: Dialect) -> Self {
        Document {
            dialect,
            preamble: String::new(),
            cues: Vec::new(),
            trailer: String::new(),
            issues: Vec::new(),
        }
    }

    /// Replace the text of the cue at `position`, keeping its line count
    pub fn replace_text(&mut self, position: usize, lines: Vec<String>) -> Result<(), SubtitleError> {
        let len = self.cues.len();
        let cue = self
            .cues
            .get_mut(position)
            .ok_or(SubtitleError::CueOutOfRange { cue: position, len })?;

        if cue.text_lines.len() != lines.len() {
            return Err(SubtitleError::LineCountMismatch {
                cue: position,
                expected: cue.text_lines.len(),
                actual: lines.len(),
            });
        }

        cue.text_lines = lines;
        Ok(())
    }

    /// Build a new document with every cue's text replaced, in order
    pub fn with_text(&self, replacements: Vec<Vec<String>>) -> Result<Document, SubtitleError> {
        if replacements.len() != self.cues.len() {
            return Err(SubtitleError::CueCountMismatch {
                expected: self.cues.len(),
                actual: replacements.len(),
            });
        }

        let mut document = self.clone();
        for (position, lines) in replacements.into_iter().enumerate() {
            document.replace_text(position, lines)?;
        }
        Ok(document)
    }

    /// Compare everything that serialization preserves, ignoring parse issues
    pub fn same_content(&self, other: &Document) -> bool {
        self.dialect == other.dialect
            && self.preamble == other.preamble
            && self.cues == other.cues
            && self.trailer == other.trailer
    }

    /// Total number of text lines across all cues
    pub fn line_count(&self) -> usize {
        self.cues.iter().map(|cue| cue.text_lines.len()).sum()
    }
}
