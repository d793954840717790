/*!
 * Classification of raw subtitle content into a dialect.
 */

use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::subtitle::{normalize, Dialect};

// Index line followed by an SRT timing line with comma-separated milliseconds
static SRT_CUE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*\d+[ \t]*\n[ \t]*\d+:\d{2}:\d{2},\d{3}[ \t]*-->").unwrap()
});

/// Result of format detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubtitleFormat {
    Srt,
    Vtt,
    Ass,
    Unknown,
}

impl SubtitleFormat {
    /// The dialect to parse with, or `UnknownFormat` for unclassified content
    pub fn dialect(self) -> Result<Dialect, SubtitleError> {
        match self {
            Self::Srt => Ok(Dialect::Srt),
            Self::Vtt => Ok(Dialect::Vtt),
            Self::Ass => Ok(Dialect::Ass),
            Self::Unknown => Err(SubtitleError::UnknownFormat(
                "content matches no supported subtitle grammar".to_string(),
            )),
        }
    }
}

impl From<Dialect> for SubtitleFormat {
    fn from(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Srt => Self::Srt,
            Dialect::Vtt => Self::Vtt,
            Dialect::Ass => Self::Ass,
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dialect() {
            Ok(dialect) => write!(f, "{}", dialect),
            Err(_) => write!(f, "Unknown"),
        }
    }
}

/// Classify `content`, falling back to the extension of `name`.
///
/// Content is inspected after BOM removal and line-ending normalization, the
/// same view the parsers get.
pub fn detect(name: Option<&str>, content: &str) -> SubtitleFormat {
    let normalized = normalize(content);
    let content = normalized.as_str();

    if is_webvtt_header(content) {
        return SubtitleFormat::Vtt;
    }

    if content
        .lines()
        .any(|line| line.trim().eq_ignore_ascii_case("[Script Info]"))
    {
        return SubtitleFormat::Ass;
    }

    if SRT_CUE_REGEX.is_match(content) {
        return SubtitleFormat::Srt;
    }

    name.map(from_extension).unwrap_or(SubtitleFormat::Unknown)
}

/// Map a file name to a format by extension only
pub fn from_extension(name: &str) -> SubtitleFormat {
    let extension = Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());

    match extension.as_deref() {
        Some("srt") => SubtitleFormat::Srt,
        Some("vtt") => SubtitleFormat::Vtt,
        Some("ass") | Some("ssa") => SubtitleFormat::Ass,
        _ => SubtitleFormat::Unknown,
    }
}

fn is_webvtt_header(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .is_some_and(is_webvtt_line)
}

/// `WEBVTT`, optionally followed by whitespace and a free-form title
pub(crate) fn is_webvtt_line(line: &str) -> bool {
    match line.trim().strip_prefix("WEBVTT") {
        Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
        None => false,
    }
}
