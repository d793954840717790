/*!
 * Error types for the subtrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

use crate::subtitle::Dialect;

/// Errors that can occur while decoding, parsing or rewriting subtitles
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubtitleError {
    /// The content could not be classified as any supported dialect
    #[error("Unsupported subtitle format: {0}")]
    UnknownFormat(String),

    /// A timestamp token violates its dialect grammar
    #[error("Malformed {dialect} timestamp: '{value}'")]
    MalformedTimestamp {
        /// The offending token
        value: String,
        /// Grammar the token was decoded against
        dialect: Dialect,
    },

    /// A cue block lacks a mandatory field
    #[error("Truncated cue starting at line {line}")]
    TruncatedCue {
        /// 1-based line number where the cue block started
        line: usize,
    },

    /// A replacement supplied a different number of lines than the cue holds
    #[error("Cue {cue} expects {expected} line(s) but the replacement has {actual}")]
    LineCountMismatch {
        /// Position of the cue in the document
        cue: usize,
        /// Number of lines in the original cue
        expected: usize,
        /// Number of lines supplied
        actual: usize,
    },

    /// A replacement targeted a cue position that does not exist
    #[error("Cue {cue} is out of range (document has {len} cues)")]
    CueOutOfRange {
        cue: usize,
        len: usize,
    },

    /// A bulk replacement supplied a different number of cues than the document holds
    #[error("Document has {expected} cue(s) but {actual} replacement(s) were supplied")]
    CueCountMismatch {
        expected: usize,
        actual: usize,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the configuration layer
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
