/*!
 * Tests for error types
 */

use subtrans::errors::{AppError, SubtitleError};
use subtrans::Dialect;

/// Test subtitle error messages
#[test]
fn test_subtitleError_display_shouldDescribeProblem() {
    let err = SubtitleError::MalformedTimestamp { value: "1:2:3".to_string(), dialect: Dialect::Srt };
    assert_eq!(err.to_string(), "Malformed SRT timestamp: '1:2:3'");

    let err = SubtitleError::LineCountMismatch { cue: 4, expected: 2, actual: 3 };
    assert_eq!(err.to_string(), "Cue 4 expects 2 line(s) but the replacement has 3");

    let err = SubtitleError::TruncatedCue { line: 12 };
    assert_eq!(err.to_string(), "Truncated cue starting at line 12");
}

/// Test conversions into the application error
#[test]
fn test_appError_from_shouldWrapSources() {
    let err: AppError = SubtitleError::UnknownFormat("x.txt".to_string()).into();
    assert!(matches!(err, AppError::Subtitle(SubtitleError::UnknownFormat(_))));
    assert_eq!(err.to_string(), "Subtitle error: Unsupported subtitle format: x.txt");

    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: AppError = io.into();
    assert!(matches!(err, AppError::File(_)));

    let err: AppError = anyhow::anyhow!("boom").into();
    assert_eq!(err.to_string(), "Unknown error: boom");
}
