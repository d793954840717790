/*!
 * Timestamp codec for the supported subtitle dialects.
 *
 * - SRT: `HH:MM:SS,mmm` (a `.` separator is tolerated on input)
 * - VTT: `HH:MM:SS.mmm` or `MM:SS.mmm`
 * - ASS: `H:MM:SS.cc` (centiseconds)
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::subtitle::Dialect;

/// A point in time since the start of the media, with millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_millis(ms: u64) -> Self {
        Timestamp(ms)
    }

    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Decode a timestamp token written in the grammar of `dialect`
    pub fn parse(value: &str, dialect: Dialect) -> Result<Self, SubtitleError> {
        let malformed = || SubtitleError::MalformedTimestamp {
            value: value.to_string(),
            dialect,
        };

        let token = value.trim();
        let split = match dialect {
            Dialect::Srt => token.rsplit_once(|c: char| c == ',' || c == '.'),
            Dialect::Vtt | Dialect::Ass => token.rsplit_once('.'),
        };
        let (clock, fraction) = split.ok_or_else(malformed)?;

        let fraction_digits = match dialect {
            Dialect::Ass => 2,
            Dialect::Srt | Dialect::Vtt => 3,
        };
        if fraction.len() != fraction_digits {
            return Err(malformed());
        }
        let fraction = parse_field(fraction).ok_or_else(malformed)?;

        let fields = clock
            .split(':')
            .map(parse_field)
            .collect::<Option<Vec<u64>>>()
            .ok_or_else(malformed)?;

        let (hours, minutes, seconds) = match (dialect, fields.as_slice()) {
            (Dialect::Vtt, [minutes, seconds]) => (0, *minutes, *seconds),
            (_, [hours, minutes, seconds]) => (*hours, *minutes, *seconds),
            _ => return Err(malformed()),
        };

        if minutes >= 60 || seconds >= 60 {
            return Err(malformed());
        }

        let millis = match dialect {
            Dialect::Ass => fraction * 10,
            Dialect::Srt | Dialect::Vtt => fraction,
        };

        hours
            .checked_mul(3_600_000)
            .and_then(|total| total.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
            .map(Timestamp)
            .ok_or_else(malformed)
    }

    /// Encode in the exact grammar of `dialect`.
    ///
    /// ASS keeps only centiseconds; the sub-centisecond remainder is truncated.
    pub fn format(&self, dialect: Dialect) -> String {
        let ms = self.0;
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        match dialect {
            Dialect::Srt => format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis),
            Dialect::Vtt => format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis),
            Dialect::Ass => format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, millis / 10),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Split a `start --> end [settings]` timing line into its three parts
pub(crate) fn split_timing_line(line: &str) -> Option<(&str, &str, &str)> {
    let (start, rest) = line.split_once("-->")?;
    let rest = rest.trim_start();
    let (end, settings) = match rest.find(char::is_whitespace) {
        Some(at) => (&rest[..at], rest[at..].trim()),
        None => (rest, ""),
    };
    Some((start.trim(), end, settings))
}

fn parse_field(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
