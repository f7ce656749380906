/*!
 * Timecode conversion between text and milliseconds.
 *
 * Two textual shapes are accepted on input:
 * - `H:MM:SS.ss` as written by ASS/SSA files
 * - `HH:MM:SS,mmm` / `HH:MM:SS.mmm` as written by SubRip and WebVTT files
 *
 * Output is always the canonical `H:MM:SS.cc` form (centiseconds).
 */

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Decode a textual timecode into milliseconds.
///
/// A `,` before the fractional part is treated like a `.`. The text may hold
/// one, two or three `:`-separated parts (`SS.ss`, `MM:SS.ss`, `H:MM:SS.ss`);
/// missing leading parts count as zero. Sub-millisecond digits are truncated.
pub fn decode(text: &str) -> Result<u64, SubtitleError> {
    let normalized = text.replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();

    if parts.len() > 3 {
        return Err(SubtitleError::MalformedTimecode(text.to_string()));
    }

    let malformed = || SubtitleError::MalformedTimecode(text.to_string());

    // Rightmost part is seconds, then minutes, then hours
    let mut parts = parts.into_iter().rev();
    let seconds_ms = parts
        .next()
        .map(|s| parse_seconds(s).ok_or_else(malformed))
        .transpose()?
        .unwrap_or(0);
    let minutes = parts
        .next()
        .map(|m| parse_whole(m).ok_or_else(malformed))
        .transpose()?
        .unwrap_or(0);
    let hours = parts
        .next()
        .map(|h| parse_whole(h).ok_or_else(malformed))
        .transpose()?
        .unwrap_or(0);

    hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|ms| minutes.checked_mul(MS_PER_MINUTE).and_then(|m| ms.checked_add(m)))
        .and_then(|ms| ms.checked_add(seconds_ms))
        .ok_or_else(malformed)
}

/// Encode milliseconds as `H:MM:SS.cc`.
///
/// The sub-centisecond remainder is truncated, never rounded.
pub fn encode(milliseconds: u64) -> String {
    let hours = milliseconds / MS_PER_HOUR;
    let minutes = (milliseconds % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (milliseconds % MS_PER_MINUTE) / MS_PER_SECOND;
    let centis = (milliseconds % MS_PER_SECOND) / 10;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis)
}

fn parse_whole(part: &str) -> Option<u64> {
    let part = part.trim();
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

// Seconds may carry a fraction; digits past the millisecond are dropped.
fn parse_seconds(part: &str) -> Option<u64> {
    let part = part.trim();
    let (whole, fraction) = match part.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (part, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole_secs = if whole.is_empty() { 0 } else { parse_whole(whole)? };

    let mut millis = 0;
    let mut scale = 100;
    for digit in fraction.bytes().take(3) {
        millis += u64::from(digit - b'0') * scale;
        scale /= 10;
    }

    whole_secs.checked_mul(MS_PER_SECOND)?.checked_add(millis)
}

/// A point in time or a length of time at centisecond precision.
///
/// Values built through [`Timecode::from_millis`] are truncated to whole
/// centiseconds, so the canonical text always decodes back to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timecode(u64);

impl Timecode {
    /// Create a timecode, truncating to whole centiseconds
    pub fn from_millis(milliseconds: u64) -> Self {
        Timecode(milliseconds / 10 * 10)
    }

    /// Milliseconds represented by this timecode
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Filename-safe form of the canonical text (`0_00_09-70`)
    pub fn to_file_stem(&self) -> String {
        encode(self.0).replace(':', "_").replace('.', "-")
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self.0))
    }
}

impl FromStr for Timecode {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).map(Timecode::from_millis)
    }
}
