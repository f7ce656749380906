/*!
 * Subtitle processing: parsing ASS/SSA, WebVTT and SubRip files into
 * a single ordered sequence of dialogue records.
 *
 * - `timecode`: textual timecode conversion
 * - `ass`: Advanced SubStation Alpha parser
 * - `vtt`: WebVTT and SubRip parser
 * - `aligner`: nearest-start matching between two tracks
 */

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;

pub use self::aligner::{find_closest, find_closest_ms};
pub use self::timecode::Timecode;

pub mod aligner;
pub mod ass;
pub mod timecode;
pub mod vtt;

/// A single dialogue segment after padding has been applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueRecord {
    /// Padded start of the segment
    pub start: Timecode,

    /// Padded length of the segment
    pub duration: Timecode,

    /// Cue text with markup noise removed, never empty
    pub text: String,
}

impl DialogueRecord {
    /// Creates a record, truncating both times to centiseconds
    pub fn new(start_ms: u64, duration_ms: u64, text: impl Into<String>) -> Self {
        DialogueRecord {
            start: Timecode::from_millis(start_ms),
            duration: Timecode::from_millis(duration_ms),
            text: text.into(),
        }
    }

    /// Build a record from a raw cue interval and the padding to apply.
    ///
    /// The start is moved back by `padding_ms` (never below zero) and the
    /// end is moved forward by the same amount.
    pub fn padded(start_ms: u64, end_ms: u64, padding_ms: u64, text: impl Into<String>) -> Self {
        let start = start_ms.saturating_sub(padding_ms);
        let end = end_ms.saturating_add(padding_ms);
        Self::new(start, end.saturating_sub(start), text)
    }

    /// End of the segment (start plus duration)
    pub fn end(&self) -> Timecode {
        Timecode::from_millis(self.start.as_millis().saturating_add(self.duration.as_millis()))
    }
}

impl fmt::Display for DialogueRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{} +{}] {}", self.start, self.duration, self.text)
    }
}

/// Subtitle file formats, chosen by file suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    /// `.ass` and `.ssa`
    Ass,
    /// `.vtt` and `.srt`
    Vtt,
}

impl SubtitleFormat {
    /// Suffixes accepted by [`SubtitleFormat::from_path`], in preference order
    pub const EXTENSIONS: [&'static str; 4] = ["ass", "ssa", "vtt", "srt"];

    /// Pick the format for a path by its case-sensitive suffix
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ass") | Some("ssa") => Ok(SubtitleFormat::Ass),
            Some("vtt") | Some("srt") => Ok(SubtitleFormat::Vtt),
            _ => Err(SubtitleError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubtitleFormat::Ass => write!(f, "ASS/SSA"),
            SubtitleFormat::Vtt => write!(f, "WebVTT/SubRip"),
        }
    }
}

/// Parse a subtitle file into ordered dialogue records.
///
/// The format is chosen from the file suffix before the file is opened.
pub fn parse_subtitle_file<P: AsRef<Path>>(path: P, padding_ms: u64) -> Result<Vec<DialogueRecord>, SubtitleError> {
    let path = path.as_ref();
    let format = SubtitleFormat::from_path(path)?;

    let reader = BufReader::new(File::open(path)?);
    let records = match format {
        SubtitleFormat::Ass => ass::parse(reader, padding_ms)?,
        SubtitleFormat::Vtt => vtt::parse(reader, padding_ms)?,
    };

    debug!("Parsed {} dialogue records from {:?} ({})", records.len(), path, format);
    Ok(records)
}

// Strip a UTF-8 byte order mark from the first line of a file
pub(crate) fn strip_bom(line: &str) -> &str {
    line.strip_prefix('\u{feff}').unwrap_or(line)
}
