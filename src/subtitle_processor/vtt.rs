/*!
 * WebVTT and SubRip cue parser.
 *
 * Both formats share the `start --> end` timing line followed by text
 * lines up to a blank line, so one parser handles them. Cue numbers,
 * the `WEBVTT` header and `NOTE` blocks never follow a timing line and
 * are skipped.
 */

use std::collections::HashSet;
use std::io::BufRead;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{DialogueRecord, strip_bom, timecode};
use crate::errors::SubtitleError;

const TIMING_ARROW: &str = "-->";

static RUBY_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?ruby\s*/?>").unwrap()
});

static RP_SPAN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<rp>.*?</rp>").unwrap()
});

static RT_SPAN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<rt>.*?</rt>").unwrap()
});

/// Remove ruby annotation markup, keeping the base text.
///
/// `<ruby>` tags are dropped with their content kept; `<rp>` and `<rt>`
/// spans are dropped entirely.
pub fn strip_ruby_markup(text: &str) -> String {
    let text = RUBY_TAG_REGEX.replace_all(text, "");
    let text = RP_SPAN_REGEX.replace_all(&text, "");
    let text = RT_SPAN_REGEX.replace_all(&text, "");
    text.trim().to_string()
}

/// Split a timing line into its start and end timecode text.
///
/// WebVTT cue settings after the end time are ignored.
fn split_timing_line(line: &str) -> Option<(&str, &str)> {
    let (start, rest) = line.split_once(TIMING_ARROW)?;
    let end = rest.split_whitespace().next().unwrap_or("");
    Some((start.trim(), end))
}

// Cue under construction between a timing line and the next blank line
struct PendingCue {
    start_ms: u64,
    end_ms: u64,
    text: String,
}

/// Parse WebVTT or SubRip cues from a line reader.
///
/// Cues keep their input order. A cue whose decoded start was already seen,
/// or whose text is empty after markup removal, is dropped.
pub fn parse<R: BufRead>(reader: R, padding_ms: u64) -> Result<Vec<DialogueRecord>, SubtitleError> {
    let mut seen_starts: HashSet<u64> = HashSet::new();
    let mut records = Vec::new();
    let mut pending: Option<PendingCue> = None;

    let mut finish = |cue: PendingCue, records: &mut Vec<DialogueRecord>| {
        let text = strip_ruby_markup(cue.text.trim());
        if text.is_empty() || !seen_starts.insert(cue.start_ms) {
            return;
        }
        records.push(DialogueRecord::padded(cue.start_ms, cue.end_ms, padding_ms, text));
    };

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = if line_no == 0 { strip_bom(&line) } else { line.as_str() };

        if pending.is_some() {
            if line.trim().is_empty() {
                if let Some(cue) = pending.take() {
                    finish(cue, &mut records);
                }
            } else if let Some(cue) = pending.as_mut() {
                cue.text.push_str(line);
            }
            continue;
        }

        if line.contains(TIMING_ARROW) {
            let (start, end) = split_timing_line(line)
                .ok_or_else(|| SubtitleError::MalformedTimecode(line.to_string()))?;
            pending = Some(PendingCue {
                start_ms: timecode::decode(start)?,
                end_ms: timecode::decode(end)?,
                text: String::new(),
            });
        }
    }

    if let Some(cue) = pending.take() {
        finish(cue, &mut records);
    }

    debug!("VTT parser kept {} cues", records.len());
    Ok(records)
}
