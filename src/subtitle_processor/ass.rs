/*!
 * Advanced SubStation Alpha (ASS/SSA) dialogue parser.
 *
 * Columns are located through the file's own `Format:` line in the
 * `[Events]` section, so files with reordered or extra columns parse
 * the same way.
 */

use std::collections::{HashMap, HashSet};
use std::io::BufRead;

use log::{debug, warn};

use super::{DialogueRecord, strip_bom, timecode};
use crate::errors::SubtitleError;

const EVENTS_HEADER: &str = "[Events]";
const FORMAT_PREFIX: &str = "Format:";
const DIALOGUE_PREFIX: &str = "Dialogue:";

/// Column positions declared by a `Format:` line
#[derive(Debug, Clone)]
pub struct FieldMap {
    fields: HashMap<String, usize>,
    count: usize,
    start: usize,
    end: usize,
    text: usize,
}

impl FieldMap {
    /// Build the map from the text after `Format:`.
    ///
    /// Field names are trimmed and lowercased. Fails if `start`, `end`
    /// or `text` is not declared.
    pub fn from_format_line(spec: &str) -> Result<Self, SubtitleError> {
        let mut fields = HashMap::new();
        let mut count = 0;
        for (index, name) in spec.split(',').enumerate() {
            fields.entry(name.trim().to_lowercase()).or_insert(index);
            count = index + 1;
        }

        let lookup = |name: &str| {
            fields
                .get(name)
                .copied()
                .ok_or_else(|| SubtitleError::MissingRequiredField(name.to_string()))
        };
        let start = lookup("start")?;
        let end = lookup("end")?;
        let text = lookup("text")?;

        Ok(FieldMap { fields, count, start, end, text })
    }

    /// Number of declared columns
    pub fn field_count(&self) -> usize {
        self.count
    }

    /// Position of a column by its lowercased name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.get(name).copied()
    }

    // Split a dialogue body into at most `field_count` pieces so that
    // commas inside the last column stay in its text.
    fn extract<'a>(&self, body: &'a str) -> Option<(&'a str, &'a str, &'a str)> {
        let pieces: Vec<&str> = body.splitn(self.field_count(), ',').collect();
        let start = pieces.get(self.start)?;
        let end = pieces.get(self.end)?;
        let text = pieces.get(self.text)?;
        Some((start.trim(), end.trim(), text.trim()))
    }
}

/// Parse ASS/SSA dialogue from a line reader.
///
/// Cues sharing the same raw start text keep only the first occurrence, and
/// cues with empty text are dropped. The result is ordered by start time.
pub fn parse<R: BufRead>(reader: R, padding_ms: u64) -> Result<Vec<DialogueRecord>, SubtitleError> {
    let mut in_events = false;
    let mut field_map: Option<FieldMap> = None;
    let mut seen_starts: HashSet<String> = HashSet::new();
    let mut records = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = if line_no == 0 { strip_bom(&line) } else { line.as_str() };
        let trimmed = line.trim();

        if !in_events {
            in_events = trimmed == EVENTS_HEADER;
            continue;
        }

        if field_map.is_none() {
            if let Some(spec) = trimmed.strip_prefix(FORMAT_PREFIX) {
                field_map = Some(FieldMap::from_format_line(spec)?);
                continue;
            }
        }

        let Some(body) = trimmed.strip_prefix(DIALOGUE_PREFIX) else {
            continue;
        };
        let fields = field_map
            .as_ref()
            .ok_or_else(|| SubtitleError::MissingRequiredField("format".to_string()))?;

        let Some((start, end, text)) = fields.extract(body) else {
            warn!("Skipping dialogue line {} with too few fields", line_no + 1);
            continue;
        };

        if text.is_empty() || seen_starts.contains(start) {
            continue;
        }
        seen_starts.insert(start.to_string());

        let start_ms = timecode::decode(start)?;
        let end_ms = timecode::decode(end)?;
        records.push(DialogueRecord::padded(start_ms, end_ms, padding_ms, text));
    }

    if field_map.is_none() {
        return Err(SubtitleError::MissingRequiredField("format".to_string()));
    }

    records.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| a.duration.cmp(&b.duration))
            .then_with(|| a.text.cmp(&b.text))
    });

    debug!("ASS parser kept {} of {} distinct start times", records.len(), seen_starts.len());
    Ok(records)
}
