/*!
 * Nearest-start matching between two subtitle tracks.
 *
 * Used to pair each cue of the primary track with the cue of a secondary
 * track (usually a translation) that starts closest to it.
 */

use super::{DialogueRecord, timecode};
use crate::errors::SubtitleError;

/// Find the record whose start is closest to `target`.
///
/// Only records starting strictly less than `max_diff_ms` away qualify. On
/// equal distances the earliest record in `records` wins.
pub fn find_closest<'a>(
    records: &'a [DialogueRecord],
    target: &str,
    max_diff_ms: u64,
) -> Result<Option<&'a DialogueRecord>, SubtitleError> {
    let target_ms = timecode::decode(target)?;
    Ok(find_closest_ms(records, target_ms, max_diff_ms))
}

/// Same as [`find_closest`] with the target already in milliseconds
pub fn find_closest_ms(records: &[DialogueRecord], target_ms: u64, max_diff_ms: u64) -> Option<&DialogueRecord> {
    let mut best_diff = max_diff_ms;
    let mut best = None;

    for record in records {
        let diff = record.start.as_millis().abs_diff(target_ms);
        if diff < best_diff {
            best_diff = diff;
            best = Some(record);
        }
    }

    best
}
