/*!
 * Tests for pairing records between two tracks
 */

use subdeck::DialogueRecord;
use subdeck::subtitle_processor::{find_closest, find_closest_ms};

fn records() -> Vec<DialogueRecord> {
    vec![
        DialogueRecord::new(1_000, 1_000, "a"),
        DialogueRecord::new(5_000, 1_000, "b"),
        DialogueRecord::new(9_000, 1_000, "c"),
    ]
}

/// Test the closest record within the bound is returned
#[test]
fn test_findClosest_withTargetNearMiddle_shouldReturnMiddle() {
    let records = records();
    let found = find_closest(&records, "0:00:05.50", 1_000).unwrap().unwrap();
    assert_eq!(found.start.as_millis(), 5_000);
}

/// Test that nothing is returned when every record is too far
#[test]
fn test_findClosest_withFarTarget_shouldReturnNone() {
    let records = records();
    assert!(find_closest(&records, "0:00:20.00", 1_000).unwrap().is_none());
}

/// Test that an empty track never matches
#[test]
fn test_findClosest_withEmptyTrack_shouldReturnNone() {
    assert!(find_closest(&[], "0:00:01.00", 10_000).unwrap().is_none());
}

/// Test that the first of two equally close records wins
#[test]
fn test_findClosestMs_withTie_shouldReturnFirst() {
    let records = records();
    let found = find_closest_ms(&records, 7_000, 5_000).unwrap();
    assert_eq!(found.text, "b");
}

/// Test that targets before every record still match
#[test]
fn test_findClosestMs_withTargetBeforeAll_shouldUseAbsoluteDistance() {
    let records = records();
    let found = find_closest_ms(&records, 500, 1_000).unwrap();
    assert_eq!(found.text, "a");
}

/// Test that SRT-style targets are accepted
#[test]
fn test_findClosest_withSrtTarget_shouldDecode() {
    let records = records();
    let found = find_closest(&records, "00:00:08,900", 200).unwrap().unwrap();
    assert_eq!(found.text, "c");
}
