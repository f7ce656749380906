/*!
 * Tests for the ASS/SSA parser
 */

use std::io::Cursor;
use subdeck::errors::SubtitleError;
use subdeck::subtitle_processor::ass;
use crate::common;

fn parse_dialogue(lines: &[&str], padding_ms: u64) -> Result<Vec<subdeck::DialogueRecord>, SubtitleError> {
    ass::parse(Cursor::new(common::ass_document(lines)), padding_ms)
}

/// Test the canonical single-line example with padding
#[test]
fn test_parse_withPadding_shouldWidenInterval() {
    let records = parse_dialogue(&["Dialogue: 0,0:00:10.00,0:00:12.00,Default,,0,0,0,,Hi"], 300).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].start.to_string(), "0:00:09.70");
    assert_eq!(records[0].duration.to_string(), "0:00:02.60");
    assert_eq!(records[0].text, "Hi");
}

/// Test that padding never moves the start below zero
#[test]
fn test_parse_withPaddingLargerThanStart_shouldFloorAtZero() {
    let records = parse_dialogue(&["Dialogue: 0,0:00:00.10,0:00:01.00,Default,,0,0,0,,Early"], 300).unwrap();

    assert_eq!(records[0].start.to_string(), "0:00:00.00");
    assert_eq!(records[0].duration.to_string(), "0:00:01.30");
}

/// Test that the second cue with identical raw start text is dropped
#[test]
fn test_parse_withDuplicateStart_shouldKeepFirst() {
    let records = parse_dialogue(&[
        "Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,First",
        "Dialogue: 0,0:00:01.00,0:00:05.00,Default,,0,0,0,,Other",
    ], 0).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "First");
}

/// Test that dedup compares whole start strings, not their characters
#[test]
fn test_parse_withStartMadeOfSeenCharacters_shouldKeepBoth() {
    // Every character of the second start already appears in the first
    let records = parse_dialogue(&[
        "Dialogue: 0,0:00:01.10,0:00:02.00,Default,,0,0,0,,One",
        "Dialogue: 0,0:00:00.00,0:00:00.50,Default,,0,0,0,,Zero",
    ], 0).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text, "Zero");
}

/// Test that dedup uses the raw text, so equal times written differently both survive
#[test]
fn test_parse_withSameTimeDifferentText_shouldKeepBoth() {
    let records = parse_dialogue(&[
        "Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,A",
        "Dialogue: 0,0:00:01.0,0:00:02.00,Default,,0,0,0,,B",
    ], 0).unwrap();

    assert_eq!(records.len(), 2);
}

/// Test that empty-text cues are dropped and do not block a later cue
#[test]
fn test_parse_withEmptyText_shouldDropCue() {
    let records = parse_dialogue(&[
        "Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,   ",
        "Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,Kept",
    ], 0).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "Kept");
}

/// Test that commas in the text column are preserved
#[test]
fn test_parse_withCommasInText_shouldKeepWholeText() {
    let records = parse_dialogue(&["Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,One, two, three"], 0).unwrap();
    assert_eq!(records[0].text, "One, two, three");
}

/// Test that columns are located from the Format line, in any order
#[test]
fn test_parse_withReorderedFormat_shouldUseFieldMap() {
    let content = "[Events]\nFormat: End, Start, Text\nDialogue: 0:00:04.00,0:00:03.00,Hello, there\n";
    let records = ass::parse(Cursor::new(content), 0).unwrap();

    assert_eq!(records[0].start.to_string(), "0:00:03.00");
    assert_eq!(records[0].duration.to_string(), "0:00:01.00");
    assert_eq!(records[0].text, "Hello, there");
}

/// Test that the first Format line wins
#[test]
fn test_parse_withSecondFormatLine_shouldIgnoreIt() {
    let content = "[Events]\nFormat: Start, End, Text\nFormat: Layer, Start, End, Text\nDialogue: 0:00:01.00,0:00:02.00,Line\n";
    let records = ass::parse(Cursor::new(content), 0).unwrap();
    assert_eq!(records[0].text, "Line");
}

/// Test that a missing Format line is reported
#[test]
fn test_parse_withoutFormatLine_shouldFailWithMissingRequiredField() {
    let content = "[Events]\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,Hi\n";
    assert!(matches!(
        ass::parse(Cursor::new(content), 0),
        Err(SubtitleError::MissingRequiredField(_))
    ));
}

/// Test that an Events section without dialogue still needs its Format line
#[test]
fn test_parse_withoutEventsSection_shouldFailWithMissingRequiredField() {
    let content = "[Script Info]\nTitle: nothing\n";
    assert!(matches!(
        ass::parse(Cursor::new(content), 0),
        Err(SubtitleError::MissingRequiredField(_))
    ));
}

/// Test that a Format line without an End column is reported by name
#[test]
fn test_parse_withoutEndColumn_shouldNameMissingField() {
    let content = "[Events]\nFormat: Layer, Start, Style, Text\n";
    match ass::parse(Cursor::new(content), 0) {
        Err(SubtitleError::MissingRequiredField(field)) => assert_eq!(field, "end"),
        other => panic!("Expected MissingRequiredField, got {:?}", other),
    }
}

/// Test that a bad timecode aborts the whole parse
#[test]
fn test_parse_withMalformedTimecode_shouldFail() {
    let result = parse_dialogue(&["Dialogue: 0,1:2:3:4,0:00:02.00,Default,,0,0,0,,Bad"], 0);
    assert!(matches!(result, Err(SubtitleError::MalformedTimecode(_))));
}

/// Test that output is sorted chronologically
#[test]
fn test_parse_withUnorderedInput_shouldSortByStart() {
    let records = parse_dialogue(&[
        "Dialogue: 0,0:00:30.00,0:00:31.00,Default,,0,0,0,,C",
        "Dialogue: 0,0:00:10.00,0:00:11.00,Default,,0,0,0,,A",
        "Dialogue: 0,0:00:20.00,0:00:21.00,Default,,0,0,0,,B",
    ], 0).unwrap();

    let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, ["A", "B", "C"]);
}

/// Test that Comment lines are not treated as dialogue
#[test]
fn test_parse_withCommentLines_shouldIgnoreThem() {
    let records = parse_dialogue(&[
        "Comment: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,Note",
        "Dialogue: 0,0:00:03.00,0:00:04.00,Default,,0,0,0,,Said",
    ], 0).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "Said");
}

/// Test that a dialogue line with too few fields is skipped and parsing goes on
#[test]
fn test_parse_withShortDialogueLine_shouldSkipIt() {
    let records = parse_dialogue(&[
        "Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,Before",
        "Dialogue: 0,0:00:03.00",
        "Dialogue: 0,0:00:05.00,0:00:06.00,Default,,0,0,0,,After",
    ], 0).unwrap();

    let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, ["Before", "After"]);
}

/// Test that text comes from the declared Text column even when it is not last
#[test]
fn test_parse_withTextBeforeLastColumn_shouldReadTextColumn() {
    let content = "[Events]\nFormat: Start, End, Text, Effect\nDialogue: 0:00:01.00,0:00:02.00,Hello,fade\n";
    let records = ass::parse(Cursor::new(content), 0).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "Hello");
}
