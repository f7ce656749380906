/*!
 * Tests for the WebVTT/SubRip parser
 */

use std::io::Cursor;
use subdeck::errors::SubtitleError;
use subdeck::subtitle_processor::vtt;

/// Test the ruby-stripping example
#[test]
fn test_parse_withRtMarkup_shouldStripAnnotation() {
    let content = "00:00:01.000 --> 00:00:02.000\nHello<rt>ignored</rt> world\n";
    let records = vtt::parse(Cursor::new(content), 0).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "Hello world");
    assert_eq!(records[0].start.to_string(), "0:00:01.00");
    assert_eq!(records[0].duration.to_string(), "0:00:01.00");
}

/// Test a full WebVTT document with header, identifiers and settings
#[test]
fn test_parse_withWebVttDocument_shouldReadAllCues() {
    let content = "\u{feff}WEBVTT\n\nNOTE a comment\n\nintro\n00:01.000 --> 00:02.500 align:start\n<ruby>日本<rp>(</rp><rt>にほん</rt><rp>)</rp></ruby>語\n\n00:03.000 --> 00:04.000\nsecond\n";
    let records = vtt::parse(Cursor::new(content), 0).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text, "日本語");
    assert_eq!(records[0].duration.as_millis(), 1_500);
    assert_eq!(records[1].text, "second");
}

/// Test a SubRip document with comma milliseconds and padding
#[test]
fn test_parse_withSrtDocument_shouldApplyPadding() {
    let content = "1\n00:00:00,200 --> 00:00:01,000\nFirst\n\n2\n00:00:05,000 --> 00:00:06,000\nSecond\n";
    let records = vtt::parse(Cursor::new(content), 300).unwrap();

    assert_eq!(records[0].start.to_string(), "0:00:00.00");
    assert_eq!(records[0].duration.to_string(), "0:00:01.30");
    assert_eq!(records[1].start.to_string(), "0:00:04.70");
    assert_eq!(records[1].duration.to_string(), "0:00:01.60");
}

/// Test that a duplicate decoded start is dropped even if written differently
#[test]
fn test_parse_withDuplicateDecodedStart_shouldKeepFirst() {
    let content = "00:00:01.000 --> 00:00:02.000\nfirst\n\n00:00:01,000 --> 00:00:03,000\nsecond\n";
    let records = vtt::parse(Cursor::new(content), 0).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "first");
}

/// Test that cues emptied by markup removal are dropped without blocking their start
#[test]
fn test_parse_withOnlyAnnotation_shouldDropCue() {
    let content = "00:00:01.000 --> 00:00:02.000\n<rt>only</rt>\n\n00:00:01.000 --> 00:00:02.000\nreal\n";
    let records = vtt::parse(Cursor::new(content), 0).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "real");
}

/// Test that input order is kept (no sorting)
#[test]
fn test_parse_withUnorderedCues_shouldKeepInputOrder() {
    let content = "00:00:05.000 --> 00:00:06.000\nlater\n\n00:00:01.000 --> 00:00:02.000\nearlier\n";
    let records = vtt::parse(Cursor::new(content), 0).unwrap();

    assert_eq!(records[0].text, "later");
    assert_eq!(records[1].text, "earlier");
}

/// Test that the last cue is read without a trailing blank line
#[test]
fn test_parse_withoutTrailingNewline_shouldReadLastCue() {
    let content = "00:00:01.000 --> 00:00:02.000\nend";
    let records = vtt::parse(Cursor::new(content), 0).unwrap();
    assert_eq!(records[0].text, "end");
}

/// Test that Windows line endings are handled
#[test]
fn test_parse_withCrlf_shouldTrimCarriageReturns() {
    let content = "1\r\n00:00:01,000 --> 00:00:02,000\r\nline\r\n\r\n";
    let records = vtt::parse(Cursor::new(content), 0).unwrap();
    assert_eq!(records[0].text, "line");
}

/// Test that a malformed timing line aborts the parse
#[test]
fn test_parse_withMalformedTiming_shouldFail() {
    let content = "00:00:01.000 --> nonsense\ntext\n";
    assert!(matches!(
        vtt::parse(Cursor::new(content), 0),
        Err(SubtitleError::MalformedTimecode(_))
    ));
}

/// Test markup stripping on its own
#[test]
fn test_stripRubyMarkup_withNestedRuby_shouldKeepBaseText() {
    assert_eq!(vtt::strip_ruby_markup("<ruby>猫<rt>ねこ</rt></ruby>が<ruby/>好き"), "猫が好き");
}

/// Test that an oversized timing line is reported instead of wrapping around
#[test]
fn test_parse_withOverflowingTiming_shouldFail() {
    let content = "99999999999999:00:00.000 --> 99999999999999:00:01.000\ntext\n";
    assert!(matches!(
        vtt::parse(Cursor::new(content), 0),
        Err(SubtitleError::MalformedTimecode(_))
    ));
}
