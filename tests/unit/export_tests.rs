/*!
 * Tests for subtitle export and import
 */

use chrono::{TimeZone, Utc};

use hansub::errors::{EditError, ImportError};
use hansub::export::{parse_json, parse_srt, ExportFormat, Exporter};
use hansub::subtitle::{Animation, Position, SubtitleEntry, SubtitleStyle};

use crate::common;

/// Test that SRT export -> parse -> export is byte-identical
#[test]
fn test_srt_roundTrip_shouldBeIdentical() {
    let exporter = Exporter::default();
    let parsed = parse_srt(common::SAMPLE_SRT).unwrap();
    let exported = exporter.export(&parsed, ExportFormat::Srt).unwrap();

    assert_eq!(exported, common::SAMPLE_SRT);
    assert_eq!(parsed[1].text, "두 번째\n자막");
}

/// Test the exact VTT layout
#[test]
fn test_vtt_shouldUseHeaderAndPeriodTimestamps() {
    let entries = common::entries(&[("a", 61_001, 62_500, "안녕")]);
    let vtt = Exporter::default().export(&entries, ExportFormat::Vtt).unwrap();

    assert_eq!(vtt, "WEBVTT\n\n1\n00:01:01.001 --> 00:01:02.500\n안녕\n");
}

/// Test ASS output for styled and positioned entries
#[test]
fn test_ass_withStyles_shouldEmitOverrides() {
    let style = SubtitleStyle { animation: Animation::Fade, font_weight: 700, ..SubtitleStyle::default() };
    let entries = vec![
        SubtitleEntry::new("b", 3_600_000, 3_601_234, "둘째").with_position(Position::Center),
        SubtitleEntry::new("a", 0, 1500, "첫째\n줄").with_style(style),
    ];

    let ass = Exporter::default().export(&entries, ExportFormat::Ass).unwrap();
    let dialogue: Vec<&str> = ass.lines().filter(|l| l.starts_with("Dialogue:")).collect();

    assert_eq!(dialogue.len(), 2);
    assert_eq!(dialogue[0], "Dialogue: 0,0:00:00.00,0:00:01.50,Fade,,0,0,0,,{\\b1\\fad(300,300)}첫째\\N줄");
    assert_eq!(dialogue[1], "Dialogue: 0,1:00:00.00,1:00:01.23,Default,,0,0,0,,{\\an5}둘째");
}

/// Test the JSON document with a fixed generation time
#[test]
fn test_json_withFixedTimestamp_shouldBeDeterministic() {
    let generated = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    let entries = common::entries(&[("sub_1", 0, 2500, "하나"), ("sub_2", 2600, 75_250, "둘")]);
    let exporter = Exporter::new("my-tool");

    let first = exporter.export_at(&entries, ExportFormat::Json, generated).unwrap();
    let second = exporter.export_at(&entries, ExportFormat::Json, generated).unwrap();
    assert_eq!(first, second);

    let value: serde_json::Value = serde_json::from_str(&first).unwrap();
    assert_eq!(value["generator"], "my-tool");
    assert_eq!(value["generated"], "2025-01-02T03:04:05.000Z");
    assert_eq!(value["subtitles"][1]["endTime"], 75.25);
    assert_eq!(value["subtitles"][1]["endTimeFormatted"], "1:15.2");
    assert_eq!(value["subtitles"][0]["startTimeFormatted"], "0:00.0");

    let parsed = parse_json(&first).unwrap();
    assert_eq!(parsed, entries);
}

/// Test that unknown format names are rejected with the edit error kind
#[test]
fn test_exportNamed_withUnknownFormat_shouldFail() {
    let error = Exporter::default().export_named(&[], "sbv").unwrap_err();
    assert_eq!(
        error.downcast_ref::<EditError>(),
        Some(&EditError::UnsupportedExportFormat("sbv".to_string()))
    );
}

/// Test tolerant SRT parsing: CRLF, BOM, VTT separators and unordered blocks
#[test]
fn test_parseSrt_withMessyInput_shouldNormalize() {
    let content = "\u{feff}2\r\n00:00:05.000 --> 00:00:06.000\r\n둘\r\n\r\n1\r\n00:00:01,000 --> 00:00:02,000\r\n하나\r\n";
    let entries = parse_srt(content).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "sub_1");
    assert_eq!(entries[0].text, "하나");
    assert_eq!(entries[1].start_time_ms, 5000);
}

/// Test that a broken timing line is reported with its block number
#[test]
fn test_parseSrt_withBrokenTimestamp_shouldFail() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nok\n\n2\n00:00:xx,000 --> 00:00:03,000\nbad\n";
    match parse_srt(content) {
        Err(ImportError::InvalidTimestamp { block, .. }) => assert_eq!(block, 2),
        other => panic!("expected InvalidTimestamp, got {:?}", other),
    }
}

/// Test JSON import rejects entries that break the time invariant
#[test]
fn test_parseJson_withInvertedRange_shouldFail() {
    let json = r#"{"version":"1.0","generated":"x","generator":"y","subtitles":[{"id":"a","startTime":2.0,"endTime":1.0,"text":"t"}]}"#;
    assert!(matches!(
        parse_json(json),
        Err(ImportError::Invalid(EditError::InvalidTimeRange { start_ms: 2000, end_ms: 1000 }))
    ));
}
