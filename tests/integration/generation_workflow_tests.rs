/*!
 * Integration tests for the generate -> edit -> export workflow
 */

use anyhow::Result;

use hansub::export::{parse_json, parse_srt, ExportFormat};
use hansub::{Config, GenerationRequest, SubtitleEditor, SubtitleGenerator};

use crate::common;

fn request_json() -> &'static str {
    r#"{
        "sections": [
            {"text": "오늘은 자막 엔진를 소개합니다. 이 엔진가 문장을 나누고 시간을 계산합니다.", "durationSeconds": 8},
            {"text": "마지막으로, 결과를 여러 형식으로 내보냅니다.", "durationSeconds": 4.5}
        ],
        "language": "ko",
        "maxCharsPerLine": 12,
        "maxLines": 2
    }"#
}

/// Test the whole pipeline from a JSON request to SRT
#[test]
fn test_generationWorkflow_withKoreanRequest_shouldProduceValidTimeline() -> Result<()> {
    common::init_test_logger();
    let config = Config::default();
    let request: GenerationRequest = serde_json::from_str(request_json())?;

    let entries = SubtitleGenerator::new(&config).generate(&request);
    assert!(entries.len() >= 3);
    assert_eq!(entries[0].id, "sub_1");
    assert_eq!(entries.last().map(|e| e.end_time_ms), Some(12_500));
    common::assert_no_overlaps(&entries);

    // Particles were normalized on the way in
    let all_text: String = entries.iter().map(|e| e.text.as_str()).collect::<Vec<_>>().join(" ");
    assert!(all_text.contains("엔진을"));
    assert!(all_text.contains("엔진이"));

    // Section two starts exactly where section one's duration ends
    let second_section_start = entries
        .iter()
        .find(|e| e.text.starts_with("마지막으로,"))
        .map(|e| e.start_time_ms);
    assert_eq!(second_section_start, Some(8000));

    for entry in &entries {
        assert!(entry.text.lines().count() <= 2);
        assert!(entry.text.lines().all(|line| line.chars().count() <= 12), "{}", entry);
    }

    let mut editor = SubtitleEditor::new(&config);
    editor.load(entries)?;
    assert!(editor.validate().iter().all(|w| !w.contains("overlaps")));

    let srt = editor.export(ExportFormat::Srt)?;
    let reparsed = parse_srt(&srt)?;
    assert_eq!(reparsed.len(), editor.entries().len());
    assert_eq!(editor.export(ExportFormat::Srt)?, srt);
    Ok(())
}

/// Test that generated output survives a trip through the JSON format
#[test]
fn test_generationWorkflow_withJsonExport_shouldReimport() -> Result<()> {
    let config = Config::default();
    let request: GenerationRequest = serde_json::from_str(request_json())?;
    let entries = SubtitleGenerator::new(&config).generate(&request);

    let mut editor = SubtitleEditor::new(&config);
    editor.load(entries)?;
    let json = editor.export(ExportFormat::Json)?;

    let reimported = parse_json(&json)?;
    assert_eq!(reimported, editor.entries());
    Ok(())
}

/// Test files written by one step can be read by the next
#[test]
fn test_generationWorkflow_withFiles_shouldConvertBetweenFormats() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let srt_path = common::create_test_file(temp_dir.path(), "input.srt", common::SAMPLE_SRT)?;

    let content = std::fs::read_to_string(&srt_path)?;
    let mut editor = SubtitleEditor::new(&Config::default());
    editor.load(parse_srt(&content)?)?;

    let vtt = editor.export(ExportFormat::Vtt)?;
    let vtt_path = common::create_test_file(temp_dir.path(), "output.vtt", &vtt)?;
    let written = std::fs::read_to_string(vtt_path)?;

    assert!(written.starts_with("WEBVTT\n\n1\n00:00:01.000 --> 00:00:04.500\n"));
    assert!(written.contains("두 번째\n자막"));
    Ok(())
}
