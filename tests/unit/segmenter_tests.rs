/*!
 * Tests for sentence, line and chunk segmentation
 */

use hansub::particles::ParticleSelector;
use hansub::segmenter::{BreakKind, TextSegmenter};

/// Test that no produced line exceeds the width unless a single word is forced
#[test]
fn test_splitIntoLines_withLongParagraph_shouldRespectWidth() {
    let text = "오늘은 새로운 기능을 소개합니다. 이 기능은 자막을 자동으로 만들어 줍니다";
    let lines = TextSegmenter::split_into_lines(text, 12, 10);

    assert!(lines.len() > 2);
    for line in &lines {
        assert!(line.chars().count() <= 12, "line too long: {}", line);
    }
    assert_eq!(lines.join(" "), text);
}

/// Test that line merging keeps every word in order
#[test]
fn test_splitIntoLines_withMaxLines_shouldKeepAllWords() {
    let text = "one two three four five six seven";
    let lines = TextSegmenter::split_into_lines(text, 5, 3);

    assert_eq!(lines.len(), 3);
    assert_eq!(lines.join(" "), text);
}

/// Test that a line boundary never separates a word from its particle
#[test]
fn test_splitIntoLines_shouldKeepParticleWithWord() {
    let text = "개발자가 새로운 자막을 빠르게 확인합니다";
    // Narrower widths would force-split the longest word
    for width in 5..20 {
        for line in TextSegmenter::split_into_lines(text, width, 20) {
            assert!(!line.starts_with('가') && !line.starts_with('을'), "width {}: {}", width, line);
        }
    }
}

/// Test the break priority and particle exclusion together
#[test]
fn test_findNaturalBreaks_withConnectiveAndComma_shouldRankThem() {
    let text = "자막이 길어지면, 하지만 화면을 가리면 안 됩니다";
    let breaks = TextSegmenter::find_natural_breaks(text);
    let spans = ParticleSelector::particle_spans(text);

    assert_eq!(breaks[0].kind, BreakKind::Comma);
    assert_eq!(&text[..breaks[0].offset], "자막이 길어지면,");
    assert!(breaks.iter().any(|b| b.kind == BreakKind::Connective));
    for b in &breaks {
        assert!(spans.iter().all(|span| !span.contains_strictly(b.offset)));
    }
}

/// Test empty and whitespace-only input
#[test]
fn test_splitIntoChunks_withBlankText_shouldReturnNothing() {
    assert!(TextSegmenter::split_into_chunks("", 18, 2).is_empty());
    assert!(TextSegmenter::split_into_chunks("   \n ", 18, 2).is_empty());
    assert!(TextSegmenter::split_into_sentences("").is_empty());
}

/// Test that chunks hold at most max_lines lines
#[test]
fn test_splitIntoChunks_shouldLimitLinesPerChunk() {
    let text = "하나 둘 셋 넷 다섯 여섯 일곱 여덟 아홉 열";
    let chunks = TextSegmenter::split_into_chunks(text, 5, 2);

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.lines().count() <= 2);
    }
    assert_eq!(chunks.join("\n").replace('\n', " "), text);
}
