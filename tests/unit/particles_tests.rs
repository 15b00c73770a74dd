/*!
 * Tests for Korean particle selection through the public API
 */

use hansub::particles::{ParticleCategory, ParticleSelector};

/// Test every variable category against a word with and without batchim
#[test]
fn test_selectParticle_withAllVariableCategories_shouldFollowBatchim() {
    let cases = [
        (ParticleCategory::Subject, "이", "가"),
        (ParticleCategory::Topic, "은", "는"),
        (ParticleCategory::Object, "을", "를"),
        (ParticleCategory::Direction, "으로", "로"),
        (ParticleCategory::Conjunctive, "과", "와"),
        (ParticleCategory::Source, "으로부터", "로부터"),
    ];

    for (category, with, without) in cases {
        assert_eq!(ParticleSelector::select_particle("사람", category), with, "{:?}", category);
        assert_eq!(ParticleSelector::select_particle("학교", category), without, "{:?}", category);
    }
}

/// Test the Sino-Korean digit reading table
#[test]
fn test_selectParticle_withTrailingDigit_shouldUseKoreanReading() {
    let with_batchim = ["0", "1", "3", "6", "7", "8", "10"];
    let without_batchim = ["2", "4", "5", "9", "버전 2"];

    for word in with_batchim {
        assert_eq!(ParticleSelector::select_particle(word, ParticleCategory::Subject), "이", "{}", word);
    }
    for word in without_batchim {
        assert_eq!(ParticleSelector::select_particle(word, ParticleCategory::Subject), "가", "{}", word);
    }
}

/// Test that unknown input degrades to the batchim-absent form
#[test]
fn test_selectParticle_withNonHangulInput_shouldDefaultToWithoutBatchim() {
    for word in ["", "Rust", "API", "?!", "   "] {
        assert_eq!(ParticleSelector::select_particle(word, ParticleCategory::Topic), "는");
    }
}

/// Test normalization of a full sentence with several wrong particles
#[test]
fn test_processText_withMixedErrors_shouldCorrectOnlyParticles() {
    let input = "사람가 학교을 떠나고 선생님는 학교으로부터 돌아왔다";
    let expected = "사람이 학교를 떠나고 선생님은 학교로부터 돌아왔다";
    assert_eq!(ParticleSelector::process_text(input), expected);
}

/// Test that punctuation around a token does not hide its particle
#[test]
fn test_processText_withSurroundingPunctuation_shouldStillCorrect() {
    assert_eq!(ParticleSelector::process_text("\"코드이\", 그리고"), "\"코드가\", 그리고");
}

/// Test that spans report byte offsets that slice the input
#[test]
fn test_particleSpans_shouldReturnSliceableOffsets() {
    let text = "자막은 화면에 나온다";
    let spans = ParticleSelector::particle_spans(text);

    assert_eq!(spans.len(), 1);
    assert_eq!(&text[spans[0].start..spans[0].particle_start], "자막");
    assert_eq!(&text[spans[0].particle_start..spans[0].end], "은");
    assert_eq!(spans[0].category, ParticleCategory::Topic);
}
