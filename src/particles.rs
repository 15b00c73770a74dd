/*!
 * Korean particle (josa) selection.
 *
 * Whether a particle takes its "with batchim" or "without batchim" form
 * depends only on the final syllable of the word it attaches to. This module
 * decides that from the Unicode Hangul syllable layout, picks the right
 * allomorph per category, and normalizes particles already present in text.
 *
 * Normalization is driven by an explicit tokenizer: every whitespace-delimited
 * token is matched against a fixed particle table, longest particle first, so
 * overlapping categories (로 / 으로 / 으로부터) never compete.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// First precomposed Hangul syllable (가)
const HANGUL_BASE: u32 = 0xAC00;

/// Last precomposed Hangul syllable (힣)
const HANGUL_LAST: u32 = 0xD7A3;

/// Number of trailing-consonant slots per syllable (including "none")
const JONGSEONG_COUNT: u32 = 28;

/// Stems shorter than this are never treated as noun + particle
const MIN_STEM_CHARS: usize = 2;

/// Batchim presence when a digit is read aloud in Sino-Korean
/// (영, 일, 이, 삼, 사, 오, 육, 칠, 팔, 구)
const DIGIT_BATCHIM: [bool; 10] = [true, true, false, true, false, false, true, true, true, false];

/// Word endings whose last syllable looks like a particle but belongs to the
/// noun. Matched as suffixes so compounds (특수효과, 소아과) are covered too.
const PARTICLE_SHAPED_NOUN_ENDINGS: &[&str] = &[
    // ~과: effects, results, medical departments, school subjects
    "효과", "결과", "성과", "사과", "초과", "부과", "교과", "내과", "외과", "치과",
    "안과", "피부과", "소아과", "이비인후과",
    // ~가: "-ist" and place nouns
    "평가", "국가", "전문가", "작곡가", "소설가", "예술가", "음악가", "건축가", "사업가",
    "연출가", "탐험가", "혁명가", "운동가", "활동가", "연설가", "발명가", "바닷가",
    // ~이: loanwords and derived nouns
    "와이", "바이", "타이", "파이", "카이", "레이", "구이", "헛되이", "자유로이", "새로이",
    // ~로: road names
    "산책로", "교차로", "진입로", "등산로",
];

/// Final syllables that mark a verb or adjective form, not a noun
const VERBAL_FINAL_SYLLABLES: &[char] = &[
    '있', '없', '었', '았', '겠', '였', '했', '됐', '않', '는', '던',
];

/// Consonant-final action verb stems; `<stem>는` is the present adnominal
/// form of the verb (주고받는, 잡는), never a noun with a misspelled topic particle
const ACTION_VERB_STEMS: &[char] = &[
    '받', '잡', '막', '먹', '읽', '찾', '웃', '닫', '믿', '듣', '걷', '입', '씻', '넣',
    '놓', '낳', '얻', '잃', '끊', '붙', '뽑', '깎', '섞', '묶', '갖', '짓', '찍', '쫓',
    '돕', '줍', '굽', '눕', '씹', '앉', '닦', '볶', '꺾', '덮', '쌓', '벗',
];

static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

/// Grammatical role of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleCategory {
    /// 이 / 가
    Subject,
    /// 은 / 는
    Topic,
    /// 을 / 를
    Object,
    /// 으로 / 로
    Direction,
    /// 과 / 와 ("and")
    Conjunctive,
    /// 으로부터 / 로부터 ("from")
    Source,
    /// 의
    Possessive,
    /// 도 ("also")
    Additive,
    /// 만 ("only")
    Exclusive,
}

impl ParticleCategory {
    pub const ALL: [ParticleCategory; 9] = [
        Self::Subject,
        Self::Topic,
        Self::Object,
        Self::Direction,
        Self::Conjunctive,
        Self::Source,
        Self::Possessive,
        Self::Additive,
        Self::Exclusive,
    ];

    /// Returns `(with_batchim, without_batchim)`; invariant categories return the same form twice
    pub fn variants(self) -> (&'static str, &'static str) {
        match self {
            Self::Subject => ("이", "가"),
            Self::Topic => ("은", "는"),
            Self::Object => ("을", "를"),
            Self::Direction => ("으로", "로"),
            Self::Conjunctive => ("과", "와"),
            Self::Source => ("으로부터", "로부터"),
            Self::Possessive => ("의", "의"),
            Self::Additive => ("도", "도"),
            Self::Exclusive => ("만", "만"),
        }
    }

    /// Whether the particle form ignores batchim
    pub fn is_invariant(self) -> bool {
        matches!(self, Self::Possessive | Self::Additive | Self::Exclusive)
    }
}

/// Table used by the tokenizer, longest particle first
static PARTICLE_TABLE: Lazy<Vec<(&'static str, ParticleCategory)>> = Lazy::new(|| {
    let mut table: Vec<(&'static str, ParticleCategory)> = ParticleCategory::ALL
        .iter()
        .filter(|category| !category.is_invariant())
        .flat_map(|&category| {
            let (with, without) = category.variants();
            [(with, category), (without, category)]
        })
        .collect();
    table.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
    table
});

/// A `(stem, particle)` span found in text, as byte offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticleSpan {
    /// Start of the stem
    pub start: usize,
    /// Start of the particle (end of the stem)
    pub particle_start: usize,
    /// End of the particle
    pub end: usize,
    pub category: ParticleCategory,
}

impl ParticleSpan {
    /// Whether a byte offset falls strictly inside this span
    pub fn contains_strictly(&self, offset: usize) -> bool {
        offset > self.start && offset < self.end
    }
}

/// Stateless particle rule engine
pub struct ParticleSelector;

impl ParticleSelector {
    /// Whether the word's final character carries a trailing consonant.
    ///
    /// Hangul syllables are decoded arithmetically, digits use their Korean
    /// reading, and anything else (Latin, punctuation, empty input) counts as
    /// batchim-absent.
    pub fn has_final_consonant(word: &str) -> bool {
        let Some(last) = word.trim_end().chars().last() else {
            return false;
        };

        let code = last as u32;
        if (HANGUL_BASE..=HANGUL_LAST).contains(&code) {
            return (code - HANGUL_BASE) % JONGSEONG_COUNT != 0;
        }

        match last.to_digit(10) {
            Some(digit) if last.is_ascii_digit() => DIGIT_BATCHIM[digit as usize],
            _ => false,
        }
    }

    /// Pick the particle form for `word` in the given category
    pub fn select_particle(word: &str, category: ParticleCategory) -> &'static str {
        let (with, without) = category.variants();
        if category.is_invariant() {
            return with;
        }
        if Self::has_final_consonant(word) { with } else { without }
    }

    /// Append the correct particle form to `word`
    pub fn attach(word: &str, category: ParticleCategory) -> String {
        format!("{}{}", word, Self::select_particle(word, category))
    }

    /// Find every noun + particle span in `text`.
    ///
    /// A token qualifies when, after stripping surrounding punctuation, it ends
    /// in a variable particle and the remaining stem is an alphanumeric word of
    /// at least two characters. Tokens ending in a particle-shaped noun
    /// (특수효과, 비평가, 하와이) and verb forms (재미있는, 주고받는) are skipped.
    pub fn particle_spans(text: &str) -> Vec<ParticleSpan> {
        let mut spans = Vec::new();

        for token in TOKEN_REGEX.find_iter(text) {
            let raw = token.as_str();
            let core = raw.trim_start_matches(|c: char| !c.is_alphanumeric());
            let core_start = token.start() + (raw.len() - core.len());
            let core = core.trim_end_matches(|c: char| !c.is_alphanumeric());

            if core.is_empty() || PARTICLE_SHAPED_NOUN_ENDINGS.iter().any(|ending| core.ends_with(ending)) {
                continue;
            }

            let Some((particle, category)) = PARTICLE_TABLE
                .iter()
                .find(|(particle, _)| core.ends_with(particle))
            else {
                continue;
            };

            let stem = &core[..core.len() - particle.len()];
            if Self::is_nominal_stem(stem) && !Self::is_adnominal_verb(stem, particle) {
                spans.push(ParticleSpan {
                    start: core_start,
                    particle_start: core_start + stem.len(),
                    end: core_start + core.len(),
                    category: *category,
                });
            }
        }

        spans
    }

    /// Rewrite every attached particle to the form its stem requires.
    ///
    /// Idempotent: running it on its own output changes nothing. Particles are
    /// only corrected, never added.
    pub fn process_text(text: &str) -> String {
        let spans = Self::particle_spans(text);
        if spans.is_empty() {
            return text.to_string();
        }

        let mut result = String::with_capacity(text.len() + spans.len() * 3);
        let mut cursor = 0;
        for span in &spans {
            let stem = &text[span.start..span.particle_start];
            result.push_str(&text[cursor..span.particle_start]);
            result.push_str(Self::select_particle(stem, span.category));
            cursor = span.end;
        }
        result.push_str(&text[cursor..]);
        result
    }

    fn is_nominal_stem(stem: &str) -> bool {
        if stem.chars().count() < MIN_STEM_CHARS || !stem.chars().all(char::is_alphanumeric) {
            return false;
        }
        !stem
            .chars()
            .last()
            .is_some_and(|last| VERBAL_FINAL_SYLLABLES.contains(&last))
    }

    fn is_adnominal_verb(stem: &str, particle: &str) -> bool {
        particle == "는" && stem.chars().last().is_some_and(|last| ACTION_VERB_STEMS.contains(&last))
    }
}
