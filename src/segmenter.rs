/*!
 * Text segmentation for subtitle display.
 *
 * Text is split into sentences, sentences are greedily wrapped into lines of
 * bounded width, and wrapped lines are grouped into subtitle-sized chunks.
 * Line breaks never separate a word from its attached particle.
 */

use std::collections::BTreeMap;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::particles::ParticleSelector;

// @const: Sentence-final punctuation followed by whitespace
static SENTENCE_END_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?。…]+\s+").unwrap()
});

static WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

/// Connective adverbs that make good break points (and / but / therefore / that is)
const CONNECTIVES: &[&str] = &[
    "그리고", "하지만", "그러나", "그래서", "따라서", "즉",
    "and", "but", "therefore", "so",
];

const COMMAS: &[char] = &[',', '，', '、'];

/// Kind of break candidate, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BreakKind {
    Comma,
    Connective,
    Whitespace,
}

/// A candidate line break, as a byte offset on a char boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaturalBreak {
    pub offset: usize,
    pub kind: BreakKind,
}

/// Splits text into display lines and subtitle chunks
pub struct TextSegmenter;

impl TextSegmenter {
    /// Split text into trimmed sentences at sentence-final punctuation followed by whitespace
    pub fn split_into_sentences(text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut last = 0;

        for found in SENTENCE_END_REGEX.find_iter(text) {
            let sentence = text[last..found.end()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            last = found.end();
        }

        let rest = text[last..].trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }

        sentences
    }

    /// Candidate break offsets, best first.
    ///
    /// Commas come first, then positions around connective adverbs, then plain
    /// whitespace; within a kind, earlier offsets come first. Offsets that fall
    /// strictly inside a word + particle span are never returned.
    pub fn find_natural_breaks(text: &str) -> Vec<NaturalBreak> {
        let mut candidates: BTreeMap<usize, BreakKind> = BTreeMap::new();
        let mut add = |offset: usize, kind: BreakKind| {
            if offset == 0 || offset >= text.len() {
                return;
            }
            candidates
                .entry(offset)
                .and_modify(|existing| *existing = (*existing).min(kind))
                .or_insert(kind);
        };

        for (index, c) in text.char_indices() {
            if COMMAS.contains(&c) {
                add(index + c.len_utf8(), BreakKind::Comma);
            }
        }

        for word in WORD_REGEX.find_iter(text) {
            add(word.start(), BreakKind::Whitespace);

            let core = word
                .as_str()
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if CONNECTIVES.contains(&core.as_str()) {
                add(word.start(), BreakKind::Connective);
                add(word.end(), BreakKind::Connective);
            }
        }

        let spans = ParticleSelector::particle_spans(text);
        let mut breaks: Vec<NaturalBreak> = candidates
            .into_iter()
            .filter(|(offset, _)| !spans.iter().any(|span| span.contains_strictly(*offset)))
            .map(|(offset, kind)| NaturalBreak { offset, kind })
            .collect();

        breaks.sort_by_key(|b| (b.kind, b.offset));
        breaks
    }

    /// Wrap text into at most `max_lines` lines of about `max_chars_per_line` characters.
    ///
    /// When wrapping yields more lines than allowed, contiguous runs are joined
    /// with a single space into exactly `max_lines` groups; the last group takes
    /// the remainder.
    pub fn split_into_lines(text: &str, max_chars_per_line: usize, max_lines: usize) -> Vec<String> {
        let max_chars = max_chars_per_line.max(1);
        let max_lines = max_lines.max(1);

        let lines: Vec<String> = Self::split_into_sentences(text)
            .iter()
            .flat_map(|sentence| Self::wrap_sentence(sentence, max_chars))
            .collect();

        if lines.len() > max_lines {
            debug!("Merging {} wrapped lines into {}", lines.len(), max_lines);
            return Self::merge_lines(&lines, max_lines);
        }
        lines
    }

    /// Split text into subtitle chunks of at most `max_lines` wrapped lines each.
    ///
    /// Chunks never span a sentence boundary; lines inside a chunk are joined with `\n`.
    pub fn split_into_chunks(text: &str, max_chars_per_line: usize, max_lines: usize) -> Vec<String> {
        let max_chars = max_chars_per_line.max(1);
        let max_lines = max_lines.max(1);

        Self::split_into_sentences(text)
            .iter()
            .flat_map(|sentence| {
                Self::wrap_sentence(sentence, max_chars)
                    .chunks(max_lines)
                    .map(|group| group.join("\n"))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn wrap_sentence(sentence: &str, max_chars: usize) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in sentence.split_whitespace() {
            let word_len = char_len(word);

            if word_len > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let mut pieces = Self::force_split(word, max_chars);
                // The last piece stays open so following words can join it
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
                continue;
            }

            if char_len(&current) + 1 + word_len <= max_chars {
                current.push(' ');
                current.push_str(word);
                continue;
            }

            let (head, tail) = Self::rebalance(&current, word_len, max_chars);
            lines.push(head);
            current = match tail {
                Some(tail) => format!("{} {}", tail, word),
                None => word.to_string(),
            };
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Move the break of an overflowing line back to a comma or connective in its second half
    fn rebalance(line: &str, next_word_len: usize, max_chars: usize) -> (String, Option<String>) {
        let half = char_len(line) / 2;

        let better = Self::find_natural_breaks(line)
            .into_iter()
            .filter(|b| b.kind != BreakKind::Whitespace)
            .find(|b| {
                let head = line[..b.offset].trim();
                let tail = line[b.offset..].trim();
                !head.is_empty()
                    && !tail.is_empty()
                    && char_len(head) >= half
                    && char_len(tail) + 1 + next_word_len <= max_chars
            });

        match better {
            Some(b) => (
                line[..b.offset].trim().to_string(),
                Some(line[b.offset..].trim().to_string()),
            ),
            None => (line.to_string(), None),
        }
    }

    fn force_split(word: &str, max_chars: usize) -> Vec<String> {
        let chars: Vec<char> = word.chars().collect();
        chars
            .chunks(max_chars)
            .map(|piece| piece.iter().collect())
            .collect()
    }

    fn merge_lines(lines: &[String], max_lines: usize) -> Vec<String> {
        let per_group = lines.len() / max_lines;
        (0..max_lines)
            .map(|group| {
                let start = group * per_group;
                let end = if group == max_lines - 1 { lines.len() } else { start + per_group };
                lines[start..end].join(" ")
            })
            .collect()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
