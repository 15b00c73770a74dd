/*!
 * Language utilities for ISO language code handling.
 *
 * Generation requests carry a free-form language tag (`ko`, `kor`, `Korean`,
 * `en`, ...). These helpers resolve such tags with isolang so the pipeline
 * can decide whether Korean particle rules apply.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// Resolve a language tag given as ISO 639-1, ISO 639-3 or an English name
pub fn resolve_language(tag: &str) -> Option<Language> {
    let trimmed = tag.trim();
    let lowered = trimmed.to_lowercase();

    // Region subtags (ko-KR, en_US) do not affect particle rules
    let primary = lowered
        .split(['-', '_'])
        .next()
        .unwrap_or_default();

    match primary.len() {
        2 => Language::from_639_1(primary),
        3 => Language::from_639_3(primary),
        _ => Language::from_name(trimmed),
    }
}

/// Normalize a language tag to ISO 639-1 (2-letter) format if possible,
/// falling back to ISO 639-3
pub fn normalize_language_tag(tag: &str) -> Result<String> {
    let lang = resolve_language(tag)
        .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", tag))?;

    Ok(lang
        .to_639_1()
        .map(|code| code.to_string())
        .unwrap_or_else(|| lang.to_639_3().to_string()))
}

/// Whether the tag names Korean
pub fn is_korean(tag: &str) -> bool {
    resolve_language(tag) == Some(Language::Kor)
}

/// Get the English language name from a tag
pub fn get_language_name(tag: &str) -> Result<String> {
    let lang = resolve_language(tag)
        .ok_or_else(|| anyhow!("Invalid language code: {}", tag))?;

    Ok(lang.to_name().to_string())
}
