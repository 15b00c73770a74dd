/*!
 * Tests for ISO language code utilities
 */

use hansub::language_utils::{get_language_name, is_korean, normalize_language_tag};

/// Test Korean detection across tag styles
#[test]
fn test_isKorean_withTagVariants_shouldDetectKorean() {
    for tag in ["ko", "KO", "kor", "ko-KR", "ko_kr", "Korean", " ko "] {
        assert!(is_korean(tag), "{}", tag);
    }
    for tag in ["en", "ja", "zho", "", "klingon"] {
        assert!(!is_korean(tag), "{}", tag);
    }
}

/// Test normalization to 2-letter codes
#[test]
fn test_normalizeLanguageTag_withValidCodes_shouldReturnPart1() {
    assert_eq!(normalize_language_tag("kor").unwrap(), "ko");
    assert_eq!(normalize_language_tag("en-US").unwrap(), "en");
    assert!(normalize_language_tag("zz").is_err());
}

/// Test English names
#[test]
fn test_getLanguageName_withValidCodes_shouldReturnName() {
    assert_eq!(get_language_name("ko").unwrap(), "Korean");
    assert_eq!(get_language_name("eng").unwrap(), "English");
    assert!(get_language_name("").is_err());
}
