//! Input normalization for quote form fields.
//!
//! Everything here is pure and allocation-light; validation rules that depend
//! on the normalized value live in `validation`.

use regex::Regex;
use std::sync::OnceLock;

/// Inclusive bounds on the number of digits in a stored phone number.
pub const PHONE_MIN_DIGITS: usize = 8;
pub const PHONE_MAX_DIGITS: usize = 15;

static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();
static BLANK_LINES_REGEX: OnceLock<Regex> = OnceLock::new();
static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Trim and collapse every whitespace run to a single space.
pub fn sanitize_text(value: &str) -> String {
    let regex = WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").unwrap());
    regex.replace_all(value.trim(), " ").into_owned()
}

/// Trim, normalize line endings to `\n` and allow at most one blank line in a row.
pub fn sanitize_multiline(value: &str) -> String {
    let regex = BLANK_LINES_REGEX.get_or_init(|| Regex::new(r"\n{3,}").unwrap());
    let unified = value.trim().replace("\r\n", "\n").replace('\r', "\n");
    regex.replace_all(&unified, "\n\n").into_owned()
}

/// Canonicalize a phone number to an optional `+` followed by digits only.
///
/// Returns `None` when the raw value does not look like a phone number or
/// when the digit count falls outside [`PHONE_MIN_DIGITS`, `PHONE_MAX_DIGITS`].
pub fn normalize_phone(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    // ASCII digits and ASCII whitespace only; `\d` and `\s` are Unicode-aware in `regex`
    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+?[0-9][0-9 \t\n\r\x0B\x0C-]{7,14}$").unwrap()
    });
    if !regex.is_match(value) {
        return None;
    }

    let has_plus_prefix = value.starts_with('+');
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();

    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len()) {
        return None;
    }

    Some(if has_plus_prefix {
        format!("+{}", digits)
    } else {
        digits
    })
}

/// Keep ASCII letters, digits, `-` and `_`, lowercased. Empty is allowed.
pub fn sanitize_source_page(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Length in Unicode code points.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==================== sanitize_text Tests ====================

    #[test]
    fn test_sanitize_text_collapses_whitespace() {
        assert_eq!(sanitize_text("  John \t  Smith\n "), "John Smith");
    }

    #[test]
    fn test_sanitize_text_unicode_whitespace() {
        // no-break space and ideographic space are whitespace too
        assert_eq!(sanitize_text("Al\u{00A0}\u{00A0}Malqa\u{3000}"), "Al Malqa");
    }

    #[test]
    fn test_sanitize_text_empty() {
        assert_eq!(sanitize_text("   "), "");
    }

    // ==================== sanitize_multiline Tests ====================

    #[test]
    fn test_sanitize_multiline_normalizes_line_endings() {
        assert_eq!(sanitize_multiline("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_sanitize_multiline_collapses_blank_lines() {
        assert_eq!(sanitize_multiline("first\n\n\n\n\nsecond"), "first\n\nsecond");
        assert_eq!(sanitize_multiline("first\r\n\r\n\r\nsecond"), "first\n\nsecond");
    }

    #[test]
    fn test_sanitize_multiline_keeps_single_blank_line() {
        assert_eq!(sanitize_multiline("first\n\nsecond"), "first\n\nsecond");
    }

    #[test]
    fn test_sanitize_multiline_keeps_inner_spaces() {
        assert_eq!(sanitize_multiline("  two  spaces  "), "two  spaces");
    }

    // ==================== normalize_phone Tests ====================

    #[test]
    fn test_normalize_phone_international() {
        assert_eq!(
            normalize_phone("+966 50 420 2782"),
            Some("+966504202782".to_string())
        );
    }

    #[test]
    fn test_normalize_phone_local_with_hyphens() {
        assert_eq!(normalize_phone("050-420-2782"), Some("0504202782".to_string()));
    }

    #[test]
    fn test_normalize_phone_too_short() {
        assert_eq!(normalize_phone("123"), None);
        assert_eq!(normalize_phone("1234567"), None);
    }

    #[test]
    fn test_normalize_phone_too_long() {
        assert_eq!(normalize_phone("12345678901234567"), None);
    }

    #[test]
    fn test_normalize_phone_boundaries() {
        assert_eq!(normalize_phone("12345678"), Some("12345678".to_string()));
        assert_eq!(
            normalize_phone("123456789012345"),
            Some("123456789012345".to_string())
        );
    }

    #[test]
    fn test_normalize_phone_separators_count_toward_pattern_length() {
        // 10 digits but 16 characters after the first digit
        assert_eq!(normalize_phone("1 2 3 4 5 6 7 8 9 0"), None);
    }

    #[test]
    fn test_normalize_phone_enough_chars_too_few_digits() {
        // passes the pattern, but only 7 digits survive stripping
        assert_eq!(normalize_phone("1-2-3-4-5-6-7"), None);
    }

    #[test]
    fn test_normalize_phone_rejects_letters_and_symbols() {
        assert_eq!(normalize_phone("+966 50 ABC 2782"), None);
        assert_eq!(normalize_phone("(050) 420 2782"), None);
        assert_eq!(normalize_phone("++966504202782"), None);
        assert_eq!(normalize_phone("-0504202782"), None);
    }

    #[test]
    fn test_normalize_phone_rejects_arabic_indic_digits() {
        assert_eq!(normalize_phone("٠٥٠٤٢٠٢٧٨٢"), None);
    }

    #[test]
    fn test_normalize_phone_empty() {
        assert_eq!(normalize_phone(""), None);
        assert_eq!(normalize_phone("   "), None);
    }

    #[test]
    fn test_normalize_phone_trims_first() {
        assert_eq!(normalize_phone("  0504202782  "), Some("0504202782".to_string()));
    }

    // ==================== sanitize_source_page Tests ====================

    #[test]
    fn test_sanitize_source_page() {
        assert_eq!(sanitize_source_page("Home-Page_01!"), "home-page_01");
        assert_eq!(sanitize_source_page("/services/ceiling?x=1"), "servicesceilingx1");
        assert_eq!(sanitize_source_page("الرئيسية"), "");
        assert_eq!(sanitize_source_page(""), "");
    }

    // ==================== char_len Tests ====================

    #[test]
    fn test_char_len_counts_code_points() {
        assert_eq!(char_len("جون"), 3);
        assert_eq!("جون".len(), 6);
    }

    // ==================== Properties ====================

    proptest! {
        #[test]
        fn prop_normalized_phone_is_plus_and_digits(raw in "\\+?[0-9][0-9 -]{7,14}") {
            if let Some(phone) = normalize_phone(&raw) {
                let digits = phone.strip_prefix('+').unwrap_or(&phone);
                prop_assert!(digits.chars().all(|c| c.is_ascii_digit()));
                prop_assert!((PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len()));
                prop_assert_eq!(phone.starts_with('+'), raw.starts_with('+'));
            }
        }

        #[test]
        fn prop_normalize_phone_is_idempotent(raw in "\\+?[0-9][0-9 -]{7,14}") {
            if let Some(phone) = normalize_phone(&raw) {
                prop_assert_eq!(normalize_phone(&phone), Some(phone.clone()));
            }
        }

        #[test]
        fn prop_multiline_never_has_three_newlines(raw in "[a-z\\r\\n ]{0,64}") {
            let cleaned = sanitize_multiline(&raw);
            prop_assert!(!cleaned.contains("\n\n\n"));
            prop_assert!(!cleaned.contains('\r'));
        }

        #[test]
        fn prop_sanitize_text_has_no_double_spaces(raw in "\\PC{0,64}") {
            let cleaned = sanitize_text(&raw);
            prop_assert!(!cleaned.contains("  "));
            prop_assert_eq!(cleaned.trim(), cleaned.as_str());
        }

        #[test]
        fn prop_source_page_charset(raw in "\\PC{0,64}") {
            let cleaned = sanitize_source_page(&raw);
            prop_assert!(cleaned
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'));
        }
    }
}
