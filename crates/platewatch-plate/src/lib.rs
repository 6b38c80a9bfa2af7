//! Pure plate text normalization, validation and display formatting.
//!
//! Grounded on `original_source/backend/app/utils/plate_formatter.py`; the
//! two accepted shapes are "2 digits + 2-3 letters + 2-4 digits" and
//! "2 digits + 1 letter + 4-5 digits".

use once_cell::sync::Lazy;
use regex::Regex;

static STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Z0-9]").unwrap());
static LONG_FORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{2})([A-Z]{2,3})(\d{2,4})$").unwrap());
static SHORT_FORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{2})([A-Z])(\d{4,5})$").unwrap());

/// Uppercases and strips every character outside `[A-Z0-9]`.
pub fn normalize(plate_text: &str) -> String {
    STRIP.replace_all(&plate_text.to_uppercase(), "").into_owned()
}

/// `true` if the normalized text matches either accepted plate pattern.
pub fn validate(plate_text: &str) -> bool {
    if plate_text.is_empty() {
        return false;
    }
    let normalized = normalize(plate_text);
    LONG_FORM.is_match(&normalized) || SHORT_FORM.is_match(&normalized)
}

/// Normalizes, then returns the concatenation of the matched groups if the
/// text matches one of the two patterns, else the normalized text unchanged.
///
/// This is deliberately not just `normalize` — a match's groups are
/// re-concatenated in place, which is a no-op for well-formed input but is
/// the documented behavior for inputs containing trailing/leading noise the
/// patterns nonetheless capture entirely.
pub fn format(plate_text: &str) -> String {
    if plate_text.is_empty() {
        return String::new();
    }
    let normalized = normalize(plate_text);

    for re in [&*LONG_FORM, &*SHORT_FORM] {
        if let Some(caps) = re.captures(&normalized) {
            let mut out = String::with_capacity(normalized.len());
            for group in caps.iter().skip(1).flatten() {
                out.push_str(group.as_str());
            }
            return out;
        }
    }
    normalized
}

/// Display-only spaced rendering, e.g. `"34 ABC 123"`. Never stored or
/// compared against — only `format`'s output is canonical.
pub fn beautify(plate_text: &str) -> String {
    let formatted = format(plate_text);
    if formatted.len() >= 7 {
        let (head, rest) = formatted.split_at(2);
        let (mid, tail) = rest.split_at(rest.len() - 4);
        format!("{head} {mid} {tail}")
    } else {
        formatted
    }
}

/// `format` applied twice returns the same string as once.
pub fn is_idempotent(plate_text: &str) -> bool {
    let once = format(plate_text);
    format(&once) == once
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_lowercase_and_noise() {
        assert_eq!(normalize("34 abc-123"), "34ABC123");
    }

    #[test]
    fn validates_long_and_short_forms() {
        assert!(validate("34ABC123"));
        assert!(validate("34A12345"));
        assert!(!validate("ABC1234"));
        assert!(!validate(""));
    }

    #[test]
    fn format_is_noop_on_clean_plate() {
        assert_eq!(format("34ABC123"), "34ABC123");
    }

    #[test]
    fn format_falls_back_to_normalized_on_no_match() {
        assert_eq!(format("hello world"), "HELLOWORLD");
    }

    #[test]
    fn beautify_splits_long_plates_only() {
        assert_eq!(beautify("34abc123"), "34 ABC 123");
        assert_eq!(beautify("ab"), "AB");
    }

    #[test]
    fn format_is_idempotent_for_arbitrary_input() {
        for sample in ["34ABC123", "34a1234", "not a plate", ""] {
            assert!(is_idempotent(sample));
        }
    }
}
