//! Lexical language detection for Turkish and English input.

use erenai_types::Locale;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Letters that only occur in Turkish among the supported locales.
const TURKISH_CHARS: &str = "çğıöşüÇĞİÖŞÜ";

/// English stop words that mark text as English.
static ENGLISH_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "is", "in", "to", "a", "what", "how", "why", "when", "where", "who",
    ]
    .into_iter()
    .collect()
});

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+\b").expect("Invalid word regex"));

/// Deterministic, I/O-free locale classifier.
#[derive(Debug, Clone, Copy)]
pub struct LanguageDetector {
    default: Locale,
}

impl LanguageDetector {
    /// Create a detector falling back to `default` when no signal is found.
    pub fn new(default: Locale) -> Self {
        Self { default }
    }

    /// Classify `text`.
    ///
    /// A Turkish-specific letter always wins; otherwise any English stop
    /// word selects English; otherwise the configured default applies.
    pub fn detect(&self, text: &str) -> Locale {
        if text.chars().any(|c| TURKISH_CHARS.contains(c)) {
            return Locale::Tr;
        }

        let lowered = text.to_lowercase();
        if WORD_RE
            .find_iter(&lowered)
            .any(|word| ENGLISH_WORDS.contains(word.as_str()))
        {
            return Locale::En;
        }

        self.default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_turkish_letters() {
        let detector = LanguageDetector::new(Locale::En);
        assert_eq!(detector.detect("disk kullanımı nedir"), Locale::Tr);
        assert_eq!(detector.detect("ŞİMDİ"), Locale::Tr);
    }

    #[test]
    fn test_english_stop_words() {
        let detector = LanguageDetector::new(Locale::Tr);
        assert_eq!(detector.detect("How do I list ports"), Locale::En);
        assert_eq!(detector.detect("WHAT?"), Locale::En);
    }

    #[test]
    fn test_turkish_letter_beats_english_words() {
        let detector = LanguageDetector::new(Locale::En);
        assert_eq!(detector.detect("what does çalıştır mean"), Locale::Tr);
    }

    #[test]
    fn test_default_fallback() {
        assert_eq!(LanguageDetector::new(Locale::Tr).detect(""), Locale::Tr);
        assert_eq!(LanguageDetector::new(Locale::En).detect("docker ps"), Locale::En);
        assert_eq!(LanguageDetector::new(Locale::Tr).detect("docker ps"), Locale::Tr);
    }

    #[test]
    fn test_stop_word_must_be_whole_word() {
        // "whatever" and "isolate" contain stop words only as substrings
        let detector = LanguageDetector::new(Locale::Tr);
        assert_eq!(detector.detect("whatever isolate"), Locale::Tr);
    }

    proptest! {
        #[test]
        fn detection_is_deterministic(text in ".*") {
            let detector = LanguageDetector::new(Locale::En);
            prop_assert_eq!(detector.detect(&text), detector.detect(&text));
        }

        #[test]
        fn turkish_letter_always_wins(prefix in "[a-z ]{0,20}", suffix in "[a-z ]{0,20}") {
            let detector = LanguageDetector::new(Locale::En);
            let text = format!("{prefix} the ğ {suffix}");
            prop_assert_eq!(detector.detect(&text), Locale::Tr);
        }
    }
}
