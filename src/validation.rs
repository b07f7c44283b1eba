//! Input checks that gate an extraction request.
//!
//! The Polish check is a fixed heuristic: the text passes when it contains a
//! Polish diacritic, or when enough of its tokens are common Polish words.
//! All thresholds live in [`ValidationPolicy`]; [`validate`] and
//! [`word_count`] use the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const MIN_WORDS: usize = 1;
pub const MAX_WORDS: usize = 100;
pub const MIN_COMMON_WORD_RATIO: f64 = 0.2;
pub const POLISH_DIACRITICS: &str = "ąćęłńóśźżĄĆĘŁŃÓŚŹŻ";

/// Closed list of frequent Polish words used by the word-ratio branch.
pub const COMMON_POLISH_WORDS: &[&str] = &[
    "jest", "nie", "że", "się", "na", "w", "z", "do", "od", "po", "przez", "dla", "ale", "lub",
    "i", "oraz", "także", "również", "bardzo", "może", "można", "trzeba", "powinien", "powinna",
    "powinno", "mogę", "możesz", "człowiek", "dom", "praca", "czas", "dzień", "rok", "miesiąc",
    "tydzień", "godzina", "minuta", "sekunda", "dzisiaj", "wczoraj", "jutro", "teraz", "tutaj",
    "tam", "gdzie", "kiedy", "jak", "dlaczego", "co", "kto", "który",
];

const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("Text cannot be empty")]
    Empty,

    #[error("Text must contain at least {min} word(s)")]
    TooFewWords { min: usize },

    #[error("Text must not exceed {max} words")]
    TooManyWords { max: usize },

    #[error("Text must be in Polish")]
    NotPolish,
}

/// Outcome of [`validate`]. Errors keep the order the checks ran in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationIssue] {
        &self.errors
    }

    /// Human-readable messages in check order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WordCount {
    pub current: usize,
    pub max: usize,
    pub is_valid: bool,
}

/// Tunable thresholds for the validator.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    pub min_words: usize,
    pub max_words: usize,
    pub diacritics: &'static str,
    pub common_words: &'static [&'static str],
    pub min_common_word_ratio: f64,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_words: MIN_WORDS,
            max_words: MAX_WORDS,
            diacritics: POLISH_DIACRITICS,
            common_words: COMMON_POLISH_WORDS,
            min_common_word_ratio: MIN_COMMON_WORD_RATIO,
        }
    }
}

impl ValidationPolicy {
    pub fn validate(&self, text: &str) -> ValidationResult {
        let mut errors = Vec::new();

        if text.trim().is_empty() {
            errors.push(ValidationIssue::Empty);
            return ValidationResult { errors };
        }

        let count = words(text).count();
        if count < self.min_words {
            errors.push(ValidationIssue::TooFewWords {
                min: self.min_words,
            });
        }
        if count > self.max_words {
            errors.push(ValidationIssue::TooManyWords {
                max: self.max_words,
            });
        }

        if !self.looks_polish(text) {
            errors.push(ValidationIssue::NotPolish);
        }

        ValidationResult { errors }
    }

    pub fn word_count(&self, text: &str) -> WordCount {
        let current = words(text).count();
        WordCount {
            current,
            max: self.max_words,
            is_valid: current >= self.min_words && current <= self.max_words,
        }
    }

    pub fn looks_polish(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        if text.chars().any(|c| self.diacritics.contains(c)) {
            return true;
        }

        let mut total = 0usize;
        let mut common = 0usize;
        for token in text.split_whitespace() {
            total += 1;
            let normalized = token.to_lowercase();
            if self
                .common_words
                .contains(&normalized.trim_end_matches(TRAILING_PUNCTUATION))
            {
                common += 1;
            }
        }

        // No tokens leaves only the diacritic branch, which already failed.
        if total == 0 {
            return false;
        }

        common as f64 / total as f64 >= self.min_common_word_ratio
    }
}

/// Whitespace-delimited tokens that carry at least one letter or digit.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
}

pub fn validate(text: &str) -> ValidationResult {
    ValidationPolicy::default().validate(text)
}

pub fn word_count(text: &str) -> WordCount {
    ValidationPolicy::default().word_count(text)
}

pub fn looks_polish(text: &str) -> bool {
    ValidationPolicy::default().looks_polish(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_values() {
        let policy = ValidationPolicy::default();
        assert_eq!(policy.min_words, 1);
        assert_eq!(policy.max_words, 100);
        assert_eq!(policy.min_common_word_ratio, 0.2);
        assert_eq!(policy.diacritics.chars().count(), 18);
        assert_eq!(policy.common_words.len(), 51);
    }

    #[test]
    fn test_empty_text_single_error() {
        for text in ["", "   ", "\n\t  "] {
            let result = validate(text);
            assert!(!result.is_valid());
            assert_eq!(result.errors(), &[ValidationIssue::Empty]);
            assert_eq!(result.messages(), vec!["Text cannot be empty".to_string()]);
        }
    }

    #[test]
    fn test_valid_via_common_words() {
        let result = validate("Kot jest bardzo mily i ma dom.");
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_valid_via_diacritics() {
        // None of these tokens are on the common word list.
        let result = validate("Zażółć gęślą jaźń");
        assert!(result.is_valid());
    }

    #[test]
    fn test_english_text_rejected() {
        let result = validate("The quick brown fox jumps over the lazy dog");
        assert_eq!(result.errors(), &[ValidationIssue::NotPolish]);
    }

    #[test]
    fn test_ratio_boundary() {
        // 1 of 5 tokens is common: exactly 0.2 passes.
        assert!(looks_polish("dom cat tree house car"));
        // 1 of 6 drops below the threshold.
        assert!(!looks_polish("dom cat tree house car boat"));
    }

    #[test]
    fn test_ratio_counts_punctuation_tokens() {
        // Dashes are not words but still dilute the ratio: 1 of 9.
        assert!(!looks_polish("dom - cat - tree - car - boat"));
        assert_eq!(word_count("dom - cat - tree - car - boat").current, 5);
    }

    #[test]
    fn test_trailing_punctuation_stripped() {
        assert!(looks_polish("Tutaj! Kiedy? Jak, Co;"));
    }

    #[test]
    fn test_punctuation_only_counts_zero_words() {
        let result = validate("... !!! ?");
        assert_eq!(
            result.errors(),
            &[
                ValidationIssue::TooFewWords { min: 1 },
                ValidationIssue::NotPolish
            ]
        );
        assert_eq!(word_count("... !!! ?").current, 0);
    }

    #[test]
    fn test_too_many_words() {
        let text = "dom ".repeat(101);
        let result = validate(&text);
        assert_eq!(result.errors(), &[ValidationIssue::TooManyWords { max: 100 }]);
        assert_eq!(
            result.messages(),
            vec!["Text must not exceed 100 words".to_string()]
        );
    }

    #[test]
    fn test_exactly_max_words_is_valid() {
        let text = "dom ".repeat(100);
        assert!(validate(&text).is_valid());
        assert_eq!(
            word_count(&text),
            WordCount {
                current: 100,
                max: 100,
                is_valid: true
            }
        );
    }

    #[test]
    fn test_checks_are_not_short_circuited() {
        let text = "cat ".repeat(101);
        let result = validate(&text);
        assert_eq!(
            result.errors(),
            &[
                ValidationIssue::TooManyWords { max: 100 },
                ValidationIssue::NotPolish
            ]
        );
    }

    #[test]
    fn test_word_count_collapses_whitespace() {
        let count = word_count("  Kot \n\n jest\t\tmily  ");
        assert_eq!(count.current, 3);
        assert!(count.is_valid);
    }

    #[test]
    fn test_custom_policy() {
        let policy = ValidationPolicy {
            max_words: 3,
            min_common_word_ratio: 0.5,
            ..ValidationPolicy::default()
        };
        assert!(!policy.word_count("jest i dom kot").is_valid);
        assert!(policy.looks_polish("jest kot"));
        assert!(!policy.looks_polish("jest kot pies"));
    }

    #[test]
    fn test_count_agrees_with_validator() {
        let at_limit = "słowo ".repeat(100);
        let over_limit = "słowo ".repeat(101);
        let samples: [&str; 7] = [
            "",
            "   ",
            "...",
            "dom",
            "Kot jest bardzo mily i ma dom.",
            &at_limit,
            &over_limit,
        ];
        for text in samples {
            let count_ok = word_count(text).is_valid;
            let validator_count_ok = !validate(text).errors().iter().any(|e| {
                matches!(
                    e,
                    ValidationIssue::Empty
                        | ValidationIssue::TooFewWords { .. }
                        | ValidationIssue::TooManyWords { .. }
                )
            });
            assert_eq!(count_ok, validator_count_ok, "disagreement on {text:?}");
        }
    }
}
