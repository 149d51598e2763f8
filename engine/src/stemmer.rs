use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

/// Defensive bound on stemmer input, not a linguistic one.
pub const DEFAULT_MAX_TOKEN_LEN: usize = 100;

/// Minimum stem length after suffix stripping; shorter results are rejected
/// and the original token is kept.
const MIN_STEM_LEN: usize = 3;

lazy_static! {
    static ref NON_ALPHABETIC: Regex = Regex::new("[^a-zA-Z]").expect("valid regex");

    /// Irregular forms that bypass the suffix rules entirely.
    static ref IRREGULAR_FORMS: HashMap<&'static str, &'static str> = {
        let pairs: &[(&str, &str)] = &[
            ("have", "hav"),
            ("being", "be"),
            ("goes", "go"),
            ("went", "go"),
            ("moved", "move"),
            ("moving", "move"),
            // Irregular verbs
            ("am", "be"),
            ("is", "be"),
            ("are", "be"),
            ("was", "be"),
            ("were", "be"),
            // Irregular comparatives
            ("better", "good"),
            ("best", "good"),
            ("worse", "bad"),
            ("worst", "bad"),
            // Irregular plurals
            ("children", "child"),
            ("mice", "mouse"),
            ("feet", "foot"),
        ];
        pairs.iter().copied().collect()
    };
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StemError {
    /// Token is not plain text (contains control characters).
    #[error("token is not plain text")]
    InvalidInput,
    /// Token exceeds the configured maximum length.
    #[error("token exceeds maximum length of {0} characters")]
    InputTooLong(usize),
}

/// Suffix-stripping stemmer with a small irregular-form table.
///
/// Reduces raw word tokens to canonical index terms. Intentionally lossy and
/// intentionally small: an irregular lookup plus four ordered suffix rules,
/// not a full morphological analyzer.
#[derive(Debug, Clone)]
pub struct Stemmer {
    max_token_len: usize,
}

impl Default for Stemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl Stemmer {
    pub fn new() -> Self {
        Stemmer {
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
        }
    }

    pub fn with_max_token_len(max_token_len: usize) -> Self {
        Stemmer { max_token_len }
    }

    pub fn max_token_len(&self) -> usize {
        self.max_token_len
    }

    /// Stem a single raw token to its canonical term.
    ///
    /// Blank input yields the empty term. Non-alphabetic characters are
    /// stripped before the rules apply, so a purely numeric token also yields
    /// the empty term.
    pub fn stem(&self, token: &str) -> Result<String, StemError> {
        if token.chars().any(|c| c.is_control()) {
            return Err(StemError::InvalidInput);
        }
        if token.trim().is_empty() {
            return Ok(String::new());
        }
        if token.chars().count() > self.max_token_len {
            return Err(StemError::InputTooLong(self.max_token_len));
        }

        let word = if token.chars().all(|c| c.is_ascii_alphabetic()) {
            token.to_owned()
        } else {
            NON_ALPHABETIC.replace_all(token, "").into_owned()
        };
        // Pure ASCII from here on; byte indexing below is safe.
        let word = word.to_lowercase();

        if let Some(stem) = IRREGULAR_FORMS.get(word.as_str()) {
            return Ok((*stem).to_string());
        }

        // Plurals ending in "ies" (cities -> city)
        if word.len() >= 4 && word.ends_with("ies") {
            return Ok(format!("{}y", &word[..word.len() - 3]));
        }

        // Progressive forms (running -> run)
        if word.ends_with("ing") {
            return Ok(strip_and_degeminate(&word, 3));
        }

        // Past tense (jumped -> jump, dropped -> drop)
        if word.ends_with("ed") {
            return Ok(strip_and_degeminate(&word, 2));
        }

        // Plurals, exempting double-s words like "glass"
        if word.ends_with('s') && !word.ends_with("ss") {
            if word.ends_with("es") {
                return Ok(word[..word.len() - 2].to_string());
            }
            return Ok(word[..word.len() - 1].to_string());
        }

        Ok(word)
    }
}

/// Strip `suffix_len` bytes, drop one of a doubled final consonant, and keep
/// the result only if it still has at least `MIN_STEM_LEN` characters.
fn strip_and_degeminate(word: &str, suffix_len: usize) -> String {
    let mut stem = &word[..word.len() - suffix_len];
    let bytes = stem.as_bytes();
    if bytes.len() >= MIN_STEM_LEN && bytes[bytes.len() - 1] == bytes[bytes.len() - 2] {
        stem = &stem[..stem.len() - 1];
    }
    if stem.len() >= MIN_STEM_LEN {
        stem.to_string()
    } else {
        word.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stem(token: &str) -> String {
        Stemmer::new().stem(token).expect("stemming succeeds")
    }

    #[test]
    fn irregular_forms() {
        assert_eq!(stem("went"), "go");
        assert_eq!(stem("children"), "child");
        assert_eq!(stem("mice"), "mouse");
        assert_eq!(stem("feet"), "foot");
        assert_eq!(stem("was"), "be");
        assert_eq!(stem("were"), "be");
        assert_eq!(stem("better"), "good");
        assert_eq!(stem("worst"), "bad");
        assert_eq!(stem("moving"), "move");
    }

    #[test]
    fn suffix_rules() {
        assert_eq!(stem("running"), "run");
        assert_eq!(stem("cities"), "city");
        assert_eq!(stem("boxes"), "box");
        assert_eq!(stem("jumped"), "jump");
        assert_eq!(stem("dropped"), "drop");
        assert_eq!(stem("cats"), "cat");
        assert_eq!(stem("foxes"), "fox");
    }

    #[test]
    fn double_s_exemption() {
        assert_eq!(stem("glass"), "glass");
        assert_eq!(stem("grass"), "grass");
    }

    #[test]
    fn short_stems_keep_original() {
        // Stripping "ed" from "bed" would leave "b"; the original survives.
        assert_eq!(stem("bed"), "bed");
        assert_eq!(stem("sing"), "sing");
    }

    #[test]
    fn lowercases_input() {
        assert_eq!(stem("Running"), "run");
        assert_eq!(stem("WENT"), "go");
    }

    #[test]
    fn strips_non_alphabetic() {
        assert_eq!(stem("cat42"), "cat");
        assert_eq!(stem("123"), "");
    }

    #[test]
    fn blank_input_yields_empty_term() {
        assert_eq!(stem(""), "");
        assert_eq!(stem("   "), "");
    }

    #[test]
    fn rejects_overlong_input() {
        let long = "a".repeat(101);
        assert_eq!(
            Stemmer::new().stem(&long),
            Err(StemError::InputTooLong(DEFAULT_MAX_TOKEN_LEN))
        );
        // Exactly at the bound is fine.
        let at_bound = "a".repeat(100);
        assert!(Stemmer::new().stem(&at_bound).is_ok());
    }

    #[test]
    fn rejects_control_characters() {
        assert_eq!(Stemmer::new().stem("cat\u{0}"), Err(StemError::InvalidInput));
        assert_eq!(Stemmer::new().stem("a\tb"), Err(StemError::InvalidInput));
    }

    #[test]
    fn configurable_length_bound() {
        let stemmer = Stemmer::with_max_token_len(5);
        assert_eq!(stemmer.stem("abcdef"), Err(StemError::InputTooLong(5)));
        assert_eq!(stemmer.stem("abcde").unwrap(), "abcde");
    }

    #[test]
    fn suffix_rule_outputs_are_fixed_points() {
        for word in ["running", "cities", "boxes", "jumped", "cats", "glass"] {
            let once = stem(word);
            assert_eq!(stem(&once), once, "stem of {word:?} is not a fixed point");
        }
    }
}
