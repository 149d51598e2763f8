use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

use crate::stemmer::Stemmer;

lazy_static! {
    /// Fixed contraction table, expanded by global literal replacement.
    ///
    /// This is the canonical table; the "can't" -> "cannot" variant was
    /// chosen over "can not" (see DESIGN.md).
    static ref CONTRACTIONS: Vec<(&'static str, &'static str)> = vec![
        ("won't", "will not"),
        ("can't", "cannot"),
        ("i'm", "i am"),
        ("i'll", "i will"),
        ("i'd", "i would"),
        ("i've", "i have"),
    ];

    static ref PUNCTUATION: Regex = Regex::new(r#"[.,!?;:'"()]"#).expect("valid regex");
}

/// Text-to-terms pipeline: normalization followed by per-token stemming.
///
/// Documents and queries go through the same pipeline, so the same text
/// always yields the same term sequence.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stemmer: Stemmer,
}

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer {
            stemmer: Stemmer::new(),
        }
    }

    pub fn with_stemmer(stemmer: Stemmer) -> Self {
        Tokenizer { stemmer }
    }

    pub fn stemmer(&self) -> &Stemmer {
        &self.stemmer
    }

    /// Split text into raw word tokens.
    ///
    /// Steps, in order: NFKC normalization, lowercasing, contraction
    /// expansion, hyphen splitting, punctuation stripping, whitespace split.
    /// Contraction expansion must precede punctuation stripping because it
    /// matches on apostrophes.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let mut text = text.nfkc().collect::<String>().to_lowercase();
        for (contraction, expansion) in CONTRACTIONS.iter() {
            if text.contains(contraction) {
                text = text.replace(contraction, expansion);
            }
        }
        let text = text.replace('-', " ");
        let text = PUNCTUATION.replace_all(&text, "");
        text.split_whitespace().map(str::to_owned).collect()
    }

    /// Produce the ordered term sequence for a text.
    ///
    /// One output term per raw token; a token whose stem is empty (e.g. a
    /// purely numeric token) still occupies a slot so that document positions
    /// stay aligned with the raw token stream. A stemming failure never
    /// aborts tokenization: the raw token is kept and the failure is
    /// reported as a warning.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .into_iter()
            .map(|raw| match self.stemmer.stem(&raw) {
                Ok(term) => term,
                Err(err) => {
                    warn!(token = %raw, error = %err, "stemming failed, keeping raw token");
                    raw
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_splits() {
        let tokenizer = Tokenizer::new();
        assert_eq!(
            tokenizer.normalize("The Quick Brown FOX"),
            vec!["the", "quick", "brown", "fox"]
        );
    }

    #[test]
    fn normalize_expands_contractions() {
        let tokenizer = Tokenizer::new();
        assert_eq!(
            tokenizer.normalize("I'm sure it won't rain"),
            vec!["i", "am", "sure", "it", "will", "not", "rain"]
        );
        // Global replacement, not just the first occurrence.
        assert_eq!(
            tokenizer.normalize("can't and can't"),
            vec!["cannot", "and", "cannot"]
        );
    }

    #[test]
    fn normalize_splits_hyphenated_compounds() {
        let tokenizer = Tokenizer::new();
        assert_eq!(
            tokenizer.normalize("well-known quick-brown"),
            vec!["well", "known", "quick", "brown"]
        );
    }

    #[test]
    fn normalize_strips_punctuation() {
        let tokenizer = Tokenizer::new();
        assert_eq!(
            tokenizer.normalize("Hello, world! (really; truly:) \"yes\"."),
            vec!["hello", "world", "really", "truly", "yes"]
        );
    }

    #[test]
    fn normalize_empty_input() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.normalize("").is_empty());
        assert!(tokenizer.normalize("   \n\t ").is_empty());
    }

    #[test]
    fn tokenize_stems_each_token() {
        let tokenizer = Tokenizer::new();
        assert_eq!(
            tokenizer.tokenize("Cities are running"),
            vec!["city", "be", "run"]
        );
    }

    #[test]
    fn tokenize_keeps_a_slot_for_numeric_tokens() {
        let tokenizer = Tokenizer::new();
        // "42" stems to the empty term but still occupies position 1.
        assert_eq!(tokenizer.tokenize("cat 42 dog"), vec!["cat", "", "dog"]);
    }

    #[test]
    fn tokenize_is_deterministic() {
        let tokenizer = Tokenizer::new();
        let text = "I'm testing the quick-brown foxes, won't you?";
        assert_eq!(tokenizer.tokenize(text), tokenizer.tokenize(text));
    }
}
