//! In-memory full-text search over a positional inverted index.
//!
//! Documents are tokenized (case-folding, contraction expansion, punctuation
//! stripping, suffix-stripping stemming) and posted into a term -> document
//! -> posting map that records per-occurrence token positions. Queries run
//! through the same tokenizer and are answered under four matching
//! disciplines: any-term, all-terms, exact-phrase, and bounded-proximity.
//!
//! ```
//! use sift_engine::{InvertedIndex, SearchMode};
//!
//! let mut index = InvertedIndex::new();
//! index.add_document(1, "The quick brown fox");
//! index.add_document(2, "A quick red fox");
//!
//! let hits = index.search("quick fox", SearchMode::And).unwrap();
//! assert_eq!(hits.len(), 2);
//! let hits = index.search("brown fox", SearchMode::Phrase).unwrap();
//! assert_eq!(hits.len(), 1);
//! ```
//!
//! The index lives only for the lifetime of its owner: there is no
//! persistence, no deletion, and no internal synchronization (see
//! [`SharedIndex`] for the lock-protected variant).

pub mod index;
pub mod search;
pub mod shared;
pub mod stemmer;
pub mod tokenizer;

pub use index::{InvertedIndex, Posting};
pub use search::{MatchResult, SearchError, SearchMode, DEFAULT_MAX_DISTANCE};
pub use shared::SharedIndex;
pub use stemmer::{StemError, Stemmer, DEFAULT_MAX_TOKEN_LEN};
pub use tokenizer::Tokenizer;
