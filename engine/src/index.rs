use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

use crate::tokenizer::Tokenizer;

/// Per-(term, document) statistics: occurrence count and the zero-based
/// token positions of each occurrence.
///
/// Invariant: `frequency == positions.len()` and positions are strictly
/// ascending. Positions index into the document's full term sequence — a
/// single counter shared across all terms of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub frequency: usize,
    pub positions: Vec<usize>,
}

impl Posting {
    fn record(&mut self, position: usize) {
        self.frequency += 1;
        self.positions.push(position);
    }
}

/// Positional inverted index: term -> (document -> posting).
///
/// Document ids are supplied by the caller and may be any hashable value
/// (integers, strings, ...). The index is in-memory only and grows
/// monotonically; there is no deletion or update-in-place.
#[derive(Debug, Clone)]
pub struct InvertedIndex<D> {
    tokenizer: Tokenizer,
    postings: HashMap<String, HashMap<D, Posting>>,
    // Tokens indexed so far per document; additive re-insertion resumes the
    // position counter here instead of restarting at zero.
    doc_len: HashMap<D, usize>,
}

impl<D> Default for InvertedIndex<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> InvertedIndex<D> {
    pub fn new() -> Self {
        InvertedIndex {
            tokenizer: Tokenizer::new(),
            postings: HashMap::new(),
            doc_len: HashMap::new(),
        }
    }

    pub fn with_tokenizer(tokenizer: Tokenizer) -> Self {
        InvertedIndex {
            tokenizer,
            postings: HashMap::new(),
            doc_len: HashMap::new(),
        }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Number of distinct terms in the index.
    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    /// Number of indexed documents.
    pub fn num_docs(&self) -> usize {
        self.doc_len.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_len.is_empty()
    }
}

impl<D: Eq + Hash + Clone> InvertedIndex<D> {
    /// Tokenize `text` and post every (term, position) pair under `doc_id`.
    ///
    /// Inserting an id that is already present is additive: new positions
    /// continue after the document's existing token count. Tokens whose stem
    /// is empty consume a position but are not indexed. Never fails;
    /// stemming anomalies are absorbed inside the tokenizer.
    pub fn add_document(&mut self, doc_id: D, text: &str) {
        let terms = self.tokenizer.tokenize(text);
        let base = self.doc_len.get(&doc_id).copied().unwrap_or(0);
        for (offset, term) in terms.iter().enumerate() {
            if term.is_empty() {
                continue;
            }
            self.postings
                .entry(term.clone())
                .or_default()
                .entry(doc_id.clone())
                .or_insert_with(|| Posting {
                    frequency: 0,
                    positions: Vec::new(),
                })
                .record(base + offset);
        }
        *self.doc_len.entry(doc_id).or_insert(0) += terms.len();
    }

    /// All documents containing `term`, with their postings. Empty for
    /// unknown terms, never an error.
    pub fn documents_for_term<'a>(
        &'a self,
        term: &str,
    ) -> impl Iterator<Item = (&'a D, &'a Posting)> {
        self.postings.get(term).into_iter().flat_map(|docs| docs.iter())
    }

    /// Number of documents containing `term`.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map(|docs| docs.len()).unwrap_or(0)
    }

    /// Posting for a (term, document) pair, if any.
    pub fn posting(&self, term: &str, doc_id: &D) -> Option<&Posting> {
        self.postings.get(term).and_then(|docs| docs.get(doc_id))
    }

    /// Positions of `term` within a document (empty slice when absent).
    pub fn positions(&self, term: &str, doc_id: &D) -> &[usize] {
        static EMPTY: [usize; 0] = [];
        self.posting(term, doc_id)
            .map(|p| p.positions.as_slice())
            .unwrap_or(&EMPTY)
    }

    /// Document length in tokens (0 if unknown).
    pub fn document_len(&self, doc_id: &D) -> usize {
        self.doc_len.get(doc_id).copied().unwrap_or(0)
    }
}
