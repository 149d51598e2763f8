use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;

use crate::index::{InvertedIndex, Posting};
use crate::search::{MatchResult, SearchError, SearchMode};

/// Read-write-locked index for multi-threaded use.
///
/// The bare [`InvertedIndex`] has no internal synchronization and assumes a
/// single writer. When an index must be shared across threads, this wrapper
/// provides the required discipline: searches take the read lock and run
/// concurrently, insertions take the write lock and run exclusively.
#[derive(Debug)]
pub struct SharedIndex<D> {
    inner: RwLock<InvertedIndex<D>>,
}

impl<D> Default for SharedIndex<D> {
    fn default() -> Self {
        SharedIndex {
            inner: RwLock::new(InvertedIndex::new()),
        }
    }
}

impl<D: Eq + Hash + Clone> SharedIndex<D> {
    pub fn new() -> Self {
        SharedIndex {
            inner: RwLock::new(InvertedIndex::new()),
        }
    }

    pub fn add_document(&self, doc_id: D, text: &str) {
        self.inner.write().add_document(doc_id, text);
    }

    pub fn search(
        &self,
        query: &str,
        mode: SearchMode,
    ) -> Result<HashMap<D, MatchResult>, SearchError> {
        self.inner.read().search(query, mode)
    }

    pub fn search_within(
        &self,
        query: &str,
        mode: SearchMode,
        max_distance: usize,
    ) -> Result<HashMap<D, MatchResult>, SearchError> {
        self.inner.read().search_within(query, mode, max_distance)
    }

    pub fn posting(&self, term: &str, doc_id: &D) -> Option<Posting> {
        self.inner.read().posting(term, doc_id).cloned()
    }

    pub fn num_docs(&self) -> usize {
        self.inner.read().num_docs()
    }

    pub fn num_terms(&self) -> usize {
        self.inner.read().num_terms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn concurrent_readers_after_indexing() {
        let index = Arc::new(SharedIndex::new());
        index.add_document(1u32, "the quick brown fox");
        index.add_document(2u32, "a lazy brown dog");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let index = Arc::clone(&index);
                thread::spawn(move || {
                    let hits = index.search("brown", SearchMode::Or).unwrap();
                    assert_eq!(hits.len(), 2);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
