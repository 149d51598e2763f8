use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

use crate::index::InvertedIndex;

/// Default proximity window, in token positions.
pub const DEFAULT_MAX_DISTANCE: usize = 3;

/// Matching discipline for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Any query term matches.
    Or,
    /// Every distinct query term must match.
    And,
    /// The query terms must appear as an adjacent sequence.
    Phrase,
    /// The first two query terms must appear within a bounded distance.
    Proximity,
}

impl FromStr for SearchMode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "or" => Ok(SearchMode::Or),
            "and" => Ok(SearchMode::And),
            "phrase" => Ok(SearchMode::Phrase),
            "proximity" => Ok(SearchMode::Proximity),
            other => Err(SearchError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchMode::Or => "or",
            SearchMode::And => "and",
            SearchMode::Phrase => "phrase",
            SearchMode::Proximity => "proximity",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Query was empty or whitespace-only.
    #[error("query must be non-empty text")]
    InvalidQuery,
    /// Mode string did not name a search mode.
    #[error("unrecognized search mode: {0:?}")]
    InvalidMode(String),
}

/// Internal evaluation failures, absorbed at the search entry point.
#[derive(Debug, Error)]
enum SearchFailure {
    #[error("token position arithmetic overflowed")]
    PositionOverflow,
}

/// Per-document outcome of one query; lives only for the duration of the
/// call that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Distinct query terms found in the document.
    pub match_count: usize,
    /// The matched terms, in first-match order.
    pub terms: Vec<String>,
    /// Summed occurrence frequency across the matched terms.
    pub total_frequency: usize,
    /// PHRASE only: anchor position of the first qualifying match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase_position: Option<usize>,
    /// PROXIMITY only: minimum distance between the first two query terms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<usize>,
    /// PROXIMITY only: the position pair realizing that distance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_pair: Option<(usize, usize)>,
}

impl<D: Eq + Hash + Clone> InvertedIndex<D> {
    /// Run a query under the given mode with the default proximity window.
    pub fn search(
        &self,
        query: &str,
        mode: SearchMode,
    ) -> Result<HashMap<D, MatchResult>, SearchError> {
        self.search_within(query, mode, DEFAULT_MAX_DISTANCE)
    }

    /// Run a query under the given mode with an explicit proximity window.
    ///
    /// Validation failures (empty query) surface as errors; internal
    /// evaluation failures are reported as warnings and yield an empty
    /// result mapping so a search can never crash its caller.
    pub fn search_within(
        &self,
        query: &str,
        mode: SearchMode,
        max_distance: usize,
    ) -> Result<HashMap<D, MatchResult>, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidQuery);
        }
        // Empty stems can never match anything: the empty term is never
        // indexed. Drop them so they do not count toward AND's requirement.
        let terms: Vec<String> = self
            .tokenizer()
            .tokenize(query)
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect();

        let outcome = match mode {
            SearchMode::Or => Ok(self.match_any(&terms)),
            SearchMode::And => Ok(self.match_all(&terms)),
            SearchMode::Phrase => self.match_phrase(&terms),
            SearchMode::Proximity => Ok(self.match_near(&terms, max_distance)),
        };
        match outcome {
            Ok(hits) => Ok(hits),
            Err(failure) => {
                warn!(%mode, error = %failure, "search failed internally, returning no matches");
                Ok(HashMap::new())
            }
        }
    }

    /// OR: union of per-term hits, accumulated per document.
    fn match_any(&self, terms: &[String]) -> HashMap<D, MatchResult> {
        let mut hits: HashMap<D, MatchResult> = HashMap::new();
        for term in distinct(terms) {
            for (doc_id, posting) in self.documents_for_term(term) {
                let result = hits.entry(doc_id.clone()).or_default();
                result.match_count += 1;
                result.terms.push(term.to_string());
                result.total_frequency += posting.frequency;
            }
        }
        hits
    }

    /// AND: OR accumulation filtered to documents matching every distinct
    /// query term.
    fn match_all(&self, terms: &[String]) -> HashMap<D, MatchResult> {
        let required = distinct(terms).len();
        if required == 0 {
            return HashMap::new();
        }
        let mut hits = self.match_any(terms);
        hits.retain(|_, result| result.match_count == required);
        hits
    }

    /// PHRASE: anchor scan over the first term's positions; `terms[i]` must
    /// occur at `anchor + i` for every i. Only the first qualifying anchor
    /// per document is reported.
    fn match_phrase(
        &self,
        terms: &[String],
    ) -> Result<HashMap<D, MatchResult>, SearchFailure> {
        let mut hits = HashMap::new();
        let Some(first) = terms.first() else {
            return Ok(hits);
        };
        for (doc_id, posting) in self.documents_for_term(first) {
            let mut matched_anchor = None;
            'anchors: for &anchor in &posting.positions {
                for (i, term) in terms.iter().enumerate().skip(1) {
                    let wanted = anchor
                        .checked_add(i)
                        .ok_or(SearchFailure::PositionOverflow)?;
                    // Position lists are strictly ascending, so binary search
                    // decides membership.
                    if self.positions(term, doc_id).binary_search(&wanted).is_err() {
                        continue 'anchors;
                    }
                }
                matched_anchor = Some(anchor);
                break;
            }
            if let Some(anchor) = matched_anchor {
                let mut result = self.doc_match(terms, doc_id);
                result.phrase_position = Some(anchor);
                hits.insert(doc_id.clone(), result);
            }
        }
        Ok(hits)
    }

    /// PROXIMITY: AND first, then the minimum absolute distance between the
    /// first two query terms must be within `max_distance`. Terms beyond the
    /// first two only contribute to the AND prefilter.
    fn match_near(&self, terms: &[String], max_distance: usize) -> HashMap<D, MatchResult> {
        if terms.len() < 2 {
            return HashMap::new();
        }
        let candidates = self.match_all(terms);
        let (first, second) = (&terms[0], &terms[1]);

        let mut hits = HashMap::new();
        for (doc_id, mut result) in candidates {
            let found = min_distance(
                self.positions(first, &doc_id),
                self.positions(second, &doc_id),
            );
            if let Some((distance, pair)) = found {
                if distance <= max_distance {
                    result.distance = Some(distance);
                    result.position_pair = Some(pair);
                    hits.insert(doc_id, result);
                }
            }
        }
        hits
    }

    /// Accumulate match statistics for the distinct query terms present in
    /// one document.
    fn doc_match(&self, terms: &[String], doc_id: &D) -> MatchResult {
        let mut result = MatchResult::default();
        for term in distinct(terms) {
            if let Some(posting) = self.posting(term, doc_id) {
                result.match_count += 1;
                result.terms.push(term.to_string());
                result.total_frequency += posting.frequency;
            }
        }
        result
    }
}

/// Distinct terms in first-seen order; repeated query terms count once.
fn distinct(terms: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    terms
        .iter()
        .map(String::as_str)
        .filter(|t| seen.insert(*t))
        .collect()
}

/// Minimum absolute distance between two strictly ascending position lists,
/// with the realizing pair. Two-pointer scan.
fn min_distance(a: &[usize], b: &[usize]) -> Option<(usize, (usize, usize))> {
    let mut best: Option<(usize, (usize, usize))> = None;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let (x, y) = (a[i], b[j]);
        let diff = x.abs_diff(y);
        if best.map_or(true, |(d, _)| diff < d) {
            best = Some((diff, (x, y)));
        }
        if x < y {
            i += 1;
        } else {
            j += 1;
        }
    }
    best
}
