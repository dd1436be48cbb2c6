// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query tokenization and conjunctive AND retrieval.
//!
//! A query is tokenized with exactly the same base-token function
//! ingestion uses (no weighted-tag step - queries have no HTML structure),
//! so the terms it produces are directly comparable against postings
//! built at index time. Retrieval is strict AND: a document must contain
//! every query term to survive.

use std::collections::HashMap;

use crate::reader::IndexReader;
use crate::tokenize::Tokenizer;
use crate::types::DocId;

/// Tokenizes queries and executes conjunctive (AND) retrieval against an
/// [`IndexReader`].
pub struct QueryProcessor<'a> {
    tokenizer: &'a Tokenizer,
}

impl<'a> QueryProcessor<'a> {
    pub fn new(tokenizer: &'a Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Tokenize a raw query string the same way document body text is
    /// tokenized - base tokens only, no tag weighting.
    pub fn tokenize(&self, query: &str) -> Vec<String> {
        self.tokenizer.tokenize_query(query)
    }

    /// Retrieve the set of `doc_id`s containing every one of `terms`
    /// (conjunctive AND). Returns an empty set immediately if `terms` is
    /// empty, or if any unique term has zero document frequency - without
    /// looking up the remaining terms' postings at all.
    pub fn and_retrieve(&self, reader: &mut IndexReader, terms: &[String]) -> Vec<DocId> {
        if terms.is_empty() {
            return Vec::new();
        }

        let unique_terms: Vec<String> = {
            let mut seen = std::collections::HashSet::new();
            terms
                .iter()
                .filter(|t| seen.insert((*t).clone()))
                .cloned()
                .collect()
        };

        // Check document frequencies (an O(1), no-I/O offset-map lookup)
        // before fetching any postings at all. A term absent from the
        // index makes the whole AND empty without ever seeking the
        // posting file for the other terms.
        if unique_terms.iter().any(|t| !reader.has_term(t)) {
            return Vec::new();
        }

        let postings = reader.postings_for_terms(&unique_terms);

        let mut by_df: Vec<(&String, usize)> = unique_terms
            .iter()
            .map(|t| (t, postings.get(t).map_or(0, |p| p.len())))
            .collect();
        by_df.sort_by_key(|(_, df)| *df);

        let mut candidates: Vec<DocId> = postings
            .get(by_df[0].0)
            .map(|p| p.iter().map(|posting| posting.doc_id).collect())
            .unwrap_or_default();

        for (term, _) in &by_df[1..] {
            if candidates.is_empty() {
                break;
            }
            let term_docs: std::collections::HashSet<DocId> = postings
                .get(*term)
                .map(|p| p.iter().map(|posting| posting.doc_id).collect())
                .unwrap_or_default();
            candidates.retain(|doc_id| term_docs.contains(doc_id));
        }

        candidates
    }

    /// Per-term raw occurrence counts in `terms` (the query's own "tf",
    /// before IDF weighting), keyed by unique term.
    pub fn term_counts(terms: &[String]) -> HashMap<String, u32> {
        let mut counts = HashMap::new();
        for term in terms {
            *counts.entry(term.clone()).or_insert(0u32) += 1;
        }
        counts
    }
}
