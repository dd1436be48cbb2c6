// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Cosine-similarity TF-IDF ranking over a conjunctive AND candidate set.
//!
//! Scoring is restricted to the query's own terms: neither the query nor
//! any candidate document's vector ever gets a dimension for a term the
//! query didn't ask for, which is what keeps this a few-dozen-float
//! computation per candidate rather than a pass over the whole vocabulary.

use std::collections::HashMap;

use crate::reader::IndexReader;
use crate::types::{DocId, ScoredDocument};

/// Computes query/document TF-IDF vectors over a fixed term set and ranks
/// candidates by `cosine(query, doc) * sum(doc TF-IDF)`.
pub struct Ranker {
    total_documents: u32,
    idf_cache: HashMap<String, f64>,
}

impl Ranker {
    pub fn new(total_documents: u32) -> Self {
        Self {
            total_documents,
            idf_cache: HashMap::new(),
        }
    }

    /// `idf(t) = log10((N+1) / (df(t)+1))`, memoized for the lifetime of
    /// one query. A term with df = 0 (which `and_retrieve` already turns
    /// into an empty result before reaching here) contributes 0.
    fn idf(&mut self, term: &str, df: usize) -> f64 {
        if let Some(&cached) = self.idf_cache.get(term) {
            return cached;
        }
        let value = if df == 0 {
            0.0
        } else {
            ((self.total_documents as f64 + 1.0) / (df as f64 + 1.0)).log10()
        };
        self.idf_cache.insert(term.to_string(), value);
        value
    }

    /// Rank `candidates` against `query_terms` (the raw, possibly
    /// repeated, tokenized query). `postings` supplies each unique term's
    /// full postings list, e.g. as already fetched by the conjunctive AND
    /// step - there is no reason to seek the index twice for the same
    /// term within one query.
    pub fn rank(
        &mut self,
        reader: &mut IndexReader,
        query_terms: &[String],
        candidates: &[DocId],
    ) -> Vec<ScoredDocument> {
        if candidates.is_empty() || query_terms.is_empty() {
            return Vec::new();
        }

        let candidate_set: std::collections::HashSet<DocId> = candidates.iter().copied().collect();

        let mut query_term_counts: HashMap<String, u32> = HashMap::new();
        for term in query_terms {
            *query_term_counts.entry(term.clone()).or_insert(0) += 1;
        }
        let unique_terms: Vec<String> = query_term_counts.keys().cloned().collect();
        let postings = reader.postings_for_terms(&unique_terms);

        // Query vector: q[t] = qtf(t) * idf(t).
        let mut query_vector: HashMap<String, f64> = HashMap::new();
        for (term, qtf) in &query_term_counts {
            let df = postings.get(term).map_or(0, |p| p.len());
            let idf = self.idf(term, df);
            query_vector.insert(term.clone(), *qtf as f64 * idf);
        }
        let query_norm = vector_norm(query_vector.values());

        // Document vectors, restricted to query terms.
        let mut doc_vectors: HashMap<DocId, HashMap<String, f64>> = HashMap::new();
        for term in &unique_terms {
            let Some(term_postings) = postings.get(term) else {
                continue;
            };
            let df = term_postings.len();
            let idf = self.idf(term, df);
            for posting in term_postings {
                if !candidate_set.contains(&posting.doc_id) {
                    continue;
                }
                doc_vectors
                    .entry(posting.doc_id)
                    .or_default()
                    .insert(term.clone(), posting.tf as f64 * idf);
            }
        }

        let mut scored: Vec<ScoredDocument> = candidates
            .iter()
            .filter_map(|&doc_id| {
                let doc_vector = doc_vectors.get(&doc_id)?;
                let doc_norm = vector_norm(doc_vector.values());
                let dot: f64 = query_vector
                    .iter()
                    .map(|(term, q_weight)| q_weight * doc_vector.get(term).copied().unwrap_or(0.0))
                    .sum();
                let cosine = if query_norm == 0.0 || doc_norm == 0.0 {
                    0.0
                } else {
                    dot / (query_norm * doc_norm)
                };
                let tfidf_mass: f64 = doc_vector.values().sum();
                let score = cosine * tfidf_mass;

                let url = reader.url_for(doc_id)?;
                Some(ScoredDocument {
                    doc_id,
                    url,
                    score,
                    term_scores: doc_vector.clone(),
                })
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored
    }
}

fn vector_norm<'a, I: Iterator<Item = &'a f64>>(values: I) -> f64 {
    values.map(|v| v * v).sum::<f64>().sqrt()
}

/// Apply `(offset, limit)` pagination to an already-ranked result list.
pub fn paginate(results: Vec<ScoredDocument>, offset: usize, limit: usize) -> Vec<ScoredDocument> {
    results.into_iter().skip(offset).take(limit).collect()
}
