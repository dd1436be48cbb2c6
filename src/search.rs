// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Top-level query path: tokenize -> conjunctive AND -> rank -> paginate.
//!
//! This is the one entry point the CLI's `search` subcommand (and any
//! future HTTP wrapper) needs; everything it does is a thin composition of
//! [`crate::reader::IndexReader`], [`crate::query::QueryProcessor`], and
//! [`crate::ranker::Ranker`].

use std::path::{Path, PathBuf};

use crate::error::QueryError;
use crate::query::QueryProcessor;
use crate::ranker::{paginate, Ranker};
use crate::reader::{IndexReader, DEFAULT_CACHE_CAPACITY};
use crate::tokenize::Tokenizer;
use crate::types::ScoredDocument;

#[cfg(feature = "parallel")]
use parking_lot::Mutex;

/// Everything the query path needs, opened once per process (or per
/// worker thread - see §5's concurrency model).
pub struct SearchEngine {
    reader: IndexReader,
    tokenizer: Tokenizer,
}

impl SearchEngine {
    pub fn open(index_dir: &Path, archive_path: Option<PathBuf>) -> Result<Self, QueryError> {
        Self::open_with_cache_capacity(index_dir, archive_path, DEFAULT_CACHE_CAPACITY)
    }

    pub fn open_with_cache_capacity(
        index_dir: &Path,
        archive_path: Option<PathBuf>,
        cache_capacity: usize,
    ) -> Result<Self, QueryError> {
        let reader = IndexReader::open(index_dir, archive_path, cache_capacity)?;
        Ok(Self {
            reader,
            tokenizer: Tokenizer::new(),
        })
    }

    /// Tokenize `query`, run conjunctive AND retrieval, rank survivors by
    /// cosine-similarity TF-IDF, and apply `(offset, limit)` pagination.
    /// An empty tokenized query (or a query with no AND-surviving
    /// documents) returns an empty, non-error result set.
    pub fn search(&mut self, query: &str, offset: usize, limit: usize) -> Vec<ScoredDocument> {
        self.search_with_total(query, offset, limit).0
    }

    /// Like [`SearchEngine::search`], but also returns the total number of
    /// ranked matches before pagination - enough for a caller to print a
    /// "... and N more" footer.
    pub fn search_with_total(
        &mut self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> (Vec<ScoredDocument>, usize) {
        let qp = QueryProcessor::new(&self.tokenizer);
        let terms = qp.tokenize(query);
        if terms.is_empty() {
            return (Vec::new(), 0);
        }

        let candidates = qp.and_retrieve(&mut self.reader, &terms);
        if candidates.is_empty() {
            return (Vec::new(), 0);
        }

        let mut ranker = Ranker::new(self.reader.document_count());
        let ranked = ranker.rank(&mut self.reader, &terms, &candidates);
        let total = ranked.len();
        (paginate(ranked, offset, limit), total)
    }

    pub fn document_text_for(&self, doc_id: crate::types::DocId) -> Option<String> {
        self.reader.document_text_for(doc_id)
    }
}

/// A [`SearchEngine`] shared across worker threads, per §5's concurrency
/// model: the query engine is single-threaded *per query* (each call gets
/// its own [`Ranker`] scratch state), but the warm `IndexReader` - its LRU
/// postings cache and its seek cursor into `postings.bin` - is shared
/// state, so it needs a lock around it. This follows the same
/// `Mutex<LruCache<..>>` idiom `motedb`'s `CachedIndex` uses for its own
/// disk-backed cache: one contended lock around the mutable reader beats
/// giving every worker thread its own cold cache.
#[cfg(feature = "parallel")]
pub struct SharedSearchEngine {
    reader: Mutex<IndexReader>,
    tokenizer: Tokenizer,
}

#[cfg(feature = "parallel")]
impl SharedSearchEngine {
    pub fn open(index_dir: &Path, archive_path: Option<PathBuf>) -> Result<Self, QueryError> {
        Self::open_with_cache_capacity(index_dir, archive_path, DEFAULT_CACHE_CAPACITY)
    }

    pub fn open_with_cache_capacity(
        index_dir: &Path,
        archive_path: Option<PathBuf>,
        cache_capacity: usize,
    ) -> Result<Self, QueryError> {
        let reader = IndexReader::open(index_dir, archive_path, cache_capacity)?;
        Ok(Self {
            reader: Mutex::new(reader),
            tokenizer: Tokenizer::new(),
        })
    }

    /// Run one query to completion while holding the reader lock for its
    /// duration. Tokenization and ranking happen outside the lock wherever
    /// they don't need the reader, but every postings lookup does, so in
    /// practice the lock is held for the whole call - the point is that
    /// concurrent callers never corrupt the shared cache or seek cursor,
    /// not that they run the I/O-bound parts in parallel with each other.
    pub fn search(&self, query: &str, offset: usize, limit: usize) -> Vec<ScoredDocument> {
        self.search_with_total(query, offset, limit).0
    }

    pub fn search_with_total(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> (Vec<ScoredDocument>, usize) {
        let qp = QueryProcessor::new(&self.tokenizer);
        let terms = qp.tokenize(query);
        if terms.is_empty() {
            return (Vec::new(), 0);
        }

        let mut reader = self.reader.lock();
        let candidates = qp.and_retrieve(&mut reader, &terms);
        if candidates.is_empty() {
            return (Vec::new(), 0);
        }

        let mut ranker = Ranker::new(reader.document_count());
        let ranked = ranker.rank(&mut reader, &terms, &candidates);
        let total = ranked.len();
        (paginate(ranked, offset, limit), total)
    }

    pub fn document_text_for(&self, doc_id: crate::types::DocId) -> Option<String> {
        self.reader.lock().document_text_for(doc_id)
    }
}
