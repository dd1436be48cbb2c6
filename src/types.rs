// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of the index: document identifiers and postings.
//!
//! `DocId` and `FileId` are newtypes rather than raw `u32`s so the compiler
//! stops you from passing a file id where a doc id is expected - the two
//! id spaces are independent and nothing about their numeric values should
//! ever be compared across them.

use std::collections::HashMap;

/// Dense, 0-based document identifier assigned in corpus insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DocId(pub u32);

impl DocId {
    /// Construct a DocId, validating it against the known document count.
    #[inline]
    pub fn new(id: u32, num_docs: usize) -> Option<Self> {
        if (id as usize) < num_docs {
            Some(DocId(id))
        } else {
            None
        }
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for DocId {
    fn from(id: u32) -> Self {
        DocId(id)
    }
}

impl From<DocId> for usize {
    fn from(id: DocId) -> Self {
        id.0 as usize
    }
}

/// Dense, 0-based archive-member identifier assigned in corpus insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct FileId(pub u32);

impl FileId {
    #[inline]
    pub fn new(id: u32, num_files: usize) -> Option<Self> {
        if (id as usize) < num_files {
            Some(FileId(id))
        } else {
            None
        }
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for FileId {
    fn from(id: u32) -> Self {
        FileId(id)
    }
}

impl From<FileId> for usize {
    fn from(id: FileId) -> Self {
        id.0 as usize
    }
}

/// A single term occurrence in one document: its doc id and normalized
/// (sums to 1 across a document's tokens) term frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posting {
    pub doc_id: DocId,
    pub tf: f32,
}

/// Postings for one term, always kept sorted by ascending `doc_id` with no
/// duplicate `doc_id` within the list (see `INV-POSTINGS-SORTED` /
/// `INV-POSTINGS-UNIQUE` in the property tests).
pub type PostingList = Vec<Posting>;

/// One ranked search hit, restricted to the query's terms in `term_scores`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub doc_id: DocId,
    pub url: String,
    pub score: f64,
    pub term_scores: HashMap<String, f64>,
}
