// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Random-access reader over the final on-disk index.
//!
//! `IndexReader::open` loads the two small JSON id tables and the
//! `offsets.bin` term -> offset map into memory, then keeps `postings.bin`
//! open for seeking. Decoded postings lists are cached in an LRU so a hot
//! query workload stops paying the seek+decode cost on repeat lookups; the
//! offset map itself is never evicted, since it's what makes a cache miss
//! O(1) in the first place.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use lru::LruCache;
use serde::Deserialize;

use crate::binary::header::FileKind;
use crate::binary::{read_offsets, read_term_record, FileHeader};
use crate::build::ids::{read_doc_file_map, IdTable};
use crate::error::QueryError;
use crate::tokenize::strip_html;
use crate::types::{DocId, FileId, Posting, PostingList};

/// Default LRU capacity: number of distinct terms' decoded postings kept
/// warm at once (spec default: 100).
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

#[derive(Deserialize)]
struct JsonLine {
    url: String,
    content: String,
}

/// Opens `postings.bin`/`offsets.bin`/`urls.json`/`files.json` under an
/// index directory and serves random-access lookups against them.
pub struct IndexReader {
    postings_file: BufReader<File>,
    offsets: HashMap<String, u64>,
    urls: IdTable,
    files: IdTable,
    doc_file_ids: Vec<u32>,
    doc_count: u32,
    cache: LruCache<String, PostingList>,
    archive_path: Option<PathBuf>,
}

impl IndexReader {
    /// Open an index directory built by [`crate::build::run_build`].
    /// `archive_path`, if given, enables [`IndexReader::document_text_for`]
    /// by pointing back at the original corpus archive.
    pub fn open(
        index_dir: &Path,
        archive_path: Option<PathBuf>,
        cache_capacity: usize,
    ) -> Result<Self, QueryError> {
        let postings_path = index_dir.join("postings.bin");
        let offsets_path = index_dir.join("offsets.bin");
        let urls_path = index_dir.join("urls.json");
        let files_path = index_dir.join("files.json");
        let doc_files_path = index_dir.join("doc_files.json");

        if !postings_path.exists() || !offsets_path.exists() {
            return Err(QueryError::MissingArtifacts(index_dir.to_path_buf()));
        }

        let postings_file = File::open(&postings_path).map_err(|source| QueryError::Read {
            path: postings_path.clone(),
            source,
        })?;
        let mut postings_file = BufReader::new(postings_file);
        let header = FileHeader::read(&mut postings_file, FileKind::Postings).map_err(|e| {
            QueryError::Corrupt {
                path: postings_path.clone(),
                reason: e.to_string(),
            }
        })?;
        postings_file
            .seek(SeekFrom::Start(0))
            .map_err(|source| QueryError::Read {
                path: postings_path.clone(),
                source,
            })?;

        let offsets_file = File::open(&offsets_path).map_err(|source| QueryError::Read {
            path: offsets_path.clone(),
            source,
        })?;
        let offsets = read_offsets(offsets_file).map_err(|e| QueryError::Corrupt {
            path: offsets_path.clone(),
            reason: e.to_string(),
        })?;

        let urls = IdTable::read_json(&urls_path).map_err(|source| QueryError::Read {
            path: urls_path.clone(),
            source,
        })?;
        let files = IdTable::read_json(&files_path).map_err(|source| QueryError::Read {
            path: files_path.clone(),
            source,
        })?;
        let doc_file_ids = read_doc_file_map(&doc_files_path).unwrap_or_default();

        let capacity = NonZeroUsize::new(cache_capacity.max(1)).expect("capacity is at least 1");

        Ok(Self {
            postings_file,
            offsets,
            urls,
            files,
            doc_file_ids,
            doc_count: header.doc_count,
            cache: LruCache::new(capacity),
            archive_path,
        })
    }

    pub fn document_count(&self) -> u32 {
        self.doc_count
    }

    /// Whether `term` has any postings at all - resolves purely from the
    /// in-memory offset map, no I/O.
    pub fn has_term(&self, term: &str) -> bool {
        self.offsets.contains_key(term)
    }

    /// Whether `term`'s postings are currently held in the LRU, without
    /// promoting it or touching disk. Exists for tests that need to
    /// observe whether a lookup actually performed a seek+decode (see
    /// `and_retrieve`'s df=0 short-circuit).
    pub fn is_term_cached(&self, term: &str) -> bool {
        self.cache.contains(term)
    }

    /// Number of documents containing `term` (its postings list length).
    pub fn document_frequency(&mut self, term: &str) -> usize {
        self.postings_for_term(term).len()
    }

    pub fn url_for(&self, doc_id: DocId) -> Option<String> {
        self.urls.get(doc_id.get()).map(str::to_string)
    }

    /// Fetch `term`'s postings, consulting the LRU first and falling back
    /// to a seek+decode on miss. A term absent from the offset map never
    /// touches disk - it resolves straight to an empty list.
    pub fn postings_for_term(&mut self, term: &str) -> PostingList {
        if let Some(cached) = self.cache.get(term) {
            return cached.clone();
        }
        let Some(&offset) = self.offsets.get(term) else {
            return Vec::new();
        };
        match self.decode_at(offset, term) {
            Ok(postings) => {
                self.cache.put(term.to_string(), postings.clone());
                postings
            }
            Err(e) => {
                tracing::warn!(term, error = %e, "stale offset or I/O error reading postings");
                Vec::new()
            }
        }
    }

    /// Batch variant: resolve every term in `terms`, serving cache hits
    /// immediately and performing a single ascending-offset sequential
    /// pass over the misses to minimize random seeks.
    pub fn postings_for_terms(&mut self, terms: &[String]) -> HashMap<String, PostingList> {
        let mut result = HashMap::with_capacity(terms.len());
        let mut misses: Vec<(u64, String)> = Vec::new();

        for term in terms {
            if result.contains_key(term) {
                continue;
            }
            if let Some(cached) = self.cache.get(term) {
                result.insert(term.clone(), cached.clone());
                continue;
            }
            match self.offsets.get(term) {
                Some(&offset) => misses.push((offset, term.clone())),
                None => {
                    result.insert(term.clone(), Vec::new());
                }
            }
        }

        misses.sort_by_key(|(offset, _)| *offset);
        for (offset, term) in misses {
            let postings = match self.decode_at(offset, &term) {
                Ok(postings) => postings,
                Err(e) => {
                    tracing::warn!(term = %term, error = %e, "stale offset or I/O error reading postings");
                    Vec::new()
                }
            };
            self.cache.put(term.clone(), postings.clone());
            result.insert(term, postings);
        }

        result
    }

    fn decode_at(&mut self, offset: u64, expected_term: &str) -> std::io::Result<PostingList> {
        self.postings_file.seek(SeekFrom::Start(offset))?;
        let (term, postings) = read_term_record(&mut self.postings_file)?;
        if term != expected_term {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("offset for '{expected_term}' decoded term '{term}' instead"),
            ));
        }
        Ok(postings)
    }

    /// Fetch and strip the original HTML for `doc_id`, for the document
    /// summarizer. Not cached - this sits off the hot query path and is
    /// invoked rarely, per spec. Returns `None` if no archive path was
    /// given at open time, or the document/member can't be found.
    pub fn document_text_for(&self, doc_id: DocId) -> Option<String> {
        let archive_path = self.archive_path.as_ref()?;
        let file_id = FileId(*self.doc_file_ids.get(doc_id.as_usize())?);
        let file_name = self.files.get(file_id.get())?;
        let url = self.urls.get(doc_id.get())?;

        let file = File::open(archive_path).ok()?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file)).ok()?;
        let mut entry = archive.by_name(file_name).ok()?;
        let mut contents = String::new();
        entry.read_to_string(&mut contents).ok()?;

        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let Ok(parsed) = serde_json::from_str::<JsonLine>(line) else {
                continue;
            };
            let canonical = crate::dedup::canonicalize_url(&parsed.url);
            if canonical == url {
                return Some(strip_html(&parsed.content));
            }
        }
        None
    }
}
