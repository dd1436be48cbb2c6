// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Disk-based inverted-index search engine for a corpus of web documents.
//!
//! Builds an inverted index from a zipped, line-delimited JSON corpus in
//! memory-bounded batches, then serves ranked keyword queries against the
//! persisted index with bounded memory.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌───────────┐   ┌────────────┐
//! │  corpus.rs │──▶│ tokenize  │──▶│  dedup.rs  │
//! │ (ZipCorpus)│   │  .rs      │   │(SimHash +  │
//! │            │   │(Tokenizer)│   │ canon URL) │
//! └────────────┘   └───────────┘   └────────────┘
//!        │                │               │
//!        ▼                ▼               ▼
//! ┌──────────────────────────────────────────────┐
//! │                  build/ (run_build)           │
//! │  parallel.rs (tokenize fan-out)               │
//! │  batch.rs (sorted partial index + offsets)    │
//! │  ids.rs (url/file id tables)                  │
//! │  merge.rs (k-way external merge)              │
//! └──────────────────────────────────────────────┘
//!        │
//!        ▼  postings.bin / offsets.bin / urls.json / files.json
//! ┌────────────┐   ┌───────────┐   ┌────────────┐
//! │ reader.rs  │──▶│ query.rs  │──▶│ ranker.rs  │
//! │(IndexReader│   │(conjunctive│   │(TF-IDF     │
//! │ + LRU)     │   │   AND)    │   │ cosine)    │
//! └────────────┘   └───────────┘   └────────────┘
//!        ▲                              │
//!        └──────────── search.rs ◀──────┘
//!                 (SearchEngine::search)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ferretdex::build::run_build;
//! use ferretdex::search::SearchEngine;
//!
//! run_build(Path::new("corpus.zip"), Path::new("./index"))?;
//!
//! let mut engine = SearchEngine::open(Path::new("./index"), None)?;
//! let results = engine.search("rust programming", 0, 10);
//! ```

// Module declarations
pub mod binary;
pub mod build;
pub mod corpus;
pub mod dedup;
pub mod error;
pub mod query;
pub mod ranker;
pub mod reader;
pub mod search;
pub mod tokenize;
pub mod types;

// Re-exports for public API
pub use build::{run_build, run_build_with_threshold, BuildSummary};
pub use corpus::{CorpusSource, RawRecord, ZipCorpus};
pub use dedup::{canonicalize_url, hamming_distance, simhash, DuplicateFilter};
pub use error::{BuildError, QueryError};
pub use query::QueryProcessor;
pub use ranker::{paginate, Ranker};
pub use reader::IndexReader;
pub use search::SearchEngine;
#[cfg(feature = "parallel")]
pub use search::SharedSearchEngine;
pub use tokenize::{strip_html, Tokenizer};
pub use types::{DocId, FileId, Posting, PostingList, ScoredDocument};
