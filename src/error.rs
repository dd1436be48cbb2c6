// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Typed errors for the build and query boundaries.
//!
//! Most failures inside the engine are *not* represented here. A malformed
//! corpus record, a stale offset, a missing term: these degrade to empty
//! results plus a `tracing::warn!`, per the recovery rules each module
//! documents. `BuildError` and `QueryError` exist only for the failures that
//! should stop the caller: a corpus that cannot be opened at all, or an
//! index directory that is missing or corrupt at open time.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort an index build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to open corpus archive {path}: {source}")]
    Corpus {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus archive {path} is not a valid zip: {source}")]
    InvalidArchive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("failed to create index directory {path}: {source}")]
    CreateIndexDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("external merge failed: {0}")]
    Merge(String),
}

/// Errors opening or validating a persisted index directory.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("index directory {0} does not contain postings.bin/offsets.bin")]
    MissingArtifacts(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt index file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}
