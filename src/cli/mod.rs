// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the ferretdex command-line interface.
//!
//! Two subcommands, matching the core's external interface (spec §6):
//! `build` runs ingestion + merge over a corpus archive, `search` queries
//! an already-built index directory and prints ranked results.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ferretdex",
    about = "Disk-based inverted-index search engine for web document corpora",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an inverted index from a corpus archive
    Build {
        /// Path to the corpus archive (a zip of .json line-delimited records)
        archive: PathBuf,

        /// Output directory for the index artifacts
        #[arg(short, long, default_value = "index")]
        output: PathBuf,

        /// Maximum Hamming distance for SimHash near-duplicate suppression
        #[arg(long, default_value_t = crate::dedup::DEFAULT_SIMHASH_THRESHOLD)]
        simhash_threshold: u32,
    },

    /// Search a previously built index directory
    Search {
        /// Index directory produced by `build`
        index_dir: PathBuf,

        /// Search query
        query: String,

        /// Maximum number of results to return
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Number of leading results to skip, applied after ranking
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Original corpus archive, enabling full per-document text
        /// retrieval (the summarizer seam); omit to skip it
        #[arg(long)]
        archive: Option<PathBuf>,

        /// LRU postings cache capacity (distinct terms kept decoded)
        #[arg(long, default_value_t = crate::reader::DEFAULT_CACHE_CAPACITY)]
        cache_capacity: usize,
    },
}
