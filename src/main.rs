// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! ferretdex CLI: build and search disk-based inverted indexes.
//!
//! ```bash
//! # Build an index from a corpus archive
//! ferretdex build corpus.zip --output ./index
//!
//! # Search the built index
//! ferretdex search ./index "rust programming" --limit 10
//! ```

mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use cli::display::print_results;
use cli::{Cli, Commands};
use ferretdex::build::run_build_with_threshold;
use ferretdex::search::SearchEngine;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Build {
            archive,
            output,
            simhash_threshold,
        } => run_build_command(&archive, &output, simhash_threshold),
        Commands::Search {
            index_dir,
            query,
            limit,
            offset,
            archive,
            cache_capacity,
        } => run_search_command(&index_dir, &query, offset, limit, archive, cache_capacity),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_build_command(
    archive: &std::path::Path,
    output: &std::path::Path,
    simhash_threshold: u32,
) -> anyhow::Result<()> {
    let summary = run_build_with_threshold(archive, output, simhash_threshold)
        .with_context(|| format!("building index from {}", archive.display()))?;

    println!(
        "Indexed {} documents ({} files, {} terms, {} duplicates skipped) into {}",
        summary.document_count,
        summary.file_count,
        summary.term_count,
        summary.skipped_duplicates,
        output.display()
    );
    Ok(())
}

fn run_search_command(
    index_dir: &std::path::Path,
    query: &str,
    offset: usize,
    limit: usize,
    archive: Option<std::path::PathBuf>,
    cache_capacity: usize,
) -> anyhow::Result<()> {
    let mut engine = SearchEngine::open_with_cache_capacity(index_dir, archive, cache_capacity)
        .with_context(|| format!("opening index directory {}", index_dir.display()))?;

    let (results, total) = engine.search_with_total(query, offset, limit);
    print_results(&results, offset, total);
    Ok(())
}
