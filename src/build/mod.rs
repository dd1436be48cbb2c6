// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build pipeline: corpus archive -> on-disk inverted index.
//!
//! The pipeline has two phases per batch. A data-parallel tokenization
//! phase (`parallel::tokenize_batch`) turns raw records into term -> tf
//! maps with no shared state between documents. A strictly serial phase
//! then interns ids and writes a sorted partial index (`batch`). Once the
//! whole archive has been consumed, `merge` k-way merges every partial
//! into the final `postings.bin`/`offsets.bin`, and the id tables are
//! flushed to `urls.json`/`files.json` immediately before that merge
//! begins.

pub mod batch;
pub mod ids;
pub mod merge;
pub mod parallel;

use std::path::Path;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::corpus::{CorpusSource, RawRecord, ZipCorpus};
use crate::dedup::DuplicateFilter;
use crate::error::BuildError;
use crate::tokenize::Tokenizer;

use batch::{write_partial_index, BatchRecord, PartialIndex};
use ids::IdTable;

/// Documents accumulated per batch when the archive's total size isn't
/// known up front (it never is, since the archive is streamed record by
/// record). Mirrors the original's fixed-count `read_zip(count)` batching.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Summary of a completed build, returned to the CLI for reporting.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub document_count: u32,
    pub file_count: u32,
    pub term_count: u32,
    pub skipped_duplicates: u64,
}

#[cfg(feature = "parallel")]
fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<10} {pos} {msg}")
        .unwrap()
        .progress_chars("-")
}

/// Run a full build with the default SimHash threshold. See
/// [`run_build_with_threshold`] to override it.
pub fn run_build(archive_path: &Path, index_dir: &Path) -> Result<BuildSummary, BuildError> {
    run_build_with_threshold(archive_path, index_dir, crate::dedup::DEFAULT_SIMHASH_THRESHOLD)
}

/// Run a full build: stream `archive_path`, dedup + tokenize in batches of
/// `DEFAULT_BATCH_SIZE`, write a sorted partial index per batch, then
/// merge everything into `index_dir`. `simhash_threshold` is the maximum
/// Hamming distance for two documents to be considered near-duplicates.
pub fn run_build_with_threshold(
    archive_path: &Path,
    index_dir: &Path,
    simhash_threshold: u32,
) -> Result<BuildSummary, BuildError> {
    std::fs::create_dir_all(index_dir).map_err(|source| BuildError::CreateIndexDir {
        path: index_dir.to_path_buf(),
        source,
    })?;

    let mut corpus = ZipCorpus::open(archive_path)?;
    let tokenizer = Tokenizer::new();
    let mut dedup = DuplicateFilter::new(simhash_threshold);

    let mut url_table = IdTable::new();
    let mut file_table = IdTable::new();
    let mut doc_file_ids: Vec<u32> = Vec::new();
    let mut partials: Vec<PartialIndex> = Vec::new();
    let mut skipped_duplicates: u64 = 0;
    let mut accepted_total: u32 = 0;

    #[cfg(feature = "parallel")]
    let pbar = {
        let pbar = ProgressBar::new_spinner();
        pbar.set_style(progress_style());
        pbar.set_prefix("Indexing");
        pbar
    };

    let mut pending: Vec<RawRecord> = Vec::with_capacity(DEFAULT_BATCH_SIZE);
    loop {
        let record = corpus
            .next_record()
            .map_err(|source| BuildError::Corpus {
                path: archive_path.to_path_buf(),
                source,
            })?;
        match record {
            Some(record) => {
                pending.push(record);
                if pending.len() >= DEFAULT_BATCH_SIZE {
                    let batch = std::mem::take(&mut pending);
                    accepted_total += flush_batch(
                        batch,
                        partials.len(),
                        index_dir,
                        &tokenizer,
                        &mut dedup,
                        &mut url_table,
                        &mut file_table,
                        &mut doc_file_ids,
                        &mut partials,
                        &mut skipped_duplicates,
                    )?;
                    #[cfg(feature = "parallel")]
                    pbar.set_message(format!("{} documents", accepted_total));
                    tracing::info!(documents = accepted_total, "flushed batch");
                }
            }
            None => break,
        }
    }
    if !pending.is_empty() {
        accepted_total += flush_batch(
            pending,
            partials.len(),
            index_dir,
            &tokenizer,
            &mut dedup,
            &mut url_table,
            &mut file_table,
            &mut doc_file_ids,
            &mut partials,
            &mut skipped_duplicates,
        )?;
    }

    #[cfg(feature = "parallel")]
    pbar.finish_with_message(format!("{} documents", accepted_total));

    url_table
        .write_json(&index_dir.join("urls.json"))
        .map_err(|source| BuildError::Write {
            path: index_dir.join("urls.json"),
            source,
        })?;
    file_table
        .write_json(&index_dir.join("files.json"))
        .map_err(|source| BuildError::Write {
            path: index_dir.join("files.json"),
            source,
        })?;
    ids::write_doc_file_map(&index_dir.join("doc_files.json"), &doc_file_ids).map_err(|source| {
        BuildError::Write {
            path: index_dir.join("doc_files.json"),
            source,
        }
    })?;

    tracing::info!(partials = partials.len(), "merging partial indexes");
    let term_count = merge::merge_partials(index_dir, &partials, accepted_total)?;

    Ok(BuildSummary {
        document_count: accepted_total,
        file_count: file_table.len() as u32,
        term_count,
        skipped_duplicates,
    })
}

#[allow(clippy::too_many_arguments)]
fn flush_batch(
    records: Vec<RawRecord>,
    partial_index: usize,
    index_dir: &Path,
    tokenizer: &Tokenizer,
    dedup: &mut DuplicateFilter,
    url_table: &mut IdTable,
    file_table: &mut IdTable,
    doc_file_ids: &mut Vec<u32>,
    partials: &mut Vec<PartialIndex>,
    skipped_duplicates: &mut u64,
) -> Result<u32, BuildError> {
    let mut accepted_records = Vec::with_capacity(records.len());
    let mut accepted_raw = Vec::with_capacity(records.len());

    for record in records {
        let canonical_url = crate::dedup::canonicalize_url(&record.url);
        if !dedup.accept(&canonical_url, &record.content) {
            *skipped_duplicates += 1;
            continue;
        }
        accepted_raw.push(record.clone());
        accepted_records.push((canonical_url, record.file_name));
    }

    if accepted_records.is_empty() {
        return Ok(0);
    }

    let term_maps = parallel::tokenize_batch(&accepted_raw, tokenizer);
    let accepted = accepted_records.len() as u32;

    let batch_records: Vec<BatchRecord> = accepted_records
        .into_iter()
        .zip(term_maps)
        .map(|((canonical_url, file_name), terms)| BatchRecord {
            canonical_url,
            file_name,
            terms,
        })
        .collect();

    let partial = write_partial_index(
        index_dir,
        partial_index,
        batch_records,
        url_table,
        file_table,
        doc_file_ids,
    )?;
    partials.push(partial);
    Ok(accepted)
}
