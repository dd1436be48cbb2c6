// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Batch indexer: turns one batch of tokenized documents into a sorted
//! partial index on disk.
//!
//! A batch arrives as `(canonical_url, archive_file_name, term -> tf)`
//! triples. Each document is interned into the URL and file id tables,
//! then every term's postings accumulate into an in-memory map (ordered,
//! so the partial file is written in ascending lexicographic term order
//! without a separate sort pass). The partial's offset map is written
//! alongside it so the merge step could consult per-partial offsets if it
//! ever needed random access - in practice the merge reads each partial
//! sequentially, but writing the sidecar keeps every on-disk partial
//! self-describing.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::binary::{write_offsets, PostingsWriter};
use crate::error::BuildError;
use crate::types::{DocId, Posting};

use super::ids::IdTable;

/// One accepted document ready to be folded into a partial index.
pub struct BatchRecord {
    pub canonical_url: String,
    pub file_name: String,
    pub terms: HashMap<String, f32>,
}

/// A partial index's two artifact paths, kept together so the merge step
/// can open and later delete both.
pub struct PartialIndex {
    pub postings_path: PathBuf,
    pub offsets_path: PathBuf,
}

fn io_err(path: &Path, source: std::io::Error) -> BuildError {
    BuildError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Write one batch's records as a sorted partial index, interning URLs
/// and file names into `url_table`/`file_table` as a side effect, and
/// appending each new document's `file_id` to `doc_file_ids` (index ==
/// `doc_id`, by construction - see `ids::write_doc_file_map`).
pub fn write_partial_index(
    index_dir: &Path,
    partial_index: usize,
    records: Vec<BatchRecord>,
    url_table: &mut IdTable,
    file_table: &mut IdTable,
    doc_file_ids: &mut Vec<u32>,
) -> Result<PartialIndex, BuildError> {
    let doc_count = records.len() as u32;
    let mut term_postings: BTreeMap<String, Vec<Posting>> = BTreeMap::new();

    for record in records {
        let doc_id = DocId(url_table.intern(&record.canonical_url));
        let file_id = file_table.intern(&record.file_name);
        doc_file_ids.push(file_id);
        for (term, tf) in record.terms {
            term_postings
                .entry(term)
                .or_insert_with(Vec::new)
                .push(Posting { doc_id, tf });
        }
    }

    let postings_path = index_dir.join(format!("partial-{partial_index:05}.postings.bin"));
    let offsets_path = index_dir.join(format!("partial-{partial_index:05}.offsets.bin"));

    let file = File::create(&postings_path).map_err(|e| io_err(&postings_path, e))?;
    let mut writer = PostingsWriter::new(
        BufWriter::new(file),
        doc_count,
        term_postings.len() as u32,
    )
    .map_err(|e| io_err(&postings_path, e))?;

    let mut offset_entries = Vec::with_capacity(term_postings.len());
    for (term, postings) in &term_postings {
        let offset = writer
            .write_term(term, postings)
            .map_err(|e| io_err(&postings_path, e))?;
        offset_entries.push((term.clone(), offset));
    }
    writer.finish().map_err(|e| io_err(&postings_path, e))?;

    let offsets_file = File::create(&offsets_path).map_err(|e| io_err(&offsets_path, e))?;
    write_offsets(BufWriter::new(offsets_file), doc_count, &offset_entries)
        .map_err(|e| io_err(&offsets_path, e))?;

    Ok(PartialIndex {
        postings_path,
        offsets_path,
    })
}
