// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! External k-way merge of sorted partial indexes into the final index.
//!
//! Each partial's postings are already sorted by term; the merge reads
//! one term record at a time from every partial, keyed into a min-heap by
//! `(term, run_index)`, and pops them in global term order. Runs tied on
//! the same term are concatenated in ascending run index, which preserves
//! ascending `doc_id` order within the merged posting list since batches
//! (and therefore runs) are processed, and their doc ids assigned, in
//! strictly increasing order.
//!
//! Interrupting a merge loses all partials: there is no merge checkpoint,
//! matching spec's "restart from scratch" contract.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::binary::header::FileKind;
use crate::binary::{read_term_record, write_offsets, FileHeader, PostingsWriter};
use crate::error::BuildError;
use crate::types::Posting;

use super::batch::PartialIndex;

struct Run {
    reader: BufReader<File>,
    remaining: u32,
}

fn merge_err(path: &Path, e: std::io::Error) -> BuildError {
    BuildError::Merge(format!("{}: {e}", path.display()))
}

/// Merge `partials` (already-sorted, one per batch) into `postings.bin` /
/// `offsets.bin` under `index_dir`, then delete the partials. Returns the
/// number of distinct terms in the merged index.
pub fn merge_partials(
    index_dir: &Path,
    partials: &[PartialIndex],
    doc_count: u32,
) -> Result<u32, BuildError> {
    let mut runs = Vec::with_capacity(partials.len());
    for partial in partials {
        let file = File::open(&partial.postings_path)
            .map_err(|e| merge_err(&partial.postings_path, e))?;
        let mut reader = BufReader::new(file);
        let header = FileHeader::read(&mut reader, FileKind::Postings)
            .map_err(|e| merge_err(&partial.postings_path, e))?;
        runs.push(Run {
            reader,
            remaining: header.term_count,
        });
    }

    let mut pending: Vec<Option<(String, Vec<Posting>)>> = vec![None; runs.len()];
    let mut heap: BinaryHeap<Reverse<(String, usize)>> = BinaryHeap::new();

    for (i, run) in runs.iter_mut().enumerate() {
        if run.remaining > 0 {
            let (term, postings) = read_term_record(&mut run.reader)
                .map_err(|e| BuildError::Merge(format!("corrupt partial record: {e}")))?;
            run.remaining -= 1;
            heap.push(Reverse((term.clone(), i)));
            pending[i] = Some((term, postings));
        }
    }

    let mut merged_terms: Vec<(String, Vec<Posting>)> = Vec::new();

    while let Some(Reverse((term, run_idx))) = heap.pop() {
        let (_, postings) = pending[run_idx]
            .take()
            .expect("heap entry must have a pending record");

        match merged_terms.last_mut() {
            Some((last_term, last_postings)) if *last_term == term => {
                last_postings.extend(postings);
            }
            _ => merged_terms.push((term, postings)),
        }

        let run = &mut runs[run_idx];
        if run.remaining > 0 {
            let (next_term, next_postings) = read_term_record(&mut run.reader)
                .map_err(|e| BuildError::Merge(format!("corrupt partial record: {e}")))?;
            run.remaining -= 1;
            heap.push(Reverse((next_term.clone(), run_idx)));
            pending[run_idx] = Some((next_term, next_postings));
        }
    }

    let postings_path = index_dir.join("postings.bin");
    let offsets_path = index_dir.join("offsets.bin");

    let file = File::create(&postings_path).map_err(|e| merge_err(&postings_path, e))?;
    let mut writer = PostingsWriter::new(
        BufWriter::new(file),
        doc_count,
        merged_terms.len() as u32,
    )
    .map_err(|e| merge_err(&postings_path, e))?;

    let mut offset_entries = Vec::with_capacity(merged_terms.len());
    for (term, postings) in &merged_terms {
        let offset = writer
            .write_term(term, postings)
            .map_err(|e| merge_err(&postings_path, e))?;
        offset_entries.push((term.clone(), offset));
    }
    writer.finish().map_err(|e| merge_err(&postings_path, e))?;

    let offsets_file = File::create(&offsets_path).map_err(|e| merge_err(&offsets_path, e))?;
    write_offsets(BufWriter::new(offsets_file), doc_count, &offset_entries)
        .map_err(|e| merge_err(&offsets_path, e))?;

    for partial in partials {
        let _ = fs::remove_file(&partial.postings_path);
        let _ = fs::remove_file(&partial.offsets_path);
    }

    Ok(merged_terms.len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::batch::{write_partial_index, BatchRecord};
    use crate::build::ids::IdTable;
    use crate::binary::read_offsets;

    fn record(url: &str, file: &str, terms: &[(&str, f32)]) -> BatchRecord {
        BatchRecord {
            canonical_url: url.to_string(),
            file_name: file.to_string(),
            terms: terms.iter().map(|&(t, tf)| (t.to_string(), tf)).collect(),
        }
    }

    #[test]
    fn merges_two_partials_preserving_doc_id_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut urls = IdTable::new();
        let mut files = IdTable::new();
        let mut doc_file_ids = Vec::new();

        let batch_a = vec![record("https://a.com", "a.json", &[("rust", 0.5)])];
        let batch_b = vec![record("https://b.com", "b.json", &[("rust", 0.8)])];

        let partial_a =
            write_partial_index(dir.path(), 0, batch_a, &mut urls, &mut files, &mut doc_file_ids).unwrap();
        let partial_b =
            write_partial_index(dir.path(), 1, batch_b, &mut urls, &mut files, &mut doc_file_ids).unwrap();

        let term_count =
            merge_partials(dir.path(), &[partial_a, partial_b], urls.len() as u32).unwrap();
        assert_eq!(term_count, 1);

        let postings_path = dir.path().join("postings.bin");
        let offsets_path = dir.path().join("offsets.bin");
        assert!(postings_path.exists());
        assert!(offsets_path.exists());

        let offset_map = read_offsets(File::open(&offsets_path).unwrap()).unwrap();
        let offset = *offset_map.get("rust").unwrap();

        let mut reader = BufReader::new(File::open(&postings_path).unwrap());
        use std::io::Seek;
        reader.seek(std::io::SeekFrom::Start(offset)).unwrap();
        let (term, postings) = read_term_record(&mut reader).unwrap();
        assert_eq!(term, "rust");
        assert_eq!(postings.len(), 2);
        assert!(postings[0].doc_id.get() < postings[1].doc_id.get());
    }

    #[test]
    fn deletes_partials_after_merge() {
        let dir = tempfile::tempdir().unwrap();
        let mut urls = IdTable::new();
        let mut files = IdTable::new();
        let mut doc_file_ids = Vec::new();
        let batch = vec![record("https://a.com", "a.json", &[("x", 1.0)])];
        let partial =
            write_partial_index(dir.path(), 0, batch, &mut urls, &mut files, &mut doc_file_ids).unwrap();

        assert!(partial.postings_path.exists());
        merge_partials(dir.path(), &[partial], urls.len() as u32).unwrap();

        let remaining: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|name| name.starts_with("partial-"))
            .collect();
        assert!(remaining.is_empty());
    }
}
