// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Dense, monotonically growing id tables for URLs and archive member names.
//!
//! `doc_id` and `file_id` are independent id spaces: every accepted
//! document gets a fresh `doc_id`, but several documents can share a
//! `file_id` when they come from the same archive member (one `.json`
//! file can hold many line-delimited records). Both tables persist as
//! `{"0": "...", "1": "..."}` JSON, stringified-integer keys, matching
//! `urls.json`/`files.json`.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

/// A bidirectional string <-> dense-id table, ids assigned in first-seen order.
#[derive(Debug, Default)]
pub struct IdTable {
    forward: Vec<String>,
    index: HashMap<String, u32>,
}

impl IdTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `value`, assigning the next sequential id if this
    /// is the first time `value` has been seen.
    pub fn intern(&mut self, value: &str) -> u32 {
        if let Some(&id) = self.index.get(value) {
            return id;
        }
        let id = self.forward.len() as u32;
        self.forward.push(value.to_string());
        self.index.insert(value.to_string(), id);
        id
    }

    pub fn get(&self, id: u32) -> Option<&str> {
        self.forward.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let map: BTreeMap<String, &str> = self
            .forward
            .iter()
            .enumerate()
            .map(|(i, s)| (i.to_string(), s.as_str()))
            .collect();
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), &map)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }

    pub fn read_json(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let map: BTreeMap<String, String> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut forward = vec![String::new(); map.len()];
        let mut index = HashMap::with_capacity(map.len());
        for (key, value) in map {
            let id: usize = key
                .parse()
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "non-numeric id key"))?;
            if id >= forward.len() {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "id out of range"));
            }
            forward[id] = value.clone();
            index.insert(value, id as u32);
        }
        Ok(Self { forward, index })
    }
}

/// Persist the dense `doc_id -> file_id` map (`doc_files.json`) that lets
/// `document_text_for` find which archive member a document came from.
/// Not one of the id tables above - it's a join between them, built
/// incrementally as the batch indexer interns each accepted record, one
/// entry per `doc_id` in order, so `entries[doc_id] == file_id` always
/// holds without needing to store the key explicitly.
pub fn write_doc_file_map(path: &Path, entries: &[u32]) -> io::Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), entries)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

pub fn read_doc_file_map(path: &Path) -> io::Result<Vec<u32>> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_file_map_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc_files.json");
        write_doc_file_map(&path, &[0, 0, 1, 2]).unwrap();
        let loaded = read_doc_file_map(&path).unwrap();
        assert_eq!(loaded, vec![0, 0, 1, 2]);
    }

    #[test]
    fn intern_assigns_sequential_ids() {
        let mut table = IdTable::new();
        assert_eq!(table.intern("https://a.com"), 0);
        assert_eq!(table.intern("https://b.com"), 1);
        assert_eq!(table.intern("https://a.com"), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.json");

        let mut table = IdTable::new();
        table.intern("https://a.com");
        table.intern("https://b.com");
        table.write_json(&path).unwrap();

        let loaded = IdTable::read_json(&path).unwrap();
        assert_eq!(loaded.get(0), Some("https://a.com"));
        assert_eq!(loaded.get(1), Some("https://b.com"));
        assert_eq!(loaded.len(), 2);
    }
}
