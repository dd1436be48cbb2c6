// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Streaming corpus archive reader.
//!
//! The core only needs one capability from an archive: "give me the next
//! `(url, html)` record, or tell me there are no more." `CorpusSource` is
//! that seam; `ZipCorpus` is the minimum concrete implementation needed to
//! drive the builder end-to-end from a real archive. It walks `.json`-suffixed
//! members in a stable, sorted order and parses each as line-delimited JSON
//! objects with `url` and `content` fields. Malformed lines are skipped with
//! a warning rather than aborting the build - only a bad archive (can't be
//! opened, isn't a zip at all) is fatal.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::error::BuildError;

/// One document as handed to the builder: its source URL, the archive
/// member it came from (used for `document_text_for` lookups later), and
/// its raw HTML/text content.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub url: String,
    pub file_name: String,
    pub content: String,
}

/// A streaming source of corpus records.
pub trait CorpusSource {
    /// Return the next record, or `None` once the archive is exhausted.
    /// Malformed individual records are skipped internally and never
    /// surface here; only I/O errors on the archive itself propagate.
    fn next_record(&mut self) -> std::io::Result<Option<RawRecord>>;
}

#[derive(Deserialize)]
struct JsonLine {
    url: String,
    content: String,
}

/// Reads a zip archive whose `.json`-suffixed members each contain one JSON
/// object per line.
pub struct ZipCorpus {
    archive: zip::ZipArchive<BufReader<File>>,
    member_names: Vec<String>,
    member_idx: usize,
    pending: VecDeque<(String, String)>, // (file_name, json_line)
}

impl ZipCorpus {
    pub fn open(path: &Path) -> Result<Self, BuildError> {
        let file = File::open(path).map_err(|source| BuildError::Corpus {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let archive = zip::ZipArchive::new(reader).map_err(|source| BuildError::InvalidArchive {
            path: path.to_path_buf(),
            source,
        })?;

        let mut member_names: Vec<String> = archive
            .file_names()
            .filter(|name| name.ends_with(".json"))
            .map(str::to_string)
            .collect();
        member_names.sort();

        Ok(Self {
            archive,
            member_names,
            member_idx: 0,
            pending: VecDeque::new(),
        })
    }

    fn advance_member(&mut self) -> std::io::Result<bool> {
        while self.member_idx < self.member_names.len() {
            let name = self.member_names[self.member_idx].clone();
            self.member_idx += 1;

            let mut entry = match self.archive.by_name(&name) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(member = %name, error = %e, "failed to open archive member");
                    continue;
                }
            };
            let mut contents = String::new();
            if let Err(e) = entry.read_to_string(&mut contents) {
                tracing::warn!(member = %name, error = %e, "failed to read archive member");
                continue;
            }

            let lines: Vec<(String, String)> = contents
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| (name.clone(), line.to_string()))
                .collect();
            if lines.is_empty() {
                continue;
            }
            self.pending.extend(lines);
            return Ok(true);
        }
        Ok(false)
    }
}

impl CorpusSource for ZipCorpus {
    fn next_record(&mut self) -> std::io::Result<Option<RawRecord>> {
        loop {
            if let Some((file_name, line)) = self.pending.pop_front() {
                match serde_json::from_str::<JsonLine>(&line) {
                    Ok(parsed) => {
                        return Ok(Some(RawRecord {
                            url: parsed.url,
                            file_name,
                            content: parsed.content,
                        }));
                    }
                    Err(e) => {
                        tracing::warn!(member = %file_name, error = %e, "skipping malformed record");
                        continue;
                    }
                }
            }
            if !self.advance_member()? {
                return Ok(None);
            }
        }
    }
}
