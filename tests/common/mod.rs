//! Shared test fixtures: a tiny in-memory zip corpus builder and a
//! one-call build-and-open helper, used across the build/search/property
//! integration suites.

#![allow(dead_code)]

use std::io::Write as _;
use std::path::{Path, PathBuf};

use ferretdex::build::run_build;
use ferretdex::search::SearchEngine;

/// Write a zip archive at `path` whose members are `(name, content)`.
pub fn write_fixture_zip(path: &Path, members: &[(&str, &str)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();
    for (name, content) in members {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

/// Build a single-member `docs.json` archive from `(url, html)` pairs and
/// run a full build into a fresh index directory. Returns the `TempDir`
/// (keep it alive for the test's duration), the archive path, and the
/// index directory.
pub fn build_corpus(records: &[(&str, &str)]) -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("corpus.zip");

    let body: String = records
        .iter()
        .map(|(url, content)| {
            format!(
                "{{\"url\":{},\"content\":{}}}\n",
                serde_json::to_string(url).unwrap(),
                serde_json::to_string(content).unwrap(),
            )
        })
        .collect();
    write_fixture_zip(&archive_path, &[("docs.json", &body)]);

    let index_dir = dir.path().join("index");
    run_build(&archive_path, &index_dir).unwrap();
    (dir, archive_path, index_dir)
}

/// Like [`build_corpus`] but also opens a [`SearchEngine`] against the
/// freshly built index.
pub fn build_and_open(records: &[(&str, &str)]) -> (tempfile::TempDir, SearchEngine) {
    let (dir, _archive, index_dir) = build_corpus(records);
    let engine = SearchEngine::open(&index_dir, None).unwrap();
    (dir, engine)
}
