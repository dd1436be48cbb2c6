//! S6 - ranking order: a document missing a query term ranks below one
//! that contains every term, and among documents that contain every
//! term, higher cumulative TF-IDF mass ranks first.

use crate::common::build_corpus;
use ferretdex::search::SearchEngine;

#[test]
fn document_missing_a_query_term_ranks_last() {
    let (_dir, _archive, index_dir) = build_corpus(&[
        ("u1", "<p>This is a test.</p>"),
        ("u2", "<p>This is only a test.</p>"),
    ]);

    let mut engine = SearchEngine::open(&index_dir, None).unwrap();
    let results = engine.search("test only", 0, 10);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, "u2");
}

#[test]
fn denser_match_ranks_above_sparser_match() {
    let (_dir, _archive, index_dir) = build_corpus(&[
        ("u1", "<p>rust programming language rust rust</p>"),
        ("u2", "<p>rust programming tutorial</p>"),
    ]);

    let mut engine = SearchEngine::open(&index_dir, None).unwrap();
    let results = engine.search("rust programming", 0, 10);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].url, "u1");
    assert!(results[0].score > results[1].score);
}
