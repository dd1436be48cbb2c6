//! S5 - conjunctive AND short-circuits on a zero-document-frequency term.

use ferretdex::query::QueryProcessor;
use ferretdex::reader::IndexReader;
use ferretdex::search::SearchEngine;
use ferretdex::tokenize::Tokenizer;

use crate::common::build_corpus;

#[test]
fn and_query_with_a_zero_df_term_returns_empty() {
    let (_dir, _archive, index_dir) = build_corpus(&[
        ("u1", "<p>common words appear in this document</p>"),
        ("u2", "<p>common words appear in that document</p>"),
    ]);

    let mut engine = SearchEngine::open(&index_dir, None).unwrap();
    let results = engine.search("zzznonexistentterm common", 0, 10);
    assert!(results.is_empty());
}

/// S5, stronger form: a zero-df term must short-circuit *before* any
/// other term's postings are fetched from disk at all - not just before
/// the intersection runs. If `common`'s postings were seeked and decoded
/// en route to discovering `rare` has df=0, they'd end up in the LRU even
/// though the AND result is empty; this asserts they never do.
#[test]
fn and_query_with_a_zero_df_term_never_reads_the_other_terms_postings() {
    let (_dir, _archive, index_dir) = build_corpus(&[
        ("u1", "<p>common words appear in this document</p>"),
        ("u2", "<p>common words appear in that document</p>"),
    ]);

    let mut reader = IndexReader::open(&index_dir, None, 100).unwrap();
    let tokenizer = Tokenizer::new();
    let qp = QueryProcessor::new(&tokenizer);

    let terms = qp.tokenize("zzznonexistentterm common");
    assert!(qp.and_retrieve(&mut reader, &terms).is_empty());
    assert!(!reader.is_term_cached("common"), "common's postings were fetched even though the other query term had df=0");
}

#[test]
fn and_query_requires_all_terms_present() {
    let (_dir, _archive, index_dir) = build_corpus(&[
        ("u1", "<p>alpha beta gamma</p>"),
        ("u2", "<p>alpha beta</p>"),
    ]);

    let mut engine = SearchEngine::open(&index_dir, None).unwrap();
    let results = engine.search("alpha gamma", 0, 10);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, "u1");
}
