//! End-to-end build scenarios S1-S4.
//!
//! Stemmed term spellings aren't hardcoded here: `rust-stemmers`'
//! `Algorithm::English` is Snowball/Porter2, not the classic Porter
//! algorithm the spec's prose examples were written against (e.g.
//! "this" stems to "thi" under classic Porter but stays "this" under
//! Porter2 - see `SPEC_FULL.md` 4.1). Each assertion derives the expected
//! stem through [`ferretdex::tokenize::Tokenizer`] itself, so these tests
//! hold regardless of which Porter-family algorithm backs the tokenizer.

use ferretdex::reader::IndexReader;
use ferretdex::tokenize::Tokenizer;
use ferretdex::types::DocId;

use crate::common::build_corpus;

fn stem(word: &str) -> String {
    Tokenizer::new().base_tokens(word).remove(0)
}

/// S1 - trivial two-document corpus: id assignment, and normalized TF for
/// a term unique to one document and a term shared by both.
#[test]
fn trivial_corpus_assigns_ids_and_normalizes_tf() {
    let (_dir, _archive, index_dir) = build_corpus(&[
        ("u1", "<p>This is a test.</p>"),
        ("u2", "<p>This is only a test.</p>"),
    ]);

    let mut reader = IndexReader::open(&index_dir, None, 100).unwrap();
    assert_eq!(reader.url_for(DocId(0)).as_deref(), Some("u1"));
    assert_eq!(reader.url_for(DocId(1)).as_deref(), Some("u2"));

    let only_term = stem("only");
    let only_postings = reader.postings_for_term(&only_term);
    assert_eq!(only_postings.len(), 1);
    assert_eq!(only_postings[0].doc_id, DocId(1));
    assert!((only_postings[0].tf - 0.2).abs() < 1e-6);

    let this_term = stem("this");
    let this_postings = reader.postings_for_term(&this_term);
    assert_eq!(this_postings.len(), 2);
    let tf_for = |doc_id: DocId| {
        this_postings
            .iter()
            .find(|p| p.doc_id == doc_id)
            .map(|p| p.tf)
            .unwrap()
    };
    assert!((tf_for(DocId(0)) - 0.25).abs() < 1e-6);
    assert!((tf_for(DocId(1)) - 0.2).abs() < 1e-6);
}

/// S2 - two records whose URLs differ only by fragment, same content:
/// only the first is indexed.
#[test]
fn fragment_only_difference_is_deduplicated() {
    let (_dir, _archive, index_dir) = build_corpus(&[
        ("https://x/a", "<p>shared content across both records</p>"),
        ("https://x/a#top", "<p>shared content across both records</p>"),
    ]);

    let reader = IndexReader::open(&index_dir, None, 100).unwrap();
    assert_eq!(reader.document_count(), 1);
    assert_eq!(reader.url_for(DocId(0)).as_deref(), Some("https://x/a"));
}

/// S3 - two distinct URLs whose content differs only in whitespace: the
/// SimHash near-duplicate filter suppresses the second under the default
/// threshold.
#[test]
fn whitespace_only_difference_is_simhash_deduplicated() {
    let (_dir, _archive, index_dir) = build_corpus(&[
        (
            "https://a.com/one",
            "<p>the quick brown fox jumps over the lazy dog today</p>",
        ),
        (
            "https://b.com/two",
            "<p>the   quick brown   fox jumps over the lazy   dog today</p>",
        ),
    ]);

    let reader = IndexReader::open(&index_dir, None, 100).unwrap();
    assert_eq!(reader.document_count(), 1);
}

/// S4 - a weighted tag (`h1`) contributes extra repetitions of its token
/// on top of the base occurrence, raising that term's TF relative to a
/// document with no weighted tags.
#[test]
fn weighted_tag_raises_term_frequency() {
    let (_dir, _archive, index_dir) = build_corpus(&[("u1", "<h1>alpha</h1><p>alpha</p>")]);

    let mut reader = IndexReader::open(&index_dir, None, 100).unwrap();
    let alpha_term = stem("alpha");
    let postings = reader.postings_for_term(&alpha_term);
    assert_eq!(postings.len(), 1);
    // raw count 4 (h1 weight) + 1 (base) = 5, over 5 total tokens -> tf 1.0
    assert!((postings[0].tf - 1.0).abs() < 1e-6);
}
