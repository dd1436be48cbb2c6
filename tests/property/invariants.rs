//! Property-based invariants from spec.md §8.
//!
//! Each build in this suite does real file I/O (a zip archive, a temp
//! index directory), so case counts are kept modest relative to a
//! pure-in-memory property suite.

use std::collections::HashSet;

use proptest::prelude::*;

use ferretdex::dedup::canonicalize_url;
use ferretdex::reader::IndexReader;
use ferretdex::search::SearchEngine;
use ferretdex::tokenize::Tokenizer;
use ferretdex::types::DocId;

use crate::common::build_corpus;

fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{3,8}").unwrap()
}

fn doc_text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 1..6).prop_map(|words| words.join(" "))
}

fn corpus_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(doc_text_strategy(), 1..5)
}

fn html_strategy() -> impl Strategy<Value = String> {
    doc_text_strategy().prop_map(|text| format!("<p>{text}</p>"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Invariant 2 - canonicalization is idempotent.
    #[test]
    fn canonicalization_is_idempotent(url in "[a-z0-9/:.#]{1,40}") {
        let once = canonicalize_url(&url);
        let twice = canonicalize_url(&once);
        prop_assert_eq!(once, twice);
    }

    /// Invariant 3 - tokenizing the same document twice (in-process)
    /// produces identical output.
    #[test]
    fn tokenization_is_deterministic(html in html_strategy()) {
        let tok = Tokenizer::new();
        let first = tok.tokenize_document(&html);
        let second = tok.tokenize_document(&html);
        prop_assert_eq!(first, second);
    }

    /// Invariant 4 - a document's normalized term frequencies sum to 1,
    /// or the map is empty.
    #[test]
    fn normalized_tf_sums_to_one(html in html_strategy()) {
        let tok = Tokenizer::new();
        let freqs = tok.tokenize_document(&html);
        if freqs.is_empty() {
            prop_assert!(html.chars().filter(|c| c.is_ascii_alphanumeric()).count() == 0);
        } else {
            let total: f32 = freqs.values().sum();
            prop_assert!((total - 1.0).abs() < 1e-4, "tf sum was {total}");
        }
    }

    /// Invariant 1 - after a build over N accepted documents, doc ids are
    /// exactly {0, ..., N-1} and every id resolves to a distinct URL.
    #[test]
    fn doc_ids_are_dense_and_injective(texts in corpus_strategy()) {
        let records: Vec<(String, String)> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| (format!("https://example.com/doc/{i}"), format!("<p>{text}</p>")))
            .collect();
        let borrowed: Vec<(&str, &str)> = records.iter().map(|(u, c)| (u.as_str(), c.as_str())).collect();

        let (_dir, _archive, index_dir) = build_corpus(&borrowed);
        let reader = IndexReader::open(&index_dir, None, 100).unwrap();

        let n = reader.document_count();
        prop_assert_eq!(n as usize, texts.len(), "no fragment/simhash collisions expected here - URLs are distinct and content is index-suffixed");

        let mut seen = HashSet::new();
        for i in 0..n {
            let url = reader.url_for(DocId(i)).expect("every id in 0..N must resolve");
            prop_assert!(seen.insert(url), "doc id {i} duplicated a URL");
        }
    }

    /// Invariants 5 & 6 - every term a document's tokenizer actually
    /// produces is present in the final index, and its postings list has
    /// no duplicate doc id.
    #[test]
    fn every_produced_term_is_indexed_without_duplicate_postings(texts in corpus_strategy()) {
        let records: Vec<(String, String)> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| (format!("https://example.com/doc/{i}"), format!("<p>{text}</p>")))
            .collect();
        let borrowed: Vec<(&str, &str)> = records.iter().map(|(u, c)| (u.as_str(), c.as_str())).collect();

        let (_dir, _archive, index_dir) = build_corpus(&borrowed);
        let mut reader = IndexReader::open(&index_dir, None, 100).unwrap();
        prop_assume!(reader.document_count() as usize == texts.len());

        let tok = Tokenizer::new();
        for (_, content) in &records {
            for term in tok.tokenize_document(content).keys() {
                prop_assert!(reader.has_term(term), "term {term} missing from offset map");
                let postings = reader.postings_for_term(term);
                prop_assert!(!postings.is_empty());
                let ids: HashSet<DocId> = postings.iter().map(|p| p.doc_id).collect();
                prop_assert_eq!(ids.len(), postings.len(), "duplicate doc_id in postings for {term}");
            }
        }
    }

    /// Invariant 7 - AND retrieval is monotonic: adding a query term can
    /// only shrink (or leave unchanged) the result set, and the result
    /// for a longer query is always a subset of the shorter one's.
    #[test]
    fn and_retrieval_is_monotonic(texts in corpus_strategy(), extra in word_strategy()) {
        let records: Vec<(String, String)> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| (format!("https://example.com/doc/{i}"), format!("<p>{text} {extra}</p>")))
            .collect();
        let borrowed: Vec<(&str, &str)> = records.iter().map(|(u, c)| (u.as_str(), c.as_str())).collect();

        let (_dir, _archive, index_dir) = build_corpus(&borrowed);
        let mut engine = SearchEngine::open(&index_dir, None).unwrap();

        let Some(first_word) = texts.first().and_then(|t| t.split_whitespace().next()) else {
            return Ok(());
        };

        let narrow = engine.search(first_word, 0, usize::MAX);
        let wide = engine.search(&format!("{first_word} {extra}"), 0, usize::MAX);
        prop_assert!(wide.len() <= narrow.len());
        let narrow_urls: HashSet<&str> = narrow.iter().map(|d| d.url.as_str()).collect();
        for doc in &wide {
            prop_assert!(narrow_urls.contains(doc.url.as_str()));
        }
    }

    /// Invariant 9 - cache transparency: the LRU's capacity never changes
    /// what a lookup returns, only how many seeks it costs.
    #[test]
    fn cache_capacity_does_not_change_results(texts in corpus_strategy()) {
        let records: Vec<(String, String)> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| (format!("https://example.com/doc/{i}"), format!("<p>{text}</p>")))
            .collect();
        let borrowed: Vec<(&str, &str)> = records.iter().map(|(u, c)| (u.as_str(), c.as_str())).collect();

        let (_dir, _archive, index_dir) = build_corpus(&borrowed);
        let mut cold = IndexReader::open(&index_dir, None, 1).unwrap();
        let mut warm = IndexReader::open(&index_dir, None, 10_000).unwrap();

        let tok = Tokenizer::new();
        for (_, content) in &records {
            for term in tok.tokenize_document(content).keys() {
                let from_cold = cold.postings_for_term(term);
                let from_warm = warm.postings_for_term(term);
                prop_assert_eq!(from_cold.len(), from_warm.len());
            }
        }
    }
}
