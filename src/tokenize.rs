// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Turns raw document HTML (or a bare query string) into stemmed terms.
//!
//! Ingestion and query tokenization share the same base-token extraction
//! function (`extract_words` + stemming), which is what makes postings
//! built at index time comparable against query terms at search time -
//! if the two ever drifted, every query would silently miss matches.
//!
//! Document tokenization additionally gives extra weight to structurally
//! important tags (`h1`, `h2`, `h3`, `b`, `strong`) by re-extracting their
//! text and repeating each stemmed token `floor(weight)` times before the
//! per-document term frequency is normalized.

use std::collections::HashMap;

use rust_stemmers::{Algorithm, Stemmer};
use scraper::Html;

/// (tag name, repetition weight), checked in this order.
const WEIGHTED_TAGS: &[(&str, f32)] = &[
    ("h1", 4.0),
    ("h2", 3.0),
    ("h3", 2.0),
    ("b", 1.5),
    ("strong", 1.5),
];

pub struct Tokenizer {
    stemmer: Stemmer,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Extract, lowercase, and stem the alphanumeric runs in `text`. This is
    /// the only tokenization step queries go through - there is no weighting
    /// step for queries since a query has no HTML structure.
    pub fn base_tokens(&self, text: &str) -> Vec<String> {
        extract_words(text)
            .into_iter()
            .map(|w| self.stemmer.stem(&w).into_owned())
            .collect()
    }

    /// Tokenize a search query the same way a document's body text is
    /// tokenized (step 3 only, no weighting).
    pub fn tokenize_query(&self, query: &str) -> Vec<String> {
        self.base_tokens(query)
    }

    /// Tokenize one document's HTML into a normalized term -> frequency map.
    ///
    /// The multiset is: one occurrence per base token in the visible text,
    /// plus `floor(weight)` extra occurrences per stemmed token found inside
    /// each weighted tag. The result is normalized so the frequencies sum to
    /// 1 (or the map is empty, for documents with no extractable tokens).
    pub fn tokenize_document(&self, html: &str) -> HashMap<String, f32> {
        let fragment = Html::parse_document(html);
        let visible_text = visible_text_of(&fragment);

        let mut counts: HashMap<String, u32> = HashMap::new();
        for token in self.base_tokens(&visible_text) {
            *counts.entry(token).or_insert(0) += 1;
        }

        for &(tag, weight) in WEIGHTED_TAGS {
            let selector = match scraper::Selector::parse(tag) {
                Ok(s) => s,
                Err(_) => continue,
            };
            let repeat = weight.floor() as u32;
            if repeat == 0 {
                continue;
            }
            for element in fragment.select(&selector) {
                let tag_text = element.text().collect::<Vec<_>>().join(" ");
                for token in self.base_tokens(&tag_text) {
                    *counts.entry(token).or_insert(0) += repeat;
                }
            }
        }

        let total: u32 = counts.values().sum();
        if total == 0 {
            return HashMap::new();
        }
        counts
            .into_iter()
            .map(|(term, count)| (term, count as f32 / total as f32))
            .collect()
    }
}

/// Strip HTML down to its concatenated visible text. Shared by document
/// tokenization and `document_text_for` (the summarizer's content seam) so
/// both see the exact same notion of "the text of this document" - parsing
/// is lenient by construction (`scraper`/`html5ever` never fails to parse;
/// malformed markup degrades to whatever structure it can recover rather
/// than erroring), which is what satisfies the "parse failure falls back to
/// plain text" contract without a separate code path.
pub fn visible_text_of(fragment: &Html) -> String {
    fragment.root_element().text().collect::<Vec<_>>().join(" ")
}

/// Strip HTML tags from a raw document, returning its visible text.
pub fn strip_html(html: &str) -> String {
    visible_text_of(&Html::parse_document(html))
}

/// Extract maximal runs of ASCII alphanumerics, lowercased.
///
/// Mirrors `RegexpTokenizer(r'[A-Za-z0-9]+')` without pulling in a regex
/// engine for a pattern this simple - a single pass over the bytes.
fn extract_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            current.push(c.to_ascii_lowercase());
        } else if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
