// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! URL canonicalization and near-duplicate detection.
//!
//! Two documents are considered the same for indexing purposes if their
//! canonical URLs collide, or if their raw text is within a small Hamming
//! distance of a previously accepted document's SimHash fingerprint.
//! Acceptance is order-dependent: documents are accepted or rejected in
//! the order the corpus hands them over, and a rejected document never
//! becomes a comparison point for later ones.

use std::collections::HashSet;

/// Strip the fragment (`#...`) from a URL. This is the entire
/// canonicalization step - no scheme/host normalization, no query
/// reordering, matching `urldefrag()` in the system this was ported from.
pub fn canonicalize_url(url: &str) -> String {
    match url.find('#') {
        Some(idx) => url[..idx].to_string(),
        None => url.to_string(),
    }
}

/// Compute a 64-bit SimHash fingerprint over whitespace-split raw tokens.
///
/// Each token contributes its hash's bits, weighted +1/-1 per bit into a
/// running vote; the final fingerprint bit is 1 wherever the vote is
/// positive. Near-duplicate documents produce fingerprints that differ in
/// only a handful of bits.
pub fn simhash(text: &str) -> u64 {
    let mut votes = [0i32; 64];
    for token in text.split_whitespace() {
        let h = fnv1a_64(token.as_bytes());
        for (bit, vote) in votes.iter_mut().enumerate() {
            if (h >> bit) & 1 == 1 {
                *vote += 1;
            } else {
                *vote -= 1;
            }
        }
    }
    let mut fingerprint: u64 = 0;
    for (bit, vote) in votes.iter().enumerate() {
        if *vote > 0 {
            fingerprint |= 1 << bit;
        }
    }
    fingerprint
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut hash = OFFSET_BASIS;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Hamming distance between two 64-bit fingerprints.
pub fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

/// Default maximum Hamming distance for two fingerprints to be considered
/// near-duplicates.
pub const DEFAULT_SIMHASH_THRESHOLD: u32 = 5;

/// Stateful near-duplicate filter held for the duration of one build.
pub struct DuplicateFilter {
    seen_urls: HashSet<String>,
    seen_hashes: Vec<u64>,
    threshold: u32,
}

impl DuplicateFilter {
    pub fn new(threshold: u32) -> Self {
        Self {
            seen_urls: HashSet::new(),
            seen_hashes: Vec::new(),
            threshold,
        }
    }

    /// Returns `true` if the document at `canonical_url` with `raw_text`
    /// should be indexed: its URL hasn't been seen before, and its SimHash
    /// isn't within `threshold` of any previously accepted document.
    /// Accepting a document records both its URL and fingerprint.
    pub fn accept(&mut self, canonical_url: &str, raw_text: &str) -> bool {
        if self.seen_urls.contains(canonical_url) {
            return false;
        }
        let fingerprint = simhash(raw_text);
        if self
            .seen_hashes
            .iter()
            .any(|&seen| hamming_distance(seen, fingerprint) <= self.threshold)
        {
            return false;
        }
        self.seen_urls.insert(canonical_url.to_string());
        self.seen_hashes.push(fingerprint);
        true
    }
}

impl Default for DuplicateFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SIMHASH_THRESHOLD)
    }
}
