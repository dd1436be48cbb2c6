// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Data-parallel tokenization phase.
//!
//! Tokenizing a batch of documents has no shared mutable state between
//! documents, so it is the one phase of the build that fans out across
//! threads. Everything before (reading records off the archive) and after
//! (interning ids, writing the partial index) stays serial - rayon's
//! `collect()` below is the join barrier the rest of the pipeline builds
//! on.

use std::collections::HashMap;

use crate::corpus::RawRecord;
use crate::tokenize::Tokenizer;

#[cfg(feature = "parallel")]
pub fn tokenize_batch(records: &[RawRecord], tokenizer: &Tokenizer) -> Vec<HashMap<String, f32>> {
    use rayon::prelude::*;
    records
        .par_iter()
        .map(|record| tokenizer.tokenize_document(&record.content))
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub fn tokenize_batch(records: &[RawRecord], tokenizer: &Tokenizer) -> Vec<HashMap<String, f32>> {
    records
        .iter()
        .map(|record| tokenizer.tokenize_document(&record.content))
        .collect()
}
