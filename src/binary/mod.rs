// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk binary format: `postings.bin` and `offsets.bin`.
//!
//! Both files share the same 16-byte header / 8-byte CRC32 footer shape
//! (see [`header`]). `postings.bin` holds the actual term records
//! ([`postings`]); `offsets.bin` holds the term -> byte offset map used to
//! seek into it ([`offsets`]). Both build on the varint primitive in
//! [`encoding`].

pub mod encoding;
pub mod header;
pub mod offsets;
pub mod postings;

pub use encoding::{decode_varint, encode_varint};
pub use header::{
    FileFooter, FileHeader, FileKind, MAGIC, FOOTER_MAGIC, MAX_DOC_COUNT, MAX_FILE_SIZE,
    MAX_POSTING_SIZE, MAX_TERM_COUNT, MAX_VARINT_BYTES, VERSION,
};
pub use offsets::{read_offsets, write_offsets};
pub use postings::{encode_term_record, read_term_record, PostingsWriter};
