// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `postings.bin`: one record per term, holding every document that
//! contains it and the term frequency within that document.
//!
//! Records are written in ascending term order by the merge step and never
//! touched again; each record's byte offset is handed to the offsets writer
//! as it's produced, so `postings.bin` and `offsets.bin` always agree by
//! construction. A record is:
//!
//! ```text
//! varint   term_len
//! bytes    term (utf8, term_len bytes)
//! varint   doc_freq
//! doc_freq postings, each:
//!     varint   doc_id delta from the previous posting in this record
//!              (absolute doc_id for the first posting)
//!     4 bytes  term frequency, raw f32 little-endian bits
//! ```
//!
//! Doc ids are delta-encoded because postings are always written in
//! ascending doc_id order, so deltas are small and varint-friendly. Term
//! frequency is stored as raw `f32` bits rather than a quantized/fixed-point
//! encoding so that the value written is bit-for-bit the value read back.

use std::io::{self, Read, Write};

use crc32fast::Hasher as Crc32Hasher;

use super::encoding::{decode_varint, encode_varint};
use super::header::{FileFooter, FileHeader, FileKind, MAX_POSTING_SIZE};
use crate::types::{DocId, Posting};

/// Sequentially writes term records to `postings.bin`, tracking each
/// record's start offset and a running CRC32 for the footer.
pub struct PostingsWriter<W: Write> {
    writer: W,
    hasher: Crc32Hasher,
    offset: u64,
}

impl<W: Write> PostingsWriter<W> {
    pub fn new(mut writer: W, doc_count: u32, term_count: u32) -> io::Result<Self> {
        let header = FileHeader {
            version: super::header::VERSION,
            kind: FileKind::Postings,
            doc_count,
            term_count,
        };
        let mut header_bytes = Vec::with_capacity(FileHeader::SIZE);
        header.write(&mut header_bytes)?;
        writer.write_all(&header_bytes)?;

        let mut hasher = Crc32Hasher::new();
        hasher.update(&header_bytes);

        Ok(Self {
            writer,
            hasher,
            offset: header_bytes.len() as u64,
        })
    }

    /// Write one term's record. Returns the byte offset the record started
    /// at, for the caller to record in the offset map.
    pub fn write_term(&mut self, term: &str, postings: &[Posting]) -> io::Result<u64> {
        let record = encode_term_record(term, postings);
        let start = self.offset;
        self.writer.write_all(&record)?;
        self.hasher.update(&record);
        self.offset += record.len() as u64;
        Ok(start)
    }

    pub fn finish(mut self) -> io::Result<()> {
        let footer = FileFooter {
            crc32: self.hasher.finalize(),
        };
        let mut footer_bytes = Vec::with_capacity(FileFooter::SIZE);
        footer.write(&mut footer_bytes)?;
        self.writer.write_all(&footer_bytes)?;
        Ok(())
    }
}

/// Encode one term's full record (term bytes + postings list).
pub fn encode_term_record(term: &str, postings: &[Posting]) -> Vec<u8> {
    let mut buf = Vec::new();
    let term_bytes = term.as_bytes();
    encode_varint(term_bytes.len() as u64, &mut buf);
    buf.extend_from_slice(term_bytes);
    encode_varint(postings.len() as u64, &mut buf);

    let mut prev_doc_id: u32 = 0;
    for (i, posting) in postings.iter().enumerate() {
        let delta = if i == 0 {
            posting.doc_id.get()
        } else {
            posting.doc_id.get() - prev_doc_id
        };
        encode_varint(delta as u64, &mut buf);
        buf.extend_from_slice(&posting.tf.to_le_bytes());
        prev_doc_id = posting.doc_id.get();
    }
    buf
}

/// Decode one term record sequentially from `reader`, which must be
/// positioned at the start of a record. Validates `doc_freq` against
/// [`MAX_POSTING_SIZE`] before allocating, so a corrupted length field
/// can't trigger an unbounded allocation.
pub fn read_term_record<R: Read>(reader: &mut R) -> io::Result<(String, Vec<Posting>)> {
    let term_len = read_varint(reader)? as usize;
    let mut term_bytes = vec![0u8; term_len];
    reader.read_exact(&mut term_bytes)?;
    let term = String::from_utf8(term_bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let doc_freq = read_varint(reader)? as usize;
    if doc_freq > MAX_POSTING_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "doc_freq exceeds security limit",
        ));
    }

    let mut postings = Vec::with_capacity(doc_freq);
    let mut doc_id: u32 = 0;
    for i in 0..doc_freq {
        let delta = read_varint(reader)? as u32;
        doc_id = if i == 0 { delta } else { doc_id + delta };
        let mut tf_bytes = [0u8; 4];
        reader.read_exact(&mut tf_bytes)?;
        let tf = f32::from_le_bytes(tf_bytes);
        postings.push(Posting {
            doc_id: DocId(doc_id),
            tf,
        });
    }
    Ok((term, postings))
}

fn read_varint<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut byte = [0u8; 1];
    let mut buf = Vec::new();
    loop {
        reader.read_exact(&mut byte)?;
        buf.push(byte[0]);
        if byte[0] & 0x80 == 0 {
            break;
        }
    }
    let (value, _) = decode_varint(&buf)?;
    Ok(value)
}
