// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `offsets.bin`: the term -> byte offset map for `postings.bin`.
//!
//! The whole point of this file is to be small enough to load into a
//! `HashMap<String, u64>` in one shot at `IndexReader::open` time - there's
//! no seek-based lookup structure, no skip list over the offsets
//! themselves. A query looks up a term in the in-memory map, seeks
//! `postings.bin` to the offset, and reads exactly one term record.
//!
//! Record layout, written in ascending term order:
//!
//! ```text
//! varint   term_len
//! bytes    term (utf8)
//! varint   byte offset into postings.bin
//! ```

use std::collections::HashMap;
use std::io::{self, Read, Write};

use crc32fast::Hasher as Crc32Hasher;

use super::encoding::{decode_varint, encode_varint};
use super::header::{FileFooter, FileHeader, FileKind};

/// Write the full term -> offset map. `entries` must already be sorted by
/// term; the merge step produces them in that order for free.
pub fn write_offsets<W: Write>(
    mut writer: W,
    doc_count: u32,
    entries: &[(String, u64)],
) -> io::Result<()> {
    let header = FileHeader {
        version: super::header::VERSION,
        kind: FileKind::Offsets,
        doc_count,
        term_count: entries.len() as u32,
    };
    let mut buf = Vec::new();
    header.write(&mut buf)?;

    for (term, offset) in entries {
        let term_bytes = term.as_bytes();
        encode_varint(term_bytes.len() as u64, &mut buf);
        buf.extend_from_slice(term_bytes);
        encode_varint(*offset, &mut buf);
    }

    let crc32 = {
        let mut hasher = Crc32Hasher::new();
        hasher.update(&buf);
        hasher.finalize()
    };
    writer.write_all(&buf)?;
    FileFooter { crc32 }.write(&mut writer)?;
    Ok(())
}

/// Read the full term -> offset map into memory, validating the footer
/// CRC32 first so a truncated or corrupted file is rejected outright
/// rather than partially loaded.
pub fn read_offsets<R: Read>(mut reader: R) -> io::Result<HashMap<String, u64>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    if bytes.len() < FileFooter::SIZE {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "offsets file too short",
        ));
    }
    let content_len = bytes.len() - FileFooter::SIZE;
    let footer = FileFooter::read(&bytes)?;
    let computed = FileFooter::compute_crc32(&bytes[..content_len]);
    if computed != footer.crc32 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "offsets file CRC32 mismatch (corrupted or truncated)",
        ));
    }

    let mut cursor = &bytes[..content_len];
    let header = FileHeader::read(&mut cursor, FileKind::Offsets)?;

    let mut map = HashMap::with_capacity(header.term_count as usize);
    for _ in 0..header.term_count {
        let (term_len, consumed) = decode_varint(cursor)?;
        cursor = &cursor[consumed..];
        let term_len = term_len as usize;
        if term_len > cursor.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "truncated term in offsets file",
            ));
        }
        let term = String::from_utf8(cursor[..term_len].to_vec())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        cursor = &cursor[term_len..];

        let (offset, consumed) = decode_varint(cursor)?;
        cursor = &cursor[consumed..];

        map.insert(term, offset);
    }

    Ok(map)
}
