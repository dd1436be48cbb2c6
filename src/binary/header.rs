// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format header and footer shared by `postings.bin` and `offsets.bin`.
//!
//! Both files open with a 16-byte header (magic, version, which file this
//! is, declared doc/term counts) and close with an 8-byte footer: a CRC32
//! over everything before it, plus a magic number that marks the end as
//! intact. If the footer doesn't check out, the file was truncated or
//! corrupted and should not be trusted.

use std::io::{self, Read, Write};

use crc32fast::Hasher as Crc32Hasher;

/// Magic bytes: "FRDX" in ASCII.
pub const MAGIC: [u8; 4] = [0x46, 0x52, 0x44, 0x58];

/// Footer magic: "XDRF" (reversed, marks a valid file end).
pub const FOOTER_MAGIC: [u8; 4] = [0x58, 0x44, 0x52, 0x46];

/// Current format version.
pub const VERSION: u8 = 1;

/// Which file a header belongs to. Prevents accidentally loading
/// `offsets.bin` through the postings reader or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FileKind {
    Postings = 0,
    Offsets = 1,
}

impl FileKind {
    fn from_byte(byte: u8) -> io::Result<Self> {
        match byte {
            0 => Ok(FileKind::Postings),
            1 => Ok(FileKind::Offsets),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown file kind byte {other}"),
            )),
        }
    }
}

// ============================================================================
// SECURITY LIMITS (prevent resource exhaustion from malicious/corrupt input)
// ============================================================================

/// Maximum file size: 1 GB.
pub const MAX_FILE_SIZE: usize = 1024 * 1024 * 1024;

/// Maximum number of documents.
pub const MAX_DOC_COUNT: u32 = 50_000_000;

/// Maximum number of terms.
pub const MAX_TERM_COUNT: u32 = 50_000_000;

/// Maximum postings in a single term's record.
pub const MAX_POSTING_SIZE: usize = 50_000_000;

/// Maximum varint bytes (u64 needs at most 10 bytes).
pub const MAX_VARINT_BYTES: usize = 10;

/// Fixed-size header, 16 bytes.
#[derive(Debug, Clone)]
pub struct FileHeader {
    pub version: u8,
    pub kind: FileKind,
    pub doc_count: u32,
    pub term_count: u32,
}

impl FileHeader {
    pub const SIZE: usize = 16;

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&MAGIC)?;
        w.write_all(&[self.version, self.kind as u8, 0, 0])?;
        w.write_all(&self.doc_count.to_le_bytes())?;
        w.write_all(&self.term_count.to_le_bytes())?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R, expected: FileKind) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid magic: expected FRDX, got {magic:?}"),
            ));
        }

        let mut buf = [0u8; 12];
        r.read_exact(&mut buf)?;
        let kind = FileKind::from_byte(buf[1])?;
        if kind != expected {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "file kind mismatch",
            ));
        }

        let doc_count = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        let term_count = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
        if doc_count > MAX_DOC_COUNT || term_count > MAX_TERM_COUNT {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "doc_count/term_count exceeds security limit",
            ));
        }

        Ok(Self {
            version: buf[0],
            kind,
            doc_count,
            term_count,
        })
    }
}

/// Footer with CRC32 checksum and magic number (8 bytes).
#[derive(Debug, Clone)]
pub struct FileFooter {
    pub crc32: u32,
}

impl FileFooter {
    pub const SIZE: usize = 8;

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.crc32.to_le_bytes())?;
        w.write_all(&FOOTER_MAGIC)?;
        Ok(())
    }

    pub fn read(bytes: &[u8]) -> io::Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "file too short for footer",
            ));
        }
        let footer_start = bytes.len() - Self::SIZE;
        let magic = &bytes[footer_start + 4..];
        if magic != FOOTER_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid footer magic: got {magic:?}"),
            ));
        }
        let crc32 = u32::from_le_bytes([
            bytes[footer_start],
            bytes[footer_start + 1],
            bytes[footer_start + 2],
            bytes[footer_start + 3],
        ]);
        Ok(Self { crc32 })
    }

    pub fn compute_crc32(data: &[u8]) -> u32 {
        let mut hasher = Crc32Hasher::new();
        hasher.update(data);
        hasher.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let header = FileHeader {
            version: VERSION,
            kind: FileKind::Postings,
            doc_count: 42,
            term_count: 7,
        };
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();
        assert_eq!(buf.len(), FileHeader::SIZE);
        let read_back = FileHeader::read(&mut &buf[..], FileKind::Postings).unwrap();
        assert_eq!(read_back.doc_count, 42);
        assert_eq!(read_back.term_count, 7);
    }

    #[test]
    fn header_rejects_wrong_kind() {
        let header = FileHeader {
            version: VERSION,
            kind: FileKind::Postings,
            doc_count: 1,
            term_count: 1,
        };
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();
        assert!(FileHeader::read(&mut &buf[..], FileKind::Offsets).is_err());
    }

    #[test]
    fn footer_detects_corruption() {
        let data = b"hello world";
        let crc = FileFooter::compute_crc32(data);
        let footer = FileFooter { crc32: crc };
        let mut buf = data.to_vec();
        footer.write(&mut buf).unwrap();

        let read_back = FileFooter::read(&buf).unwrap();
        assert_eq!(read_back.crc32, crc);

        buf[0] ^= 0xFF;
        let content = &buf[..buf.len() - FileFooter::SIZE];
        let recomputed = FileFooter::compute_crc32(content);
        assert_ne!(recomputed, read_back.crc32);
    }
}
