//! Parser for `.000` index files
//!
//! Layout: a `u32` data alignment, a 64-byte NUL-padded base path, a
//! `u32` entry count, the hash table (`count` x `u32`), then the entry
//! table (`count` x `{offset, size, locale}`). Byte ordering is
//! detected from the alignment field, which must be a positive
//! multiple of 2048 in exactly one interpretation.

use crate::error::{BigError, Result};
use crate::types::{BigArchive, BigEntry, Endian, BLOCK_SIZE};
use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Upper bound on the entry count; a larger value means a corrupt or
/// foreign index rather than a real archive.
const MAX_ENTRY_COUNT: u32 = 0x0100_0000;

const BASE_PATH_LEN: usize = 64;

/// Parser for bigfile `.000` index files
pub struct IndexParser;

impl IndexParser {
    /// Parse an index file from disk
    pub fn parse_file(path: &Path) -> Result<BigArchive> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::parse(&mut reader)
    }

    /// Parse an index from a reader
    pub fn parse<R: Read>(reader: &mut R) -> Result<BigArchive> {
        let mut raw = [0u8; 4];
        reader.read_exact(&mut raw)?;

        let alignment_le = LittleEndian::read_u32(&raw);
        let (endian, alignment) = if is_valid_alignment(alignment_le) {
            (Endian::Little, alignment_le)
        } else {
            let alignment_be = BigEndian::read_u32(&raw);
            if is_valid_alignment(alignment_be) {
                (Endian::Big, alignment_be)
            } else {
                return Err(BigError::InvalidAlignment(alignment_le));
            }
        };

        debug!(
            "Index header: endian={}, alignment={:#x}",
            endian.name(),
            alignment
        );

        match endian {
            Endian::Little => Self::parse_body::<LittleEndian, R>(reader, endian, alignment),
            Endian::Big => Self::parse_body::<BigEndian, R>(reader, endian, alignment),
        }
    }

    fn parse_body<E: ByteOrder, R: Read>(
        reader: &mut R,
        endian: Endian,
        alignment: u32,
    ) -> Result<BigArchive> {
        let mut base_path_raw = [0u8; BASE_PATH_LEN];
        reader.read_exact(&mut base_path_raw)?;
        let base_path = read_base_path(&base_path_raw)?;

        let count = reader.read_u32::<E>()?;
        if count > MAX_ENTRY_COUNT {
            return Err(BigError::InvalidIndexFormat(format!(
                "implausible entry count: {count}"
            )));
        }

        debug!("Parsing {} entries", count);

        let mut hashes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            hashes.push(reader.read_u32::<E>()?);
        }

        let mut entries = Vec::with_capacity(count as usize);
        for name_hash in hashes {
            let offset = reader.read_u32::<E>()?;
            let uncompressed_size = reader.read_u32::<E>()?;
            let locale = reader.read_u32::<E>()?;

            entries.push(BigEntry {
                name_hash,
                locale,
                uncompressed_size,
                offset,
            });
        }

        Ok(BigArchive {
            endian,
            base_path,
            data_alignment: alignment,
            entries,
        })
    }
}

fn is_valid_alignment(value: u32) -> bool {
    value != 0 && value % BLOCK_SIZE == 0
}

fn read_base_path(raw: &[u8; BASE_PATH_LEN]) -> Result<String> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(BASE_PATH_LEN);
    let text = std::str::from_utf8(&raw[..end]).map_err(|_| {
        BigError::InvalidIndexFormat("base path is not valid UTF-8".to_string())
    })?;
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::Cursor;

    fn build_index<E: ByteOrder>(alignment: u32, entries: &[BigEntry]) -> Vec<u8> {
        let mut data = Vec::new();
        data.write_u32::<E>(alignment).unwrap();
        let mut base = [0u8; BASE_PATH_LEN];
        base[..4].copy_from_slice(b"pc-w");
        data.extend_from_slice(&base);
        data.write_u32::<E>(entries.len() as u32).unwrap();
        for e in entries {
            data.write_u32::<E>(e.name_hash).unwrap();
        }
        for e in entries {
            data.write_u32::<E>(e.offset).unwrap();
            data.write_u32::<E>(e.uncompressed_size).unwrap();
            data.write_u32::<E>(e.locale).unwrap();
        }
        data
    }

    #[test]
    fn test_parse_little_endian() {
        let entries = [BigEntry {
            name_hash: 0xDEADBEEF,
            locale: 0xFFFF_FFFF,
            uncompressed_size: 16,
            offset: 3,
        }];
        let data = build_index::<LittleEndian>(65536, &entries);

        let archive = IndexParser::parse(&mut Cursor::new(data)).unwrap();
        assert_eq!(archive.endian, Endian::Little);
        assert_eq!(archive.data_alignment, 65536);
        assert_eq!(archive.entries, entries);
    }

    #[test]
    fn test_parse_big_endian() {
        let entries = [BigEntry {
            name_hash: 1,
            locale: 0xA0,
            uncompressed_size: 0,
            offset: 0,
        }];
        let data = build_index::<BigEndian>(0x10000, &entries);

        let archive = IndexParser::parse(&mut Cursor::new(data)).unwrap();
        assert_eq!(archive.endian, Endian::Big);
        assert_eq!(archive.data_alignment, 0x10000);
        assert_eq!(archive.entries, entries);
    }

    #[test]
    fn test_parse_bad_alignment() {
        // 2049 is invalid in both byte orders
        let data = build_index::<LittleEndian>(2049, &[]);
        assert!(matches!(
            IndexParser::parse(&mut Cursor::new(data)),
            Err(BigError::InvalidAlignment(_))
        ));
    }

    #[test]
    fn test_parse_truncated() {
        let entries = [BigEntry {
            name_hash: 1,
            locale: 2,
            uncompressed_size: 3,
            offset: 4,
        }];
        let mut data = build_index::<LittleEndian>(65536, &entries);
        data.truncate(data.len() - 4);
        assert!(IndexParser::parse(&mut Cursor::new(data)).is_err());
    }
}
