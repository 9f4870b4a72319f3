//! Common types used throughout the bigfile container support

use crate::error::{BigError, Result};

/// Fixed addressing unit for entry offsets, in bytes.
pub const BLOCK_SIZE: u32 = 2048;

/// Locale sentinel for non-localized content.
pub const DEFAULT_LOCALE: u32 = 0xFFFF_FFFF;

/// Byte ordering of the index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Lowercase name as written to the manifest (`little`/`big`).
    pub fn name(self) -> &'static str {
        match self {
            Endian::Little => "little",
            Endian::Big => "big",
        }
    }
}

/// One record in the index entry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigEntry {
    /// Hash of the logical file name (lookup key, not unique-checked)
    pub name_hash: u32,
    /// Language bitmask, or [`DEFAULT_LOCALE`] for non-localized content
    pub locale: u32,
    /// Payload byte count; 0 means an empty file
    pub uncompressed_size: u32,
    /// Block address relative to the logical concatenation of all parts
    pub offset: u32,
}

/// A parsed bigfile index, read-only after deserialization.
#[derive(Debug, Clone)]
pub struct BigArchive {
    /// Byte ordering the index was written with
    pub endian: Endian,
    /// Base path string stored in the index header
    pub base_path: String,
    /// Bytes per part file; always a positive multiple of [`BLOCK_SIZE`]
    pub data_alignment: u32,
    /// Entry table in on-disk order
    pub entries: Vec<BigEntry>,
}

impl BigArchive {
    /// Blocks held by each part file.
    ///
    /// Fails when the stored alignment is corrupt; nothing downstream
    /// can be resolved in that case.
    pub fn max_blocks_per_part(&self) -> Result<u32> {
        if self.data_alignment == 0 || self.data_alignment % BLOCK_SIZE != 0 {
            return Err(BigError::InvalidAlignment(self.data_alignment));
        }
        Ok(self.data_alignment / BLOCK_SIZE)
    }
}

/// Output path segment for a locale: `default` for the sentinel, else
/// eight uppercase hex digits.
pub fn locale_segment(locale: u32) -> String {
    if locale == DEFAULT_LOCALE {
        "default".to_string()
    } else {
        format!("{locale:08X}")
    }
}

const LANGUAGE_BITS: &[(u32, &str)] = &[
    (1 << 0, "English"),
    (1 << 1, "French"),
    (1 << 2, "German"),
    (1 << 3, "Italian"),
    (1 << 4, "Spanish"),
    (1 << 5, "Japanese"),
    (1 << 6, "Portuguese"),
    (1 << 7, "Polish"),
    (1 << 8, "Russian"),
];

/// Human-readable locale name for manifest comments.
pub fn locale_name(locale: u32) -> String {
    if locale == DEFAULT_LOCALE {
        return "Default".to_string();
    }

    let mut names = Vec::new();
    let mut rest = locale;
    for &(bit, name) in LANGUAGE_BITS {
        if locale & bit != 0 {
            names.push(name);
            rest &= !bit;
        }
    }

    if names.is_empty() || rest != 0 {
        "Unknown".to_string()
    } else {
        names.join("|")
    }
}
