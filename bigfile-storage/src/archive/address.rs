//! Block address translation
//!
//! Entry offsets are block addresses into the logical concatenation of
//! all part files. Each part holds `max_blocks_per_part` blocks, so a
//! global block offset splits into a part index and a byte offset
//! within that part.

use crate::error::{BigError, Result};
use crate::types::BLOCK_SIZE;

/// Location of an entry's payload within the part sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartLocation {
    /// Part file number (the NNN in `name.NNN`)
    pub part_index: u32,
    /// Byte offset within the part file
    pub byte_offset: u64,
}

/// Translate a global block offset into a part-relative byte address.
///
/// `byte_offset` is always in `[0, max_blocks_per_part * 2048)`.
pub fn translate(offset: u32, max_blocks_per_part: u32) -> Result<PartLocation> {
    if max_blocks_per_part == 0 {
        return Err(BigError::InvalidAlignment(0));
    }

    Ok(PartLocation {
        part_index: offset / max_blocks_per_part,
        byte_offset: u64::from(offset % max_blocks_per_part) * u64::from(BLOCK_SIZE),
    })
}
