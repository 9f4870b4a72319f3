//! Crystal Dynamics bigfile container support.
//!
//! A bigfile is a split, block-addressed game asset container: a `.000`
//! index file holding a flat entry table (name hash, size, locale, block
//! offset) whose payload bytes live in sibling part files (`.000`,
//! `.001`, ...). This crate parses the index, translates block offsets
//! into part-relative byte addresses, resolves entry names from a
//! hash-keyed file list, and plans and runs a deterministic, sequential
//! extraction with an XML manifest describing the result.

pub mod archive;
pub mod error;
pub mod extract;
pub mod index;
pub mod manifest;
pub mod resolver;
pub mod sniffer;
pub mod types;

pub use error::{BigError, Result};
pub use extract::{ExtractOptions, ExtractSummary, Extractor, UnknownSelection};
pub use types::{BigArchive, BigEntry, Endian, BLOCK_SIZE, DEFAULT_LOCALE};

// Re-export commonly used types
pub use archive::{PartLocation, PartStream};
pub use manifest::ManifestWriter;
pub use resolver::HashList;
