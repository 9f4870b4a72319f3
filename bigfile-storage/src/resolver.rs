//! Name resolution for hashed entry names
//!
//! Logical file names are stored in the index only as CRC-32 hashes.
//! A project directory of `*.filelist` files (one path per line)
//! provides the reverse mapping: each listed name is lower-cased,
//! hashed, and kept in a hash-keyed table built once before
//! extraction begins.

use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, MAIN_SEPARATOR};
use tracing::{debug, info, warn};

/// Hash of a logical file name: CRC-32 over the lower-cased text.
pub fn hash_file_name(name: &str) -> u32 {
    crc32fast::hash(name.to_lowercase().as_bytes())
}

/// Case-normalized hash-to-name table
#[derive(Debug, Default)]
pub struct HashList {
    names: HashMap<u32, String>,
}

impl HashList {
    /// An empty table; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from every `*.filelist` file in a project
    /// directory. Blank lines and `#` comments are skipped.
    pub fn load_project(dir: &Path) -> Result<Self> {
        let mut names = HashMap::new();
        let mut files = 0usize;

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("filelist") {
                continue;
            }

            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    warn!("Skipping unreadable file list {}: {}", path.display(), e);
                    continue;
                }
            };

            files += 1;
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let name = line.to_lowercase();
                names.insert(hash_file_name(line), name);
            }
        }

        info!("Loaded {} names from {} file lists", names.len(), files);
        Ok(Self { names })
    }

    /// Look up the logical name for a hash.
    pub fn resolve(&self, name_hash: u32) -> Option<&str> {
        let name = self.names.get(&name_hash).map(String::as_str);
        if name.is_none() {
            debug!("No name for hash {name_hash:08X}");
        }
        name
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Normalize a resolved name for output: forward slashes become the
/// platform separator and a leading separator is stripped.
pub fn normalize_resolved(name: &str) -> String {
    let normalized = name
        .replace(['/', '\\'], &MAIN_SEPARATOR.to_string());
    normalized
        .strip_prefix(MAIN_SEPARATOR)
        .unwrap_or(&normalized)
        .to_string()
}
