//! Sequential part file access
//!
//! At most one part file is open at any time. The extraction planner
//! visits entries in ascending offset order, so parts are requested in
//! non-decreasing order and each part is opened at most once.

use crate::error::{BigError, Result};
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::info;

enum PartState {
    Closed,
    Open {
        part_index: u32,
        reader: BufReader<File>,
    },
}

/// Hands out a readable, seekable stream for one part file at a time.
///
/// Part paths are derived from the index path by swapping its extension
/// for the zero-padded part number; part 0 is the index file itself.
pub struct PartStream {
    index_path: PathBuf,
    state: PartState,
    open_count: usize,
}

impl PartStream {
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            state: PartState::Closed,
            open_count: 0,
        }
    }

    /// Path of the given part file (`foo.000` -> `foo.017` for part 17).
    pub fn part_path(&self, part_index: u32) -> PathBuf {
        self.index_path.with_extension(format!("{part_index:03}"))
    }

    /// Currently open part number, if any.
    pub fn current_part(&self) -> Option<u32> {
        match self.state {
            PartState::Closed => None,
            PartState::Open { part_index, .. } => Some(part_index),
        }
    }

    /// Number of part files opened so far.
    pub fn open_count(&self) -> usize {
        self.open_count
    }

    /// Return a reader for `part_index`, positioned at `byte_offset`.
    ///
    /// Advancing to a new part closes the previous one first. A missing
    /// part file is fatal for the whole run: subsequent offsets cannot
    /// be resolved against an incomplete archive.
    pub fn reader_at(
        &mut self,
        part_index: u32,
        byte_offset: u64,
    ) -> Result<&mut BufReader<File>> {
        if self.current_part() != Some(part_index) {
            // Drop the old descriptor before opening the next part
            self.state = PartState::Closed;

            let path = self.part_path(part_index);
            info!("Opening part file {}", path.display());

            let file = File::open(&path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BigError::PartNotFound {
                        part: part_index,
                        path,
                    }
                } else {
                    BigError::Io(e)
                }
            })?;

            self.state = PartState::Open {
                part_index,
                reader: BufReader::new(file),
            };
            self.open_count += 1;
        }

        match &mut self.state {
            PartState::Open { reader, .. } => {
                reader.seek(SeekFrom::Start(byte_offset))?;
                Ok(reader)
            }
            PartState::Closed => unreachable!("part opened above"),
        }
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }
}
