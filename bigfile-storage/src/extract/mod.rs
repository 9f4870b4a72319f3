//! Extraction planning and execution

mod planner;

pub use planner::Extractor;

use crate::error::Result;
use regex::{Regex, RegexBuilder};
use std::io;
use std::path::PathBuf;

/// Which entries to keep, based on whether their name hash resolved.
///
/// The CLI exposes this as two mutually exclusive flags; modeling the
/// tri-state explicitly keeps the interaction exhaustively matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownSelection {
    /// Extract everything (default)
    #[default]
    IncludeAll,
    /// Skip entries whose name could not be resolved
    KnownOnly,
    /// Skip entries whose name resolved from the file lists
    UnknownOnly,
}

/// Policy knobs for a whole extraction run
#[derive(Debug, Default)]
pub struct ExtractOptions {
    /// Overwrite destination files that already exist
    pub overwrite: bool,
    /// Known/unknown entry selection
    pub selection: UnknownSelection,
    /// Case-insensitive filter over the composed relative path
    pub filter: Option<Regex>,
    /// Print per-entry progress lines
    pub verbose: bool,
}

impl ExtractOptions {
    /// Compile and attach a case-insensitive filter pattern. An
    /// unparseable pattern is a configuration error and fails before
    /// any extraction begins.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self> {
        self.filter = Some(
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(crate::error::BigError::InvalidFilter)?,
        );
        Ok(self)
    }
}

/// A per-entry copy failure; never fatal to the run
#[derive(Debug)]
pub struct CopyFailure {
    pub destination: PathBuf,
    pub cause: io::Error,
}

/// Outcome of an extraction run
#[derive(Debug, Default)]
pub struct ExtractSummary {
    /// Entries in the archive
    pub total: usize,
    /// Entries retained by selection + filter (manifest records)
    pub selected: usize,
    /// Destination files actually written
    pub written: usize,
    /// Copies skipped because the destination existed
    pub skipped_existing: usize,
    /// Entries dropped by the known/unknown selection
    pub skipped_selection: usize,
    /// Entries dropped by the filter pattern
    pub filtered: usize,
    /// Per-entry copy failures, reported after the run
    pub failures: Vec<CopyFailure>,
}
