//! bigfile unpacker CLI
//!
//! This library holds the argument surface and command handling for
//! the `bigfile-unpack` binary.

pub mod commands;

use bigfile_storage::UnknownSelection;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "bigfile-unpack",
    about = "Extract Crystal Dynamics bigfile containers",
    version,
    long_about = "Extracts the contents of a split, block-addressed bigfile container \
                  into individual files plus a bigfile.xml manifest describing the \
                  hash-to-path mapping for later reconstruction."
)]
pub struct Cli {
    /// Overwrite existing files
    #[arg(short, long)]
    pub overwrite: bool,

    /// Don't extract unknown files
    #[arg(long, overrides_with = "only_unknowns")]
    pub no_unknowns: bool,

    /// Only extract unknown files
    #[arg(long, overrides_with = "no_unknowns")]
    pub only_unknowns: bool,

    /// Filter files using a case-insensitive pattern
    #[arg(short, long, value_name = "PATTERN")]
    pub filter: Option<String>,

    /// Suppress per-entry progress lines
    #[arg(short, long)]
    pub quiet: bool,

    /// Override the file list project directory
    #[arg(short, long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Input index file (must end in .000)
    pub input: PathBuf,

    /// Output directory (defaults to the input stem plus "_unpack")
    pub output: Option<PathBuf>,
}

impl Cli {
    /// The tri-state selection implied by the two unknown flags;
    /// `overrides_with` already made them mutually exclusive.
    pub fn selection(&self) -> UnknownSelection {
        if self.only_unknowns {
            UnknownSelection::UnknownOnly
        } else if self.no_unknowns {
            UnknownSelection::KnownOnly
        } else {
            UnknownSelection::IncludeAll
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}
