//! Error types for bigfile operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid index format: {0}")]
    InvalidIndexFormat(String),

    #[error("Invalid data alignment {0:#x}: must be a positive multiple of 2048")]
    InvalidAlignment(u32),

    #[error("Part file {part:03} not found at {path:?}")]
    PartNotFound { part: u32, path: PathBuf },

    #[error("Invalid filter pattern: {0}")]
    InvalidFilter(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, BigError>;
