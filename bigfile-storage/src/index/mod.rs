//! Index file parsing for bigfile containers

mod parser;

pub use parser::IndexParser;
