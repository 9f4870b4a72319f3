//! Command handlers for the bigfile CLI

pub mod unpack;
