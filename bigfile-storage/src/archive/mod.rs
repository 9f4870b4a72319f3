//! Part file handling for bigfile containers

mod address;
mod part_stream;

pub use address::{translate, PartLocation};
pub use part_stream::PartStream;
