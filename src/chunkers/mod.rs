//! Token sizing and text splitting for chunked translation.

mod base;
mod recursive_chunker;
mod sizing;

#[cfg(test)]
pub(crate) use base::CharCounter;
pub use base::{TiktokenCounter, TokenCounter};
pub use recursive_chunker::RecursiveSplitter;
pub use sizing::calculate_chunk_size;
