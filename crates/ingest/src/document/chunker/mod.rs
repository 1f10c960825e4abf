//! Recursive character chunking engine.
//!
//! Splits extracted text into bounded, overlapping chunks suitable for
//! embedding. Paragraph breaks are preferred over line breaks, line breaks
//! over spaces, and a hard character cut is the last resort.

mod helpers;
mod splitter;
mod types;

pub use splitter::split_text;
pub use types::ChunkConfig;
