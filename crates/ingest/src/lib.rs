//! PDF text extraction, chunking and embedding backends.

pub mod document;
pub mod embedding;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;
