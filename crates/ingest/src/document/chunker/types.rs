//! Chunk configuration.

// ── Configuration ───────────────────────────────────────────────────────────

/// Configuration for the chunking engine. Lengths are in characters
/// (Unicode scalar values), not bytes.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Maximum characters per chunk (default: 1000).
    pub chunk_size: usize,
    /// Maximum characters carried over between adjacent chunks (default: 100).
    pub chunk_overlap: usize,
    /// Split points in priority order. An empty string means "between any
    /// two characters" and should come last.
    pub separators: Vec<String>,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
            separators: ["\n\n", "\n", " ", ""].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ChunkConfig {
    /// Default separators with explicit size and overlap.
    pub fn with_sizes(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            ..Self::default()
        }
    }
}
