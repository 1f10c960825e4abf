//! Recursive splitting: try the coarsest separator present in the text,
//! recurse into pieces that are still too long with the finer ones.

use super::helpers::{char_len, merge_splits, split_keep_separator};
use super::types::ChunkConfig;

/// Split `text` into chunk strings. Empty or whitespace-only text yields an
/// empty vector. Deterministic for a given text and config.
pub fn split_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    split_recursive(text, &config.separators, config)
}

fn split_recursive(text: &str, separators: &[String], config: &ChunkConfig) -> Vec<String> {
    let (separator, finer) = pick_separator(text, separators);
    let splits = split_keep_separator(text, separator);

    let mut chunks = Vec::new();
    let mut fitting: Vec<&str> = Vec::new();

    for piece in splits {
        if char_len(piece) < config.chunk_size {
            fitting.push(piece);
            continue;
        }

        if !fitting.is_empty() {
            chunks.extend(merge_splits(&fitting, "", config.chunk_size, config.chunk_overlap));
            fitting.clear();
        }

        if finer.is_empty() {
            let trimmed = piece.trim();
            if !trimmed.is_empty() {
                chunks.push(trimmed.to_string());
            }
        } else {
            chunks.extend(split_recursive(piece, finer, config));
        }
    }

    if !fitting.is_empty() {
        chunks.extend(merge_splits(&fitting, "", config.chunk_size, config.chunk_overlap));
    }
    chunks
}

/// First separator that occurs in `text` (or the empty separator), together
/// with the finer separators left to try.
fn pick_separator<'a>(text: &str, separators: &'a [String]) -> (&'a str, &'a [String]) {
    for (i, sep) in separators.iter().enumerate() {
        if sep.is_empty() {
            return ("", &[]);
        }
        if text.contains(sep.as_str()) {
            return (sep.as_str(), &separators[i + 1..]);
        }
    }
    (separators.last().map(String::as_str).unwrap_or(""), &[])
}
