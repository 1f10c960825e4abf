//! Text splitting and merging utilities used by the recursive splitter.

use std::collections::VecDeque;

use tracing::warn;

/// Length in characters.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split `text` on `separator`, keeping each separator attached to the start
/// of the piece that follows it. An empty separator splits into single
/// characters. Empty pieces are dropped.
pub(crate) fn split_keep_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Greedily merge `splits` into documents of at most `chunk_size` characters.
///
/// When a document is emitted, leading pieces are dropped until at most
/// `chunk_overlap` characters remain; those carry over into the next
/// document. Documents are trimmed and empty ones skipped.
pub(crate) fn merge_splits(
    splits: &[&str],
    separator: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Vec<String> {
    let sep_len = char_len(separator);
    let mut docs = Vec::new();
    let mut current: VecDeque<&str> = VecDeque::new();
    let mut total = 0usize;

    for &piece in splits {
        let len = char_len(piece);
        let joiner = if current.is_empty() { 0 } else { sep_len };

        if total + len + joiner > chunk_size {
            if total > chunk_size {
                warn!(
                    "Created a chunk of size {}, which is longer than the specified {}",
                    total, chunk_size
                );
            }
            if !current.is_empty() {
                if let Some(doc) = join_trimmed(&current, separator) {
                    docs.push(doc);
                }
                while let Some(&first) = current.front() {
                    let too_long = total > chunk_overlap;
                    let would_overflow = total + len + sep_len > chunk_size && total > 0;
                    if !(too_long || would_overflow) {
                        break;
                    }
                    let removed_sep = if current.len() > 1 { sep_len } else { 0 };
                    total -= char_len(first) + removed_sep;
                    current.pop_front();
                }
            }
        }

        current.push_back(piece);
        total += len + if current.len() > 1 { sep_len } else { 0 };
    }

    if let Some(doc) = join_trimmed(&current, separator) {
        docs.push(doc);
    }
    docs
}

fn join_trimmed(pieces: &VecDeque<&str>, separator: &str) -> Option<String> {
    let joined = pieces.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
