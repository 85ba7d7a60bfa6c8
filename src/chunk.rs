//! Paragraph-boundary text chunker.
//!
//! Splits a document body into [`Chunk`]s bounded by a configurable
//! `chunk_size` (in approximate tokens). Splitting occurs on paragraph
//! boundaries (`\n\n`) to keep each chunk semantically coherent, and the
//! tail of each flushed chunk is carried into the next one according to
//! `chunk_overlap`.
//!
//! Chunk ids are deterministic (`"<document_id>::<index>"`) so that
//! re-running ingestion over the same dataset produces identical records.

use crate::models::Chunk;

/// Approximate chars-per-token ratio.
const CHARS_PER_TOKEN: usize = 4;

/// Split text into chunks on paragraph boundaries, respecting chunk_size
/// and carrying chunk_overlap between consecutive chunks.
/// Returns chunks with contiguous indices starting at 0.
pub fn chunk_text(
    document_id: &str,
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Vec<Chunk> {
    let max_chars = chunk_size * CHARS_PER_TOKEN;
    let overlap_chars = chunk_overlap * CHARS_PER_TOKEN;

    if text.trim().is_empty() {
        return vec![make_chunk(document_id, 0, text.trim())];
    }

    let paragraphs: Vec<&str> = text.split("\n\n").collect();
    let mut chunks = Vec::new();
    let mut current_buf = String::new();
    let mut chunk_index: i64 = 0;

    for para in paragraphs {
        let trimmed = para.trim();
        if trimmed.is_empty() {
            continue;
        }

        // If adding this paragraph would exceed max, flush current buffer
        let would_be = if current_buf.is_empty() {
            trimmed.len()
        } else {
            current_buf.len() + 2 + trimmed.len() // +2 for \n\n separator
        };

        if would_be > max_chars && !current_buf.is_empty() {
            let carry = overlap_tail(&current_buf, overlap_chars).to_string();
            chunks.push(make_chunk(document_id, chunk_index, &current_buf));
            chunk_index += 1;
            current_buf = carry;
        }

        // If a single paragraph exceeds max, hard-split it. Hard splits do
        // not carry overlap; they already share a paragraph.
        if trimmed.len() > max_chars {
            if !current_buf.is_empty() {
                chunks.push(make_chunk(document_id, chunk_index, &current_buf));
                chunk_index += 1;
                current_buf.clear();
            }
            let mut remaining = trimmed;
            while !remaining.is_empty() {
                let split_at = floor_char_boundary(remaining, remaining.len().min(max_chars));
                // Prefer a newline or space boundary
                let actual_split = if split_at < remaining.len() {
                    remaining[..split_at]
                        .rfind('\n')
                        .or_else(|| remaining[..split_at].rfind(' '))
                        .map(|pos| pos + 1)
                        .unwrap_or(split_at)
                } else {
                    split_at
                };
                let piece = &remaining[..actual_split];
                chunks.push(make_chunk(document_id, chunk_index, piece.trim()));
                chunk_index += 1;
                remaining = &remaining[actual_split..];
            }
        } else {
            if !current_buf.is_empty() {
                current_buf.push_str("\n\n");
            }
            current_buf.push_str(trimmed);
        }
    }

    // Flush remaining
    if !current_buf.is_empty() {
        chunks.push(make_chunk(document_id, chunk_index, &current_buf));
    }

    // Guarantee at least one chunk
    if chunks.is_empty() {
        chunks.push(make_chunk(document_id, 0, text.trim()));
    }

    chunks
}

/// The trailing slice of `text` carried into the next chunk, snapped
/// forward to a word boundary where one exists in the tail.
fn overlap_tail(text: &str, overlap_chars: usize) -> &str {
    if overlap_chars == 0 {
        return "";
    }
    if text.len() <= overlap_chars {
        return text;
    }
    let start = ceil_char_boundary(text, text.len() - overlap_chars);
    match text[start..].find(char::is_whitespace) {
        Some(pos) => text[start + pos..].trim_start(),
        None => &text[start..],
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

fn make_chunk(document_id: &str, index: i64, text: &str) -> Chunk {
    Chunk {
        id: format!("{}::{}", document_id, index),
        document_id: document_id.to_string(),
        chunk_index: index,
        text: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_text_single_chunk() {
        let chunks = chunk_text("doc1", "Wordsmith builds tools.", 512, 50);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].text, "Wordsmith builds tools.");
        assert_eq!(chunks[0].id, "doc1::0");
    }

    #[test]
    fn test_empty_text() {
        let chunks = chunk_text("doc1", "", 512, 50);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_index, 0);
    }

    #[test]
    fn test_multiple_paragraphs_under_limit() {
        let text = "First paragraph.\n\nSecond paragraph.\n\nThird paragraph.";
        let chunks = chunk_text("doc1", text, 512, 50);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].text.contains("First paragraph."));
        assert!(chunks[0].text.contains("Third paragraph."));
    }

    #[test]
    fn test_multiple_paragraphs_exceed_limit() {
        // chunk_size=5 => max_chars=20
        let text = "This is paragraph one.\n\nThis is paragraph two.\n\nThis is paragraph three.";
        let chunks = chunk_text("doc1", text, 5, 0);
        assert!(chunks.len() > 1);
        // Indices must be contiguous starting at 0
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.chunk_index, i as i64);
        }
    }

    #[test]
    fn test_overlap_carried_between_chunks() {
        // chunk_size=8 => max_chars=32; overlap=2 => 8 chars
        let text = "Alpha beta gamma delta.\n\nEpsilon zeta eta theta.\n\nIota kappa lambda mu.";
        let chunks = chunk_text("doc1", text, 8, 2);
        assert!(chunks.len() > 1);
        // Each chunk after the first starts with the tail of its predecessor
        for pair in chunks.windows(2) {
            let tail_word = pair[0].text.split_whitespace().last().unwrap();
            assert!(
                pair[1].text.contains(tail_word),
                "chunk {:?} does not carry tail of {:?}",
                pair[1].text,
                pair[0].text
            );
        }
    }

    #[test]
    fn test_zero_overlap_no_carry() {
        let text = "Alpha beta gamma delta.\n\nEpsilon zeta eta theta.";
        let chunks = chunk_text("doc1", text, 6, 0);
        assert!(chunks.len() > 1);
        assert!(!chunks[1].text.contains("delta."));
    }

    #[test]
    fn test_chunk_indices_contiguous() {
        let text = (0..50)
            .map(|i| format!("Paragraph number {}.", i))
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunks = chunk_text("doc1", &text, 10, 2);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.chunk_index, i as i64, "Index mismatch at position {}", i);
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "Alpha\n\nBeta\n\nGamma\n\nDelta";
        let c1 = chunk_text("doc1", text, 5, 1);
        let c2 = chunk_text("doc1", text, 5, 1);
        assert_eq!(c1.len(), c2.len());
        for (a, b) in c1.iter().zip(c2.iter()) {
            assert_eq!(a.text, b.text);
            assert_eq!(a.id, b.id);
            assert_eq!(a.chunk_index, b.chunk_index);
        }
    }

    #[test]
    fn test_long_paragraph_hard_split() {
        let text = "word ".repeat(100);
        let chunks = chunk_text("doc1", &text, 5, 1);
        assert!(chunks.len() > 1);
        for c in &chunks {
            assert!(c.text.len() <= 5 * 4 + 8, "chunk too large: {}", c.text.len());
        }
    }

    #[test]
    fn test_overlap_tail_word_boundary() {
        let tail = overlap_tail("alpha beta gamma", 7);
        assert_eq!(tail, "gamma");
    }

    #[test]
    fn test_overlap_tail_zero() {
        assert_eq!(overlap_tail("alpha beta", 0), "");
    }

    #[test]
    fn test_overlap_tail_shorter_than_overlap() {
        assert_eq!(overlap_tail("abc", 10), "abc");
    }
}
