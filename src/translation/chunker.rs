/*!
 * Paragraph-aligned chunking of long texts.
 *
 * A chunk is the unit of one inference request. Paragraphs are separated by a
 * blank line and are never split across chunks; the only exception is a text
 * with no paragraph boundary at all, which is truncated to the budget.
 */

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

/// Separator placed between paragraphs when they are packed or reassembled
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

const SEPARATOR_LEN: usize = 2;

/// A newline, optional horizontal whitespace, a newline
static PARAGRAPH_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").unwrap());

/// An ordered slice of a document's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based position in the sequence
    pub index: usize,
    /// Number of chunks in the sequence
    pub total: usize,
    /// Whole paragraphs joined by a blank line
    pub text: String,
}

impl Chunk {
    /// Whether this is the first chunk of its sequence
    pub fn is_first(&self) -> bool {
        self.index == 1
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split text into trimmed, non-empty paragraphs
pub fn paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BOUNDARY
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Split `text` into ordered chunks of at most `max_chars` characters.
///
/// Consecutive paragraphs are packed greedily, counting two characters for
/// each separator. A paragraph larger than the budget is emitted on its own.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<Chunk> {
    let pieces = split_texts(text, max_chars);
    let total = pieces.len();
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, text)| Chunk {
            index: i + 1,
            total,
            text,
        })
        .collect()
}

fn split_texts(text: &str, max_chars: usize) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.chars().count() <= max_chars {
        return vec![trimmed.to_string()];
    }

    let paragraphs = paragraphs(trimmed);
    if paragraphs.len() == 1 && max_chars > 0 {
        warn!(
            "Text of {} chars has no paragraph boundary, truncating to {} chars",
            trimmed.chars().count(),
            max_chars
        );
        return vec![trimmed.chars().take(max_chars).collect()];
    }

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for paragraph in paragraphs {
        let paragraph_len = paragraph.chars().count();
        let added_len = paragraph_len + if current.is_empty() { 0 } else { SEPARATOR_LEN };

        if !current.is_empty() && current_len + added_len > max_chars {
            chunks.push(current.join(PARAGRAPH_SEPARATOR));
            current = vec![paragraph];
            current_len = paragraph_len;
        } else {
            current.push(paragraph);
            current_len += added_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(PARAGRAPH_SEPARATOR));
    }

    chunks
}
