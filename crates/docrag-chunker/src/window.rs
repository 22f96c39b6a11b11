//! Word-boundary sliding-window chunking.

use docrag_core::{ChunkConfig, ChunkError};

/// A single chunk produced by [`chunk`]: the span text trimmed of leading
/// and trailing whitespace, with offsets describing the untrimmed window.
/// Offsets are character offsets, 0-based and end-exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSpan {
    /// Trimmed span text
    pub text: String,
    /// Character offset of the first token in the window
    pub start: usize,
    /// Character offset one past the last token in the window
    pub end: usize,
}

/// A whitespace-delimited token with its character and byte positions.
/// Byte positions exist only so windows can be sliced without re-scanning.
#[derive(Debug, Clone, Copy)]
struct Token {
    char_start: usize,
    char_end: usize,
    byte_start: usize,
    byte_end: usize,
}

/// Lazy iterator over the chunks of a text. Created by [`chunk`]; a pure
/// function of its inputs, so chunking the same text twice yields
/// identical output.
pub struct Chunks<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    chunk_size: usize,
    overlap: usize,
    cursor: usize,
}

/// Split text into overlapping word-boundary chunks.
///
/// Tokens are whitespace-delimited and never split; consecutive tokens
/// accumulate into a window until the next token would push the window
/// past `chunk_size` characters (counted from the window start). A single
/// token longer than `chunk_size` is kept whole so the cursor always
/// advances. The next window starts at the first token at or past
/// `window_end - overlap`; if that would not move the cursor, it jumps to
/// the token immediately after the current window.
///
/// Empty and whitespace-only input yield an empty iterator, not an error.
pub fn chunk<'a>(text: &'a str, config: &ChunkConfig) -> Result<Chunks<'a>, ChunkError> {
    config.validate()?;
    Ok(Chunks {
        text,
        tokens: tokenize(text),
        chunk_size: config.chunk_size,
        overlap: config.overlap,
        cursor: 0,
    })
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current: Option<Token> = None;

    for (char_idx, (byte_idx, ch)) in text.char_indices().enumerate() {
        if ch.is_whitespace() {
            if let Some(token) = current.take() {
                tokens.push(token);
            }
        } else {
            match current.as_mut() {
                Some(token) => {
                    token.char_end = char_idx + 1;
                    token.byte_end = byte_idx + ch.len_utf8();
                }
                None => {
                    current = Some(Token {
                        char_start: char_idx,
                        char_end: char_idx + 1,
                        byte_start: byte_idx,
                        byte_end: byte_idx + ch.len_utf8(),
                    });
                }
            }
        }
    }

    if let Some(token) = current {
        tokens.push(token);
    }
    tokens
}

impl Iterator for Chunks<'_> {
    type Item = ChunkSpan;

    fn next(&mut self) -> Option<ChunkSpan> {
        if self.cursor >= self.tokens.len() {
            return None;
        }

        let first = self.cursor;
        let window_start = self.tokens[first];

        // Accumulate tokens until the window would exceed chunk_size.
        // A window always holds at least one token.
        let mut next_outside = first + 1;
        let mut last = first;
        while next_outside < self.tokens.len() {
            let candidate = self.tokens[next_outside];
            if candidate.char_end - window_start.char_start > self.chunk_size {
                break;
            }
            last = next_outside;
            next_outside += 1;
        }
        let window_end = self.tokens[last];

        let raw = &self.text[window_start.byte_start..window_end.byte_end];
        let span = ChunkSpan {
            text: raw.trim().to_string(),
            start: window_start.char_start,
            end: window_end.char_end,
        };

        // Advance to the first token at or past (window end - overlap).
        let target = window_end.char_end.saturating_sub(self.overlap);
        let mut next = first;
        while next < self.tokens.len() && self.tokens[next].char_start < target {
            next += 1;
        }
        if next == first {
            // overlap covers the whole window; force progress
            next = next_outside;
        }
        self.cursor = next;

        Some(span)
    }
}
