//! Word-window chunking with configurable size and overlap.
//!
//! The combined source text is split into whitespace-delimited words and
//! windowed: window *i* starts at word `i * (size - overlap)` and spans
//! `size` words (the last window may be shorter). The overlap preserves
//! context across window boundaries, since the summarizer sees each chunk
//! independently with no cross-chunk memory.

use webbrief_core::{AppError, AppResult};

/// Default window size in words.
pub const DEFAULT_CHUNK_SIZE: usize = 1500;

/// Default overlap between consecutive windows in words.
pub const DEFAULT_CHUNK_OVERLAP: usize = 300;

/// Lazy, finite iterator over word windows.
///
/// Cloning restarts the sequence from the first window.
#[derive(Debug, Clone)]
pub struct WordWindows<'a> {
    words: Vec<&'a str>,
    size: usize,
    step: usize,
    start: usize,
}

impl Iterator for WordWindows<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.start >= self.words.len() {
            return None;
        }

        let end = (self.start + self.size).min(self.words.len());
        let window = self.words[self.start..end].join(" ");
        self.start += self.step;

        Some(window)
    }
}

/// Split text into overlapping word windows.
///
/// `size` must be greater than `overlap`; empty input yields an empty
/// sequence, not a single empty chunk.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> AppResult<WordWindows<'_>> {
    if size == 0 || size <= overlap {
        return Err(AppError::Config(format!(
            "chunk size ({}) must be greater than overlap ({})",
            size, overlap
        )));
    }

    let words: Vec<&str> = text.split_whitespace().collect();

    tracing::debug!(
        "Chunking {} words (size: {}, overlap: {})",
        words.len(),
        size,
        overlap
    );

    Ok(WordWindows {
        words,
        size,
        step: size - overlap,
        start: 0,
    })
}
