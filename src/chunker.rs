//! Line-window chunking of source text.
//!
//! Files are split into overlapping windows of whole lines so that each
//! retrievable unit stays small enough for a language model's context
//! budget while the overlap keeps concepts that straddle a window
//! boundary retrievable from at least one chunk.

use std::fs;
use std::path::{Path, PathBuf};

/// A contiguous, line-addressed slice of one file's text.
///
/// Lines are 1-indexed and inclusive; `start_line <= end_line` always
/// holds for chunks produced by [`chunk_lines`].
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub file_path: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    pub text: String,
}

/// Split `text` into overlapping line windows.
///
/// Each window spans up to `window` lines; consecutive windows share
/// `overlap` lines. Windows whose trimmed text is empty are dropped but
/// still advance the cursor. The loop stops as soon as a window reaches
/// the end of the text, so the final lines are always covered by exactly
/// one terminal window.
///
/// The stride is clamped to at least one line, which guarantees
/// termination even when `overlap >= window`.
pub fn chunk_lines(text: &str, window: usize, overlap: usize) -> Vec<(usize, usize, String)> {
    let lines: Vec<&str> = text.lines().collect();
    let n = lines.len();
    let stride = window.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut i = 0;
    while i < n {
        let end = (i + window).min(n);
        let body = lines[i..end].join("\n");
        let trimmed = body.trim();
        if !trimmed.is_empty() {
            // 1-indexed, inclusive
            chunks.push((i + 1, end, trimmed.to_string()));
        }
        if end == n {
            break;
        }
        i += stride;
    }

    chunks
}

/// Chunk a single file into [`Chunk`]s.
///
/// The file's content is read via [`read_text_lossy`] first, so oversized
/// content is truncated and unreadable files yield no chunks.
pub fn chunk_file(
    path: &Path,
    window: usize,
    overlap: usize,
    max_chars: usize,
) -> Vec<Chunk> {
    let text = read_text_lossy(path, max_chars);
    chunk_lines(&text, window, overlap)
        .into_iter()
        .map(|(start_line, end_line, text)| Chunk {
            file_path: path.to_path_buf(),
            start_line,
            end_line,
            text,
        })
        .collect()
}

/// Read a file as text, tolerating invalid UTF-8 and capping the result
/// at `max_chars` characters to bound memory for the embedding phase.
///
/// Returns an empty string on any I/O error; traversal is best-effort
/// and partial repository content is still useful.
pub fn read_text_lossy(path: &Path, max_chars: usize) -> String {
    let Ok(bytes) = fs::read(path) else {
        return String::new();
    };
    let text = String::from_utf8_lossy(&bytes);
    if text.chars().count() <= max_chars {
        return text.into_owned();
    }
    text.chars().take(max_chars).collect()
}
