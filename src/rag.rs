//! Query-phase retrieval and citation formatting.

use std::collections::HashSet;
use std::path::Path;

use crate::chunker::Chunk;
use crate::embedder::{Embedder, EmbedderError};
use crate::index::NO_MATCH;
use crate::session::RepoSession;

/// Return the `top_k` chunks most similar to `question`, ordered by
/// descending similarity.
///
/// Sentinel ids from the underlying search are filtered here, so the
/// result holds at most `top_k` chunks and is shorter only when the
/// index holds fewer vectors. An empty index yields an empty result
/// rather than an error.
pub fn retrieve<'s>(
    question: &str,
    session: &'s RepoSession,
    embedder: &dyn Embedder,
    top_k: usize,
) -> Result<Vec<&'s Chunk>, EmbedderError> {
    if session.index().is_empty() {
        return Ok(Vec::new());
    }

    let query = embedder.embed(question)?;
    let hits = match session.index().search(&query, top_k) {
        Ok(hits) => hits,
        // Dimension mismatch can only mean embedder/session mix-up;
        // treat it as an inference-level failure.
        Err(e) => return Err(EmbedderError::InferenceFailed(e.to_string())),
    };

    let mut results = Vec::new();
    for id in hits.ids {
        if id == NO_MATCH {
            continue;
        }
        if let Some(chunk) = session.chunk_at(id as usize) {
            results.push(chunk);
        }
    }

    Ok(results)
}

/// Render chunks as `"{relative_path} (lines {start}-{end})"` strings,
/// deduplicating exact repeats while preserving first-seen order.
pub fn format_citations(chunks: &[&Chunk], repo_root: &Path) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut citations = Vec::new();

    for chunk in chunks {
        let rel = chunk
            .file_path
            .strip_prefix(repo_root)
            .unwrap_or(&chunk.file_path);
        let citation = format!(
            "{} (lines {}-{})",
            rel.display(),
            chunk.start_line,
            chunk.end_line
        );
        if seen.insert(citation.clone()) {
            citations.push(citation);
        }
    }

    citations
}
