//! One analysis session over one repository.
//!
//! A [`RepoSession`] owns the vector index and the chunk table it was
//! built from. Both are populated in a single pass inside
//! [`RepoSession::analyze`], so chunk position and vector id can never
//! drift apart: the chunk at position `i` is the vector with id `i`.
//! Re-analyzing a repository means constructing a new session; sessions
//! are never partially mutated.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::chunker::{Chunk, chunk_file};
use crate::config::Config;
use crate::embedder::{Embedder, EmbedderError};
use crate::index::{FlatIpIndex, IndexError};
use crate::selector::collect_files;

#[derive(Error, Debug)]
pub enum BuildError {
    /// Zero chunks were produced across the whole repository. The only
    /// hard precondition failure in the build path; callers must treat
    /// it as "repository has no indexable text".
    #[error("no indexable text found in repository (maybe only binaries or ignored files)")]
    EmptyCorpus,

    #[error(transparent)]
    Embed(#[from] EmbedderError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

#[derive(Debug)]
pub struct RepoSession {
    repo_root: PathBuf,
    chunks: Vec<Chunk>,
    index: FlatIpIndex,
}

impl RepoSession {
    /// Build a session: select files, chunk them, embed every chunk,
    /// and load the vectors into a flat index.
    ///
    /// Blocks until complete; fails with [`BuildError::EmptyCorpus`]
    /// when nothing indexable was found.
    pub fn analyze(
        repo_root: &Path,
        embedder: &dyn Embedder,
        config: &Config,
    ) -> Result<Self, BuildError> {
        let files = collect_files(repo_root, config.max_file_bytes);
        info!("selected {} candidate files", files.len());

        let mut chunks: Vec<Chunk> = Vec::new();
        for file in &files {
            chunks.extend(chunk_file(
                file,
                config.window_lines,
                config.overlap_lines,
                config.max_file_chars,
            ));
        }

        if chunks.is_empty() {
            return Err(BuildError::EmptyCorpus);
        }
        info!("chunked into {} windows", chunks.len());

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let vectors = embedder.embed_batch(&texts)?;

        let mut index = FlatIpIndex::new(embedder.dimensions());
        index.add_batch(&vectors)?;

        Ok(Self {
            repo_root: repo_root.to_path_buf(),
            chunks,
            index,
        })
    }

    #[must_use]
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    #[must_use]
    pub fn index(&self) -> &FlatIpIndex {
        &self.index
    }

    /// Chunk for a given vector id, if the id is in range.
    #[must_use]
    pub fn chunk_at(&self, id: usize) -> Option<&Chunk> {
        self.chunks.get(id)
    }
}
