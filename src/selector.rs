//! Candidate file selection for indexing.
//!
//! Walks a directory tree with a fixed deny-set of folder names and file
//! extensions, pruning ignored subtrees before descent so that large
//! dependency caches are never traversed at all.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

/// Directory names that are never descended into. A file with one of
/// these exact names is skipped as well.
const IGNORE_FOLDERS: &[&str] = &[
    ".git",
    "node_modules",
    "dist",
    "build",
    ".venv",
    "__pycache__",
    ".idea",
    ".vscode",
    ".next",
    "out",
    "public",
];

/// File suffixes excluded from indexing (binaries, archives, lock files).
const IGNORE_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg", ".ico", ".exe", ".dll", ".so", ".bin",
    ".zip", ".tar", ".gz", ".7z", ".pdf", ".lock",
];

/// Per-file size ceiling; larger files are skipped even if otherwise
/// eligible, bounding worst-case memory for the embedding phase.
pub const MAX_FILE_BYTES: u64 = 2_000_000;

/// Whether a file or folder name matches the deny-sets.
pub fn is_ignored_name(name: &str) -> bool {
    if IGNORE_FOLDERS.contains(&name) {
        return true;
    }
    let lower = name.to_lowercase();
    IGNORE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Collect every regular file under `root` that passes the ignore rules
/// and the size ceiling.
///
/// Unreadable entries are skipped silently; indexing is best-effort.
pub fn collect_files(root: &Path, max_file_bytes: u64) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .standard_filters(false)
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .is_none_or(|name| !is_ignored_name(name))
        })
        .build();

    let mut files = Vec::new();
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if meta.len() > max_file_bytes {
            debug!("skipping oversized file: {}", path.display());
            continue;
        }
        files.push(path.to_path_buf());
    }

    files
}
