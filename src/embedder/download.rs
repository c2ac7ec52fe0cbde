//! Embedding model auto-download from HuggingFace.
//!
//! Fetches the ONNX model and tokenizer on first use so a fresh install
//! can index a repository without manual setup.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

const HF_BASE: &str = "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main";

/// Files required by the embedder, with their relative URL paths.
const MODEL_FILES: &[(&str, &str)] = &[
    ("model.onnx", "onnx/model.onnx"),
    ("tokenizer.json", "tokenizer.json"),
];

/// Default cache directory for model files.
#[must_use]
pub fn default_model_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("repolens/models/all-MiniLM-L6-v2")
}

/// Whether all required model files exist in `model_dir`.
#[must_use]
pub fn all_files_present(model_dir: &Path) -> bool {
    MODEL_FILES
        .iter()
        .all(|(name, _)| model_dir.join(name).exists())
}

/// Download missing model files, creating the directory if needed.
/// Files already present are left untouched.
pub fn ensure_model_files(model_dir: &Path) -> Result<()> {
    info!("Checking model files in {}", model_dir.display());

    fs::create_dir_all(model_dir)
        .with_context(|| format!("failed to create model directory: {}", model_dir.display()))?;

    if all_files_present(model_dir) {
        info!("All model files found, skipping download");
        return Ok(());
    }

    eprintln!("[INFO] Downloading embedding model from HuggingFace (one-time, ~90MB)...");

    for &(filename, url_path) in MODEL_FILES {
        let dest = model_dir.join(filename);
        if dest.exists() {
            continue;
        }

        let url = format!("{HF_BASE}/{url_path}");
        eprintln!("[INFO] Downloading {filename}...");
        download_file(&dest, &url).with_context(|| format!("failed to download {filename}"))?;
    }

    eprintln!("[INFO] Model download complete");
    Ok(())
}

/// Download a single file with a progress bar.
///
/// The transfer goes to a `.part` file that is renamed into place only
/// after a complete write. The cache directory outlives the process, so
/// a partial `dest` must never be left where `all_files_present` would
/// count it as complete and block all future downloads.
fn download_file(dest: &Path, url: &str) -> Result<()> {
    let resp =
        reqwest::blocking::get(url).with_context(|| format!("HTTP request failed: {url}"))?;

    if !resp.status().is_success() {
        anyhow::bail!("bad status: {} for {url}", resp.status());
    }

    let total = resp.content_length().unwrap_or(0);
    let pb = if total > 0 {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {bar:40.cyan/blue} {percent}% ({bytes}/{total_bytes}) {msg}")
                .expect("valid template")
                .progress_chars("█▓░"),
        );
        pb
    } else {
        ProgressBar::new_spinner()
    };

    let mut part = dest.as_os_str().to_owned();
    part.push(".part");
    let part = PathBuf::from(part);

    let written = fs::File::create(&part)
        .with_context(|| format!("failed to create file: {}", part.display()))
        .and_then(|mut file| {
            let bytes = resp.bytes().context("failed to read response body")?;
            file.write_all(&bytes).context("failed to write file")?;
            pb.set_position(bytes.len() as u64);
            Ok(())
        });
    pb.finish_and_clear();

    if let Err(e) = written {
        let _ = fs::remove_file(&part);
        return Err(e);
    }

    fs::rename(&part, dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;

    Ok(())
}
