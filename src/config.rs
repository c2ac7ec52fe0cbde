//! Configuration loading, validation, and defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ── Default value functions ──────────────────────────────────────────

fn default_window_lines() -> usize {
    200
}

fn default_overlap_lines() -> usize {
    30
}

fn default_top_k() -> usize {
    6
}

fn default_max_file_bytes() -> u64 {
    2_000_000
}

fn default_max_file_chars() -> usize {
    200_000
}

fn default_model_name() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_dimensions() -> usize {
    384
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_ollama_timeout_secs() -> u64 {
    120
}

fn default_claude_model() -> String {
    "claude-3-5-sonnet-latest".to_string()
}

fn default_claude_max_tokens() -> u32 {
    900
}

// ── Config structs ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Lines per chunk window.
    #[serde(default = "default_window_lines")]
    pub window_lines: usize,

    /// Lines shared between consecutive windows.
    #[serde(default = "default_overlap_lines")]
    pub overlap_lines: usize,

    /// Number of chunks returned per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Files larger than this are never indexed.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Per-file character budget applied before chunking.
    #[serde(default = "default_max_file_chars")]
    pub max_file_chars: usize,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub claude: ClaudeConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_model_name")]
    pub name: String,

    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    #[serde(default = "default_ollama_model")]
    pub model: String,

    #[serde(default = "default_ollama_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClaudeConfig {
    #[serde(default = "default_claude_model")]
    pub model: String,

    #[serde(default = "default_claude_max_tokens")]
    pub max_tokens: u32,
}

// ── Default impls ────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            window_lines: default_window_lines(),
            overlap_lines: default_overlap_lines(),
            top_k: default_top_k(),
            max_file_bytes: default_max_file_bytes(),
            max_file_chars: default_max_file_chars(),
            model: ModelConfig::default(),
            ollama: OllamaConfig::default(),
            claude: ClaudeConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            dimensions: default_dimensions(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            model: default_ollama_model(),
            timeout_secs: default_ollama_timeout_secs(),
        }
    }
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            model: default_claude_model(),
            max_tokens: default_claude_max_tokens(),
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// If the file does not exist or contains invalid JSON, a default
    /// config is returned; partial configs are filled with defaults.
    pub fn load(config_path: &str) -> Result<Self> {
        let path = if config_path.is_empty() {
            "config.json"
        } else {
            config_path
        };

        if !Path::new(path).exists() {
            info!("{path} not found, using defaults");
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {path}"))?;

        let cfg: Config = match serde_json::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                warn!("Invalid JSON in {path}: {e}");
                warn!("Using default configuration");
                return Ok(Self::default());
            }
        };

        info!("Loaded configuration from {path}");
        Ok(cfg)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &str) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("failed to marshal config")?;
        std::fs::write(path, data).with_context(|| format!("failed to write config: {path}"))?;
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Note that `overlap_lines >= window_lines` is allowed; the chunker
    /// clamps its stride to keep termination unconditional.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.window_lines > 0, "window_lines must be positive");
        anyhow::ensure!(self.top_k > 0, "top_k must be positive");
        anyhow::ensure!(self.max_file_bytes > 0, "max_file_bytes must be positive");
        anyhow::ensure!(
            self.model.dimensions > 0,
            "model.dimensions must be positive"
        );
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window_lines, 200);
        assert_eq!(config.overlap_lines, 30);
        assert_eq!(config.top_k, 6);
        assert_eq!(config.max_file_bytes, 2_000_000);
        assert_eq!(config.model.dimensions, 384);
        assert_eq!(config.model.name, "all-MiniLM-L6-v2");
        assert_eq!(config.ollama.timeout_secs, 120);
        assert_eq!(config.claude.model, "claude-3-5-sonnet-latest");
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"{"window_lines": 100, "top_k": 3}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.window_lines, 100);
        assert_eq!(config.top_k, 3);
        // Other fields should have defaults
        assert_eq!(config.overlap_lines, 30);
        assert_eq!(config.model.dimensions, 384);
    }

    #[test]
    fn test_validate_ok() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_window() {
        let mut config = Config::default();
        config.window_lines = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_overlap_ge_window_allowed() {
        let mut config = Config::default();
        config.overlap_lines = config.window_lines + 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.window_lines, config.window_lines);
        assert_eq!(parsed.ollama.base_url, config.ollama.base_url);
        assert_eq!(parsed.model.name, config.model.name);
    }
}
