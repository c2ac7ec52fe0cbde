use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use repolens::config::Config;
use repolens::embedder::download::{default_model_dir, ensure_model_files};
use repolens::embedder::onnx::OnnxEmbedder;
use repolens::providers::TextGenerator;
use repolens::providers::claude::ClaudeClient;
use repolens::providers::ollama::OllamaClient;
use repolens::qa::{Synthesis, answer_question};
use repolens::session::RepoSession;

#[derive(Parser)]
#[command(name = "repolens", version, about = "Semantic code retrieval over a repository")]
struct Cli {
    /// Path to a JSON config file.
    #[arg(long, default_value = "")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the semantic index for a repository and report its size.
    Analyze {
        /// Repository root directory.
        repo: PathBuf,
    },
    /// Index a repository, then answer a question about it.
    Ask {
        /// Repository root directory.
        repo: PathBuf,
        /// The question to answer.
        question: String,
        /// Synthesis provider.
        #[arg(long, value_enum, default_value_t = Provider::Local)]
        provider: Provider,
        /// Anthropic API key (required for --provider claude).
        #[arg(long, default_value = "")]
        api_key: String,
    },
}

#[derive(Copy, Clone, ValueEnum)]
enum Provider {
    /// No external LLM; concatenated snippets.
    Local,
    /// Local Ollama server.
    Ollama,
    /// Anthropic Claude API.
    Claude,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    config.validate()?;

    match cli.command {
        Command::Analyze { repo } => {
            let embedder = load_embedder(&config)?;
            let session = RepoSession::analyze(&repo, &embedder, &config)
                .context("failed to index repository")?;
            println!(
                "Indexed {} chunks ({} vectors, dim {})",
                session.chunks().len(),
                session.index().len(),
                session.index().dim()
            );
        }
        Command::Ask {
            repo,
            question,
            provider,
            api_key,
        } => {
            let embedder = load_embedder(&config)?;
            let session = RepoSession::analyze(&repo, &embedder, &config)
                .context("failed to index repository")?;

            let generator: Option<Box<dyn TextGenerator>> = match provider {
                Provider::Local => None,
                Provider::Ollama => Some(Box::new(OllamaClient::new(
                    &config.ollama.base_url,
                    &config.ollama.model,
                    config.ollama.timeout_secs,
                )?)),
                Provider::Claude => Some(Box::new(ClaudeClient::new(
                    &api_key,
                    &config.claude.model,
                    config.claude.max_tokens,
                )?)),
            };
            let synthesis = match &generator {
                None => Synthesis::Local,
                Some(g) => Synthesis::Remote(g.as_ref()),
            };

            let response =
                answer_question(&session, &question, &embedder, &synthesis, config.top_k)?;

            match response.answer {
                Ok(text) => println!("{text}"),
                // Provider failure degrades to its message; citations below still apply
                Err(e) => eprintln!("Error: {e}"),
            }

            if !response.citations.is_empty() {
                println!("\nCitations:");
                for c in &response.citations {
                    println!("- {c}");
                }
            }
        }
    }

    Ok(())
}

fn load_embedder(config: &Config) -> Result<OnnxEmbedder> {
    let model_dir = default_model_dir();
    ensure_model_files(&model_dir).context("failed to download embedding model")?;
    let embedder = OnnxEmbedder::new(&model_dir, config.model.dimensions)
        .context("failed to load embedding model")?;
    Ok(embedder)
}
