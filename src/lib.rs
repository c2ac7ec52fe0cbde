//! # repolens — semantic code retrieval
//!
//! Turns a cloned repository into a queryable in-memory semantic index
//! and answers natural-language questions with grounded, cited output.
//!
//! ## Architecture
//!
//! - **[`config`]** — Configuration loading, validation, and defaults
//! - **[`selector`]** — Candidate file selection with deny-set pruning
//! - **[`chunker`]** — Overlapping line-window chunking
//! - **[`embedder`]** — Text embedding via ONNX Runtime (all-MiniLM-L6-v2)
//! - **[`index`]** — Flat in-memory inner-product index
//! - **[`session`]** — Per-repository build of chunks + vectors
//! - **[`rag`]** — Top-k retrieval and citation formatting
//! - **[`qa`]** — Answer assembly (local fallback / grounded synthesis)
//! - **[`providers`]** — Text generation (local Ollama, remote Claude)
//! - **[`entrypoints`]** — Deterministic framework/entry-point detection

pub mod chunker;
pub mod config;
pub mod embedder;
pub mod entrypoints;
pub mod index;
pub mod providers;
pub mod qa;
pub mod rag;
pub mod selector;
pub mod session;
