//! Local Ollama provider.
//!
//! Talks to a locally running Ollama server over HTTP. Calls carry a
//! fixed timeout; a server that is not running surfaces as a
//! `Connection` error with install guidance.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ProviderError, TextGenerator};

pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        })
    }
}

impl TextGenerator for OllamaClient {
    fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        debug!("POST {url} (model: {})", self.model);

        let resp = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .map_err(classify_transport_error)?;

        let resp = resp
            .error_for_status()
            .map_err(|e| ProviderError::Request(format!("Ollama error: {e}")))?;

        let body: GenerateResponse = resp
            .json()
            .map_err(|e| ProviderError::Request(format!("Ollama error: invalid response: {e}")))?;

        Ok(body.response)
    }
}

fn classify_transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(
            "Ollama request timed out. The model may be loading or the prompt is too long."
                .to_string(),
        )
    } else if e.is_connect() {
        ProviderError::Connection(
            "Could not connect to Ollama. Please install Ollama from https://ollama.com and run: ollama serve"
                .to_string(),
        )
    } else {
        ProviderError::Request(format!("Ollama error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = OllamaClient::new("http://localhost:11434/", "llama3.1:8b", 120).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_generate_against_unreachable_server() {
        // Port 9 (discard) refuses connections on any sane host
        let client = OllamaClient::new("http://127.0.0.1:9", "llama3.1:8b", 2).unwrap();
        let err = client.generate("hello").unwrap_err();
        assert!(
            matches!(err, ProviderError::Connection(_) | ProviderError::Timeout(_)),
            "expected connection-class failure, got: {err}"
        );
    }
}
