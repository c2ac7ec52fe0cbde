//! Remote Anthropic messages-API provider.
//!
//! Requires a caller-supplied API key. Quota/billing failures are
//! classified into their own error kind so the caller can render the
//! guidance text without string matching. No request timeout is
//! configured for this provider.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::{ProviderError, TextGenerator};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug)]
pub struct ClaudeClient {
    api_key: String,
    model: String,
    max_tokens: u32,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl ClaudeClient {
    /// Build a client. An absent or blank key fails immediately with
    /// `MissingCredential` so no request is ever attempted without one.
    pub fn new(api_key: &str, model: &str, max_tokens: u32) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingCredential(
                "Claude API key is required for this provider.".to_string(),
            ));
        }

        Ok(Self {
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
            max_tokens,
            client: reqwest::blocking::Client::new(),
        })
    }
}

impl TextGenerator for ClaudeClient {
    fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        debug!("POST {API_URL} (model: {})", self.model);

        let resp = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&MessagesRequest {
                model: &self.model,
                max_tokens: self.max_tokens,
                messages: vec![json!({"role": "user", "content": prompt})],
            })
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ProviderError::Connection(format!("Could not reach the Anthropic API: {e}"))
                } else {
                    ProviderError::Request(format!("Claude API error: {e}"))
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(classify_api_error(status.as_u16(), &body));
        }

        let body: MessagesResponse = resp
            .json()
            .map_err(|e| ProviderError::Request(format!("Claude API error: invalid response: {e}")))?;

        let text = body
            .content
            .first()
            .map(|block| block.text.clone())
            .unwrap_or_default();

        Ok(text)
    }
}

/// Map a non-success API response to an error kind.
pub(crate) fn classify_api_error(status: u16, body: &str) -> ProviderError {
    if body.contains("credit balance is too low") {
        ProviderError::Quota(
            "Your Anthropic credit balance is too low. Please add credits at console.anthropic.com to continue using Claude."
                .to_string(),
        )
    } else {
        ProviderError::Request(format!("Claude API error (status {status}): {body}"))
    }
}
