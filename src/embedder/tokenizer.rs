//! Wrapper around the HuggingFace `tokenizers` crate for BERT-style
//! sentence-embedding models.

use std::path::Path;

use anyhow::Result;
use tokenizers::Tokenizer;

/// MiniLM sequence length cap.
const MAX_SEQUENCE_LENGTH: usize = 256;

pub struct SentenceTokenizer {
    inner: Tokenizer,
}

/// Encoded input for one text.
#[derive(Debug, Clone)]
pub struct Encoded {
    /// Token IDs (input_ids for the model).
    pub input_ids: Vec<i64>,
    /// Attention mask (1 for real tokens, 0 for padding).
    pub attention_mask: Vec<i64>,
}

impl SentenceTokenizer {
    /// Load a tokenizer from `tokenizer.json` in the model directory.
    pub fn from_model_dir(model_dir: &Path) -> Result<Self> {
        let tokenizer_path = model_dir.join("tokenizer.json");

        anyhow::ensure!(
            tokenizer_path.exists(),
            "tokenizer.json not found in {}",
            model_dir.display()
        );

        let mut inner = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("failed to load tokenizer: {e}"))?;

        let _ = inner.with_truncation(Some(tokenizers::TruncationParams {
            max_length: MAX_SEQUENCE_LENGTH,
            ..Default::default()
        }));
        inner.with_padding(Some(tokenizers::PaddingParams {
            ..Default::default()
        }));

        Ok(Self { inner })
    }

    /// Encode one text, returning token ids and the attention mask.
    pub fn encode(&self, text: &str) -> Result<Encoded> {
        let encoding = self
            .inner
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("failed to encode text: {e}"))?;

        Ok(Encoded {
            input_ids: encoding.get_ids().iter().map(|&id| id as i64).collect(),
            attention_mask: encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect(),
        })
    }

    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_missing_file() {
        let result = SentenceTokenizer::from_model_dir(Path::new("/nonexistent/path"));
        assert!(result.is_err());
    }

    /// Requires the actual tokenizer.json; run with `-- --ignored`.
    #[test]
    #[ignore]
    fn test_encode_with_real_model() {
        let model_dir = super::super::download::default_model_dir();
        if !model_dir.join("tokenizer.json").exists() {
            eprintln!("Skipping: model files not downloaded");
            return;
        }

        let tokenizer = SentenceTokenizer::from_model_dir(&model_dir).unwrap();
        let encoded = tokenizer.encode("Hello, world!").unwrap();

        assert!(!encoded.input_ids.is_empty());
        assert_eq!(encoded.input_ids.len(), encoded.attention_mask.len());
        // CLS and SEP wrap the text tokens
        assert!(encoded.input_ids.len() >= 3);
    }
}
