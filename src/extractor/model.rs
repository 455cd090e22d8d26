use crate::error::ExtractionError;
use async_trait::async_trait;

/// A text-in, text-out language model
///
/// One call per run: no retries and no sampling knobs. Implementations
/// return the model's raw reply; parsing happens in
/// [`crate::extractor::RateExtractor`].
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send a prompt and return the reply text
    async fn complete(&self, prompt: &str) -> Result<String, ExtractionError>;
}

