use crate::config::PipelineConfig;
use crate::crawlers::{PageSource, WebFetcher};
use crate::error::{ConfigError, PipelineError};
use crate::extractor::RateExtractor;
use crate::extractor::gemini::GeminiClient;
use crate::extractor::model::LanguageModel;
use crate::parsers::MessageSelector;
use crate::results::RateRecord;
use crate::snapshot::SnapshotWriter;

/// The fetch → select → extract → write pipeline
///
/// Stages run one after another; the first error ends the run and nothing
/// is written.
pub struct Pipeline<S, M> {
    feed_url: String,
    source: S,
    selector: MessageSelector,
    extractor: RateExtractor<M>,
    writer: SnapshotWriter,
}

impl Pipeline<WebFetcher, GeminiClient> {
    /// Wire the HTTP fetcher and the Gemini client from a configuration
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            config,
            WebFetcher::from_config(config)?,
            GeminiClient::from_config(config)?,
        ))
    }
}

impl<S: PageSource, M: LanguageModel> Pipeline<S, M> {
    /// Create a pipeline over explicit fetch and model implementations
    pub fn new(config: &PipelineConfig, source: S, model: M) -> Self {
        Self {
            feed_url: config.feed_url.clone(),
            source,
            selector: MessageSelector::default(),
            extractor: RateExtractor::new(model),
            writer: SnapshotWriter::new(&config.output_path),
        }
    }

    /// Replace the message selector
    pub fn with_selector(mut self, selector: MessageSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn writer(&self) -> &SnapshotWriter {
        &self.writer
    }

    /// Run once. On success the snapshot has been replaced with the
    /// returned record.
    pub async fn run(&self) -> Result<RateRecord, PipelineError> {
        let page = self.source.fetch_page(&self.feed_url).await?;

        let selected = self.selector.select_text(&page)?;
        if selected.text.trim().is_empty() {
            return Err(PipelineError::NoText);
        }
        ::log::debug!("Selected text:\n{}", selected.text);

        let record = self.extractor.extract(&selected.text).await?;
        ::log::debug!("Extracted record: {:?}", record);

        self.writer.write(&record)?;
        Ok(record)
    }
}
