use crate::error::FetchError;
use crate::results::RawPage;
use async_trait::async_trait;

/// Source of the feed page for a run
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Retrieve the page at `url`. Non-success responses are errors.
    async fn fetch_page(&self, url: &str) -> Result<RawPage, FetchError>;
}

