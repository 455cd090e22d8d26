use crate::config::PipelineConfig;
use crate::crawlers::crawler::PageSource;
use crate::error::{ConfigError, FetchError};
use crate::results::RawPage;
use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use std::time::Duration;

/// Fetches feed pages over HTTP with a browser-like identity
///
/// Public channel previews serve a reduced page to clients that do not
/// look like a browser, so the user agent and language header are set on
/// every request.
#[derive(Debug, Clone)]
pub struct WebFetcher {
    client: reqwest::Client,
}

impl WebFetcher {
    /// Build a fetcher from the pipeline configuration
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
            headers.insert(ACCEPT_LANGUAGE, value);
        } else {
            ::log::warn!(
                "Ignoring invalid Accept-Language value: {:?}",
                config.accept_language
            );
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);

        // Transport default unless configured
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl PageSource for WebFetcher {
    async fn fetch_page(&self, url: &str) -> Result<RawPage, FetchError> {
        ::log::info!("Fetching feed page: {}", url);

        let request_err = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let html = response.text().await.map_err(request_err)?;
        ::log::debug!("Fetched {} bytes from {}", html.len(), url);

        Ok(RawPage::new(url, html))
    }
}
