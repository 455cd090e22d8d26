use thiserror::Error;

/// Errors that end a pipeline run.
///
/// Every variant is fatal: the run stops and the existing snapshot is left
/// as it was.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The feed page could not be retrieved
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Neither message nodes nor the page body produced usable text
    #[error("no extractable text found on the feed page")]
    NoText,

    /// The language model call failed or returned an unusable record
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// The snapshot could not be persisted
    #[error("snapshot write failed: {0}")]
    Write(#[from] SnapshotError),
}

/// Errors raised while retrieving the feed page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout)
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Errors raised by the extraction step.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The model endpoint could not be reached or its body could not be read
    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The model endpoint answered with a non-success status
    #[error("model API returned HTTP {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The model answered but produced no text
    #[error("model returned no text")]
    EmptyResponse,

    /// The response text is not JSON
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The response is JSON but not an object
    #[error("response is not a JSON object (got {found})")]
    NotAnObject { found: &'static str },

    /// A field has the wrong type or an out-of-range value
    #[error("field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Errors raised while persisting the snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while building the configuration, before any run starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid feed URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no API key configured (set GEMINI_API_KEY or `api_key` in the config file)")]
    MissingApiKey,

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
