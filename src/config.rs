use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable holding the model API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuration for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Public feed page to scrape
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// User-Agent sent with the feed request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language sent with the feed request
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Request timeout in seconds (transport default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Base URL of the model API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model name used for extraction
    #[serde(default = "default_model")]
    pub model: String,

    /// API key for the model; filled from the environment when absent
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Where the snapshot is written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

/// Default value for feed_url
fn default_feed_url() -> String {
    "https://t.me/s/goldcurrencyupdate".to_string()
}

/// Default value for user_agent (desktop Chrome)
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

/// Default snapshot location, relative to the working directory
fn default_output_path() -> PathBuf {
    PathBuf::from("data.json")
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            feed_url: default_feed_url(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            timeout_secs: None,
            api_base: default_api_base(),
            model: default_model(),
            api_key: None,
            output_path: default_output_path(),
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let read_err = |source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        };

        let mut file = File::open(path).map_err(read_err)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(read_err)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Fill the API key from the environment unless one is already set
    pub fn with_env(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        }
        self
    }

    /// Override the snapshot path
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Check that the configuration can drive a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.feed_url).map_err(|source| ConfigError::InvalidUrl {
            url: self.feed_url.clone(),
            source,
        })?;

        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::MissingApiKey),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = PipelineConfig::from_json("{}").unwrap();
        assert_eq!(config.feed_url, "https://t.me/s/goldcurrencyupdate");
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.output_path, PathBuf::from("data.json"));
        assert!(config.timeout_secs.is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{"feed_url": "https://example.com/feed", "timeout_secs": 20, "api_key": "k"}"#;
        let config = PipelineConfig::from_json(json).unwrap();
        assert_eq!(config.feed_url, "https://example.com/feed");
        assert_eq!(config.timeout_secs, Some(20));
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.accept_language, "en-US,en;q=0.9");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_key_is_never_serialized() {
        let mut config = PipelineConfig::new();
        config.api_key = Some("secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_validate_rejects_missing_key() {
        let config = PipelineConfig::new();
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));

        let mut blank = PipelineConfig::new();
        blank.api_key = Some("   ".to_string());
        assert!(matches!(blank.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = PipelineConfig::new();
        config.api_key = Some("k".to_string());
        config.feed_url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_from_file_missing() {
        let err = PipelineConfig::from_file("/nonexistent/rates.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_explicit_key_wins_over_env() {
        let mut config = PipelineConfig::new();
        config.api_key = Some("from-file".to_string());
        let config = config.with_env();
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }
}
