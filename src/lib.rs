// Re-export modules
pub mod config;
pub mod crawlers;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod parsers;
pub mod pipeline;
pub mod results;
pub mod snapshot;

// Re-export commonly used types for convenience
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::Pipeline;
pub use results::{RateRecord, RawPage};
