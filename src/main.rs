use clap::Parser;
use rate_snapshot::{Pipeline, PipelineConfig};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // .env may set RUST_LOG, so it must be loaded before the logger
    let dotenv_result = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    if let Err(e) = dotenv_result {
        if !e.not_found() {
            ::log::warn!("Failed to load .env: {}", e);
        }
    }

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = match Pipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            ::log::error!("Failed to set up pipeline: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!("Starting run for {}", config.feed_url);
    let start_time = std::time::Instant::now();

    match pipeline.run().await {
        Ok(record) => {
            ::log::info!(
                "Run complete in {:.2} seconds, wrote {}: {:?}",
                start_time.elapsed().as_secs_f64(),
                pipeline.writer().path().display(),
                record
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Run failed, previous snapshot kept: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<PipelineConfig, rate_snapshot::error::ConfigError> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::new(),
    };
    if let Some(output) = &args.output {
        config = config.with_output_path(output);
    }
    Ok(config.with_env())
}
