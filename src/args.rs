use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rate-snapshot")]
#[command(about = "Scrapes the latest USD and gold rates from a public channel into a JSON snapshot")]
#[command(
    long_about = "Scrapes the latest USD and gold rates from a public channel into a JSON snapshot.\n\n\
                  Run with no arguments: that is the supported invocation. It fetches the feed once, \
                  writes data.json in the working directory and exits non-zero on any failure. \
                  The options below only override those defaults for local testing."
)]
#[command(version)]
pub struct Args {
    /// JSON configuration file (all fields optional); defaults apply when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Snapshot path, overriding the configuration; defaults to data.json
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
