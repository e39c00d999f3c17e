use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

/// Synthara music generation service
#[derive(Debug, Parser)]
#[command(name = "synthara", about = "Generate songs, lyrics and cover art from text descriptions")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "synthara.toml", env = "SYNTHARA_CONFIG", global = true)]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "SYNTHARA_LISTEN", global = true)]
    pub listen: Option<SocketAddr>,

    /// Log filter used when the configuration sets none
    #[arg(long, default_value = "info", env = "SYNTHARA_LOG", global = true)]
    pub log_filter: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Request the demo track from a running server and save it
    Smoke(SmokeArgs),
}

#[derive(Debug, clap::Args)]
pub struct SmokeArgs {
    /// Base URL of the running server
    #[arg(long, env = "SYNTHARA_URL", default_value = "http://127.0.0.1:8000")]
    pub url: Url,

    /// Where to write the decoded WAV file
    #[arg(short, long, default_value = "response.wav")]
    pub output: PathBuf,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 900)]
    pub timeout_secs: u64,
}
