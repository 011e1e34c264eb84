use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "playlist-filter",
    about = "Fetch a remote M3U playlist and keep only allow-listed group-title entries",
    version
)]
pub struct Args {
    /// Output playlist file path [default: playlist.m3u]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Source M3U URL. Can be given multiple times; sources are tried in order
    #[arg(long = "source-url", value_name = "URL")]
    pub source_urls: Vec<String>,

    /// group-title value to keep. Can be given multiple times
    #[arg(short, long = "group", value_name = "TITLE")]
    pub groups: Vec<String>,

    /// Request timeout in seconds (HTTP client default when unset)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Configuration file path (TOML)
    #[arg(short, long, env = "PLAYLIST_FILTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
