use std::path::{Path, PathBuf};
use std::time::Duration;

use playlist_filter_engine::FilterConfig;
use playlist_filter_engine::config::DEFAULT_OUTPUT_PATH;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::cli::Args;
use crate::error::{AppError, Result};

/// Settings read from the optional TOML configuration file.
///
/// Every field is optional; missing values fall back to built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Source playlist URLs, tried in order
    pub source_urls: Option<Vec<String>>,

    /// group-title values to keep
    pub groups: Option<Vec<String>>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// User agent string for requests
    pub user_agent: Option<String>,

    /// Output playlist file path
    pub output: Option<PathBuf>,
}

impl FileConfig {
    /// Load configuration from `config_path`, or defaults when no path is given.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let Some(path) = config_path else {
            return Ok(Self::default());
        };

        if !path.exists() {
            warn!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub filter: FilterConfig,
    pub output: PathBuf,
}

/// Merges command-line flags over the config file over built-in defaults.
pub fn resolve(args: &Args, file: FileConfig) -> Result<Settings> {
    let mut builder = FilterConfig::builder();

    if !args.source_urls.is_empty() {
        builder = builder.source_urls(args.source_urls.iter().cloned());
    } else if let Some(urls) = file.source_urls {
        builder = builder.source_urls(urls);
    }

    if !args.groups.is_empty() {
        builder = builder.groups(args.groups.iter().cloned());
    } else if let Some(groups) = file.groups {
        builder = builder.groups(groups);
    }

    match args.timeout.or(file.timeout_secs) {
        Some(0) => {
            return Err(AppError::InvalidInput(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Some(secs) => builder = builder.timeout(Some(Duration::from_secs(secs))),
        None => {}
    }

    if let Some(user_agent) = file.user_agent {
        builder = builder.user_agent(user_agent);
    }

    let output = args
        .output
        .clone()
        .or(file.output)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

    Ok(Settings {
        filter: builder.build()?,
        output,
    })
}
