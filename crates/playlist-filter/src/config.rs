use std::collections::BTreeSet;
use std::time::Duration;

use url::Url;

use crate::error::{FetchError, FilterError, Result};

pub const DEFAULT_SOURCE_URLS: &[&str] = &[
    "https://raw.githubusercontent.com/Jsnzkpg/Jsnzkpg/Jsnzkpg/Jsnzkpg1.m3u",
    "https://gh-proxy.org/https://raw.githubusercontent.com/Jsnzkpg/Jsnzkpg/Jsnzkpg/Jsnzkpg1.m3u",
];

pub const DEFAULT_GROUPS: &[&str] = &["[三网]央卫视直播", "[联通]咪视界直播"];

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (playlist-filter/1.0)";

pub const DEFAULT_OUTPUT_PATH: &str = "playlist.m3u";

/// The set of `group-title` values allowed through the filter.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    groups: BTreeSet<String>,
}

impl AllowList {
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn contains(&self, group_title: &str) -> bool {
        self.groups.contains(group_title)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

/// Immutable settings for one filter run.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Sources tried in order; the first successful response wins.
    pub source_urls: Vec<String>,

    pub allow_list: AllowList,

    /// Overall request timeout. `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,

    pub user_agent: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            source_urls: DEFAULT_SOURCE_URLS.iter().map(|s| s.to_string()).collect(),
            allow_list: AllowList::new(DEFAULT_GROUPS.iter().copied()),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl FilterConfig {
    pub fn builder() -> FilterConfigBuilder {
        FilterConfigBuilder::new()
    }

    /// Checks that at least one source is configured and every source is an http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if self.source_urls.is_empty() {
            return Err(FetchError::NoSources.into());
        }
        for source in &self.source_urls {
            parse_source_url(source)?;
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(FilterError::config("timeout must be greater than zero"));
        }
        Ok(())
    }
}

pub(crate) fn parse_source_url(raw: &str) -> std::result::Result<Url, FetchError> {
    let parsed =
        Url::parse(raw.trim()).map_err(|e| FetchError::invalid_url(raw, e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::invalid_url(
            raw,
            format!("unsupported scheme `{other}`"),
        )),
    }
}

/// Builder for [`FilterConfig`], starting from the built-in defaults.
#[derive(Debug, Default)]
pub struct FilterConfigBuilder {
    config: FilterConfig,
}

impl FilterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.source_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.allow_list = AllowList::new(groups);
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<FilterConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
