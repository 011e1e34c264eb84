//! Line-pairing M3U parser.
//!
//! An entry is an `#EXTINF` metadata line followed by the next non-empty,
//! non-comment line, which is taken as the stream URL. Other `#` directives
//! between the two (e.g. `#EXTVLCOPT`) are skipped and not kept. A metadata
//! line that never gets a URL is dropped.

use std::iter::FusedIterator;
use std::str::Lines;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

pub const EXTM3U: &str = "#EXTM3U";
pub const EXTINF: &str = "#EXTINF";

const BOM: char = '\u{feff}';

static GROUP_TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"group-title="([^"]*)""#).unwrap());

/// One channel: its metadata line and the stream URL that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub group_title: String,
    pub display_name: String,
    pub stream_url: String,
    pub raw_metadata_line: String,
}

impl PlaylistEntry {
    /// Builds an entry from an already trimmed metadata line and URL line.
    pub fn from_lines(metadata_line: &str, stream_url: &str) -> Self {
        Self {
            group_title: extract_group_title(metadata_line).to_owned(),
            display_name: extract_display_name(metadata_line).to_owned(),
            stream_url: stream_url.to_owned(),
            raw_metadata_line: metadata_line.to_owned(),
        }
    }
}

/// Returns the `group-title` attribute value, or `""` when absent.
pub fn extract_group_title(metadata_line: &str) -> &str {
    GROUP_TITLE_REGEX
        .captures(metadata_line)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}

/// Returns the text after the last comma, trimmed.
pub fn extract_display_name(metadata_line: &str) -> &str {
    metadata_line
        .rsplit_once(',')
        .map_or("", |(_, name)| name.trim())
}

#[inline]
fn normalize(line: &str) -> &str {
    line.trim_start_matches(BOM).trim()
}

/// A borrowed view over a playlist document.
///
/// Parsing is lazy: [`Playlist::entries`] walks the text on demand and can be
/// called again to restart from the top.
#[derive(Debug, Clone, Copy)]
pub struct Playlist<'a> {
    text: &'a str,
}

impl<'a> Playlist<'a> {
    pub fn parse(text: &'a str) -> Self {
        Self { text }
    }

    /// The first `#EXTM3U` line with its attributes, or a bare `#EXTM3U` if the document has none.
    pub fn header(&self) -> &'a str {
        self.text
            .lines()
            .map(normalize)
            .find(|line| line.starts_with(EXTM3U))
            .unwrap_or(EXTM3U)
    }

    pub fn entries(&self) -> Entries<'a> {
        Entries {
            lines: self.text.lines(),
            pending: None,
        }
    }
}

/// Iterator over the entries of a [`Playlist`].
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    lines: Lines<'a>,
    pending: Option<&'a str>,
}

impl Iterator for Entries<'_> {
    type Item = PlaylistEntry;

    fn next(&mut self) -> Option<Self::Item> {
        for raw in self.lines.by_ref() {
            let line = normalize(raw);
            if line.is_empty() {
                continue;
            }

            if line.starts_with(EXTINF) {
                if let Some(dropped) = self.pending.replace(line) {
                    trace!("Dropping metadata line without stream URL: {dropped}");
                }
                continue;
            }

            if line.starts_with('#') {
                continue;
            }

            match self.pending.take() {
                Some(metadata) => return Some(PlaylistEntry::from_lines(metadata, line)),
                None => trace!("Ignoring line outside of any entry: {line}"),
            }
        }

        if let Some(dropped) = self.pending.take() {
            trace!("Dropping trailing metadata line: {dropped}");
        }
        None
    }
}

impl FusedIterator for Entries<'_> {}
