use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{AllowList, FilterConfig};
use crate::error::Result;
use crate::fetch::{HttpSource, PlaylistSource};
use crate::filter::filter_entries;
use crate::parser::{Playlist, PlaylistEntry};
use crate::writer::{render_playlist, write_playlist};

/// The header and allow-listed entries of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredPlaylist {
    pub header: String,
    pub entries: Vec<PlaylistEntry>,
    /// Number of well-formed entries seen in the source, before filtering.
    pub parsed: usize,
}

impl FilteredPlaylist {
    pub fn render(&self) -> String {
        render_playlist(&self.header, &self.entries)
    }

    pub fn kept_by_group(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.group_title.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Parses `text` and keeps the entries on `allow_list`. Pure; no I/O.
pub fn filter_document(text: &str, allow_list: &AllowList) -> FilteredPlaylist {
    let playlist = Playlist::parse(text);
    let mut parsed = 0;
    let entries = filter_entries(playlist.entries().inspect(|_| parsed += 1), allow_list).collect();

    FilteredPlaylist {
        header: playlist.header().to_owned(),
        entries,
        parsed,
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct FilterReport {
    pub source_url: String,
    pub output_path: PathBuf,
    pub parsed: usize,
    pub kept: usize,
    pub kept_by_group: BTreeMap<String, usize>,
}

/// Fetch, parse, filter and write, once.
pub struct FilterPipeline<S = HttpSource> {
    config: FilterConfig,
    source: S,
}

impl FilterPipeline<HttpSource> {
    pub fn new(config: FilterConfig) -> Result<Self> {
        config.validate()?;
        let source = HttpSource::new(&config)?;
        Ok(Self { config, source })
    }
}

impl<S: PlaylistSource> FilterPipeline<S> {
    pub fn with_source(config: FilterConfig, source: S) -> Self {
        Self { config, source }
    }

    /// Runs the pipeline, writing to `output_path`.
    ///
    /// The output file is only touched after a successful fetch.
    pub async fn run(&self, output_path: &Path) -> Result<FilterReport> {
        let document = self.source.fetch().await?;

        let filtered = filter_document(&document.text, &self.config.allow_list);
        drop(document.text);

        write_playlist(output_path, &filtered.render()).await?;

        let kept_by_group = filtered.kept_by_group();
        let kept = filtered.entries.len();
        info!(
            "Kept {} of {} entries, wrote {}",
            kept,
            filtered.parsed,
            output_path.display()
        );
        if kept == 0 {
            warn!("no entries matched the configured groups");
        }

        Ok(FilterReport {
            source_url: document.source_url,
            output_path: output_path.to_path_buf(),
            parsed: filtered.parsed,
            kept,
            kept_by_group,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, FilterError};
    use crate::fetch::FetchedDocument;
    use async_trait::async_trait;
    use proptest::prelude::*;

    const SCENARIO_INPUT: &str = "#EXTM3U\n\
        #EXTINF:-1 group-title=\"[三网]央卫视直播\",CCTV1\n\
        http://a/1\n\
        #EXTINF:-1 group-title=\"Other\",X\n\
        http://a/2\n";

    struct StaticSource(std::result::Result<&'static str, u16>);

    #[async_trait]
    impl PlaylistSource for StaticSource {
        async fn fetch(&self) -> std::result::Result<FetchedDocument, FetchError> {
            match self.0 {
                Ok(text) => Ok(FetchedDocument {
                    source_url: "http://static/list.m3u".to_owned(),
                    text: text.to_owned(),
                }),
                Err(code) => Err(FetchError::http_status(
                    reqwest::StatusCode::from_u16(code).unwrap(),
                    "http://static/list.m3u",
                )),
            }
        }
    }

    fn config_with_groups(groups: &[&str]) -> FilterConfig {
        FilterConfig::builder()
            .groups(groups.iter().copied())
            .build()
            .unwrap()
    }

    #[test]
    fn filters_scenario_document() {
        let allow = AllowList::new(["[三网]央卫视直播"]);
        let filtered = filter_document(SCENARIO_INPUT, &allow);
        assert_eq!(filtered.parsed, 2);
        assert_eq!(
            filtered.render(),
            "#EXTM3U\n#EXTINF:-1 group-title=\"[三网]央卫视直播\",CCTV1\nhttp://a/1\n"
        );
    }

    #[test]
    fn empty_allow_list_renders_header_only() {
        let filtered = filter_document(SCENARIO_INPUT, &AllowList::default());
        assert_eq!(filtered.render(), "#EXTM3U\n");
    }

    #[test]
    fn counts_kept_entries_per_group() {
        let text = "#EXTM3U\n\
            #EXTINF:-1 group-title=\"B\",1\nhttp://1\n\
            #EXTINF:-1 group-title=\"A\",2\nhttp://2\n\
            #EXTINF:-1 group-title=\"B\",3\nhttp://3\n";
        let filtered = filter_document(text, &AllowList::new(["A", "B"]));
        let counts: Vec<_> = filtered.kept_by_group().into_iter().collect();
        assert_eq!(counts, vec![("A".to_string(), 1), ("B".to_string(), 2)]);
    }

    #[tokio::test]
    async fn run_writes_filtered_output() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("playlist.m3u");
        let pipeline = FilterPipeline::with_source(
            config_with_groups(&["[三网]央卫视直播"]),
            StaticSource(Ok(SCENARIO_INPUT)),
        );

        let report = pipeline.run(&output).await.unwrap();
        assert_eq!(report.kept, 1);
        assert_eq!(report.parsed, 2);
        assert_eq!(report.source_url, "http://static/list.m3u");
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "#EXTM3U\n#EXTINF:-1 group-title=\"[三网]央卫视直播\",CCTV1\nhttp://a/1\n"
        );
    }

    #[tokio::test]
    async fn fetch_failure_leaves_output_untouched() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("playlist.m3u");
        std::fs::write(&output, "previous\n").unwrap();

        let pipeline =
            FilterPipeline::with_source(config_with_groups(&["Other"]), StaticSource(Err(500)));
        let err = pipeline.run(&output).await.unwrap_err();

        assert!(matches!(
            err,
            FilterError::Fetch(FetchError::HttpStatus { .. })
        ));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous\n");
    }

    fn entry_line() -> impl Strategy<Value = (String, String)> {
        (
            prop_oneof![Just("News"), Just("Sports"), Just("")],
            "[a-z]{1,6}",
        )
            .prop_map(|(group, name)| {
                (
                    format!("#EXTINF:-1 group-title=\"{group}\",{name}"),
                    format!("http://s/{name}"),
                )
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Filtering the same document twice yields byte-identical output.
        #[test]
        fn prop_filtering_is_idempotent(lines in prop::collection::vec(entry_line(), 0..30)) {
            let mut text = String::from("#EXTM3U\n");
            for (meta, url) in &lines {
                text.push_str(meta);
                text.push('\n');
                text.push_str(url);
                text.push('\n');
            }
            let allow = AllowList::new(["News"]);

            let first = filter_document(&text, &allow).render();
            let second = filter_document(&text, &allow).render();
            prop_assert_eq!(&first, &second);

            // Re-filtering the output is a fixed point.
            let refiltered = filter_document(&first, &allow);
            prop_assert_eq!(refiltered.render(), first);
        }

        /// Re-parsing an output entry's lines yields an equal entry.
        #[test]
        fn prop_output_entries_round_trip(lines in prop::collection::vec(entry_line(), 0..30)) {
            let mut text = String::from("#EXTM3U\n");
            for (meta, url) in &lines {
                text.push_str(&format!("{meta}\n{url}\n"));
            }
            let allow = AllowList::new(["News", "Sports"]);
            let filtered = filter_document(&text, &allow);

            for entry in &filtered.entries {
                let reparsed = PlaylistEntry::from_lines(&entry.raw_metadata_line, &entry.stream_url);
                prop_assert_eq!(&reparsed, entry);
            }
            let reparsed: Vec<_> = Playlist::parse(&filtered.render()).entries().collect();
            prop_assert_eq!(reparsed, filtered.entries);
        }
    }
}
