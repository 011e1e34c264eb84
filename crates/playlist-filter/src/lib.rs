//! # Playlist Filter Engine
//!
//! Fetches a remote M3U playlist and keeps only the entries whose
//! `group-title` is on an allow-list.
//!
//! The pipeline runs once per call, strictly in order:
//!
//! - [`fetch`]: HTTP GET against each configured source until one succeeds
//! - [`parser`]: lazy pairing of `#EXTINF` lines with their stream URLs
//! - [`filter`]: exact, case-sensitive `group-title` matching
//! - [`writer`]: header plus retained entries, written over the output file
//!
//! ```
//! use playlist_filter_engine::{AllowList, filter_document};
//!
//! let text = "#EXTM3U\n#EXTINF:-1 group-title=\"News\",A\nhttp://a\n#EXTINF:-1 group-title=\"Other\",B\nhttp://b\n";
//! let filtered = filter_document(text, &AllowList::new(["News"]));
//! assert_eq!(filtered.render(), "#EXTM3U\n#EXTINF:-1 group-title=\"News\",A\nhttp://a\n");
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod parser;
pub mod pipeline;
pub mod writer;

pub use config::{AllowList, FilterConfig, FilterConfigBuilder};
pub use error::{FetchError, FilterError, Result};
pub use fetch::{FetchedDocument, HttpSource, PlaylistSource};
pub use filter::filter_entries;
pub use parser::{Playlist, PlaylistEntry};
pub use pipeline::{FilterPipeline, FilterReport, FilteredPlaylist, filter_document};
pub use writer::{render_playlist, write_playlist};
