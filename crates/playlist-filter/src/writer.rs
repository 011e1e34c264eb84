use std::path::Path;

use tracing::debug;

use crate::error::{FilterError, Result};
use crate::parser::PlaylistEntry;

/// Renders the header followed by each entry's metadata line and stream URL.
///
/// Lines are always joined with `\n` and the text ends with a newline.
pub fn render_playlist<'a, I>(header: &str, entries: I) -> String
where
    I: IntoIterator<Item = &'a PlaylistEntry>,
{
    let mut out = String::with_capacity(header.len() + 1);
    out.push_str(header);
    out.push('\n');
    for entry in entries {
        out.push_str(&entry.raw_metadata_line);
        out.push('\n');
        out.push_str(&entry.stream_url);
        out.push('\n');
    }
    out
}

/// Overwrites `path` with `contents`, creating missing parent directories.
pub async fn write_playlist(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| FilterError::io(parent, e))?;
    }

    tokio::fs::write(path, contents)
        .await
        .map_err(|e| FilterError::io(path, e))?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
