use std::path::{Path, PathBuf};

use cctv_core::{render_document, StreamEntry};
use chrono::{DateTime, FixedOffset};
use scrape_logging::scrape_info;

use crate::clock::format_timestamp;
use crate::persist::{write_atomically, PersistError};

pub const DEFAULT_OUTPUT_FILE: &str = "CCTV.txt";

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to write {path:?}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: PersistError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub path: PathBuf,
    pub entry_count: usize,
    pub placeholder: bool,
}

/// Write the stream list (or the placeholder for an empty list), replacing any previous file.
pub fn write_stream_file(
    path: &Path,
    entries: &[StreamEntry],
    generated_at: &DateTime<FixedOffset>,
    keyword: &str,
) -> Result<WriteSummary, WriteError> {
    let document = render_document(entries, &format_timestamp(generated_at), keyword);
    let path = write_atomically(path, &document).map_err(|source| WriteError::Persist {
        path: path.to_path_buf(),
        source,
    })?;

    if entries.is_empty() {
        scrape_info!("No {} streams found; wrote placeholder {:?}", keyword, path);
    } else {
        scrape_info!("Saved {} {} stream(s) to {:?}", entries.len(), keyword, path);
    }

    Ok(WriteSummary {
        path,
        entry_count: entries.len(),
        placeholder: entries.is_empty(),
    })
}
