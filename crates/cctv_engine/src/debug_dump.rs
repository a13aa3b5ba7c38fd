use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use scrape_logging::{scrape_info, scrape_warn};

use crate::clock::FILE_STAMP_FORMAT;
use crate::persist::write_atomically;

/// `debug_<YYYYmmdd_HHMMSS>.html`
pub fn debug_artifact_name(at: &DateTime<FixedOffset>) -> String {
    format!("debug_{}.html", at.format(FILE_STAMP_FORMAT))
}

/// Save a raw response body for later inspection.
///
/// Diagnostic only: failures are logged and reported as `None`.
pub fn dump_debug_body(dir: &Path, at: &DateTime<FixedOffset>, body: &str) -> Option<PathBuf> {
    let target = dir.join(debug_artifact_name(at));
    match write_atomically(&target, body) {
        Ok(path) => {
            scrape_info!("Saved raw response to {:?}", path);
            Some(path)
        }
        Err(err) => {
            scrape_warn!("Could not save debug artifact {:?}: {}", target, err);
            None
        }
    }
}
