//! CCTV scraper core: pure data model, filtering, dedupe and output rendering.
mod dedupe;
mod document;
mod entry;
mod filter;
mod label;

pub use dedupe::dedupe_entries;
pub use document::{render_document, FORMAT_DESCRIPTION};
pub use entry::{RunOutcome, StreamEntry};
pub use filter::{StreamFilter, UrlPattern, DEFAULT_KEYWORD};
pub use label::{normalize_label, MAX_LABEL_CHARS};
