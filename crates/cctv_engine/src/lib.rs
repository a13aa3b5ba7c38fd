//! CCTV scraper engine: fetching, extraction, persistence and the run pipeline.
mod clock;
mod debug_dump;
mod decode;
mod endpoints;
mod extract;
mod fetch;
mod output;
mod persist;
mod pipeline;
mod publish;
mod retry;
mod types;

pub use clock::{
    format_timestamp, shanghai_offset, Clock, FixedClock, SystemClock, FILE_STAMP_FORMAT,
    TIMESTAMP_FORMAT,
};
pub use debug_dump::{debug_artifact_name, dump_debug_body};
pub use decode::{decode_body, DecodedBody};
pub use endpoints::{build_endpoints, DateQuery, EndpointError, DATE_QUERY_PARAM, DEFAULT_ENDPOINTS};
pub use extract::{
    parse_selector, ExtractContext, ExtractionStrategy, Extractor, FlatLinkScan, SelectorError,
    StructuredScan, DEFAULT_CONTAINER_SELECTOR, DEFAULT_LINK_SELECTOR, DEFAULT_TITLE_SELECTOR,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_USER_AGENT};
pub use output::{write_stream_file, WriteError, WriteSummary, DEFAULT_OUTPUT_FILE};
pub use persist::{ensure_dir, parent_dir, write_atomically, PersistError};
pub use pipeline::{RunReport, Scraper, ScraperConfig};
pub use publish::{GitPublisher, PublishError, Publisher};
pub use retry::{fetch_first_available, RetryPolicy};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchResult};
