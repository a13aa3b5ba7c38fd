#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use cctv_engine::{FailureKind, FetchError, FetchMetadata, FetchResult, Fetcher, PublishError, Publisher};

/// Answers per URL from a fixed table; unknown URLs fail with a network error.
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(body) => Ok(FetchResult {
                body: body.clone(),
                metadata: FetchMetadata {
                    original_url: url.to_string(),
                    final_url: url.to_string(),
                    status: 200,
                    content_type: Some("text/html; charset=utf-8".to_string()),
                    encoding_label: "UTF-8".to_string(),
                    byte_len: body.len() as u64,
                },
            }),
            None => Err(FetchError::new(FailureKind::Network, "connection refused")),
        }
    }
}

/// Records published paths; optionally fails every call.
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    pub published: Arc<Mutex<Vec<PathBuf>>>,
    pub fail: bool,
}

impl Publisher for RecordingPublisher {
    fn publish(&self, file: &Path) -> Result<(), PublishError> {
        self.published.lock().unwrap().push(file.to_path_buf());
        if self.fail {
            return Err(PublishError::Failed {
                step: "push".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "rejected".to_string(),
            });
        }
        Ok(())
    }
}

pub const CCTV_TABLE: &str = r#"
<html><body>
  <table>
    <tr><td>CCTV-1 综合</td><td><a href="http://example.com/live.m3u8"></a></td></tr>
  </table>
</body></html>
"#;
