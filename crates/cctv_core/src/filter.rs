use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_KEYWORD: &str = "CCTV";

static TEXT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:https?|rtmps?|rtsp)://[^\s"'<>,]+"#).expect("static url regex")
});

/// One entry of the stream-URL allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPattern {
    /// Path suffix such as `.m3u8`; query string and fragment are ignored.
    Extension(String),
    /// Leading protocol prefix such as `rtmp`.
    Scheme(String),
}

impl UrlPattern {
    pub fn extension(ext: impl Into<String>) -> Self {
        Self::Extension(ext.into().to_ascii_lowercase())
    }

    pub fn scheme(prefix: impl Into<String>) -> Self {
        Self::Scheme(prefix.into().to_ascii_lowercase())
    }

    /// Parse the config-file form: `.m3u8` is an extension, anything else a scheme prefix.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.starts_with('.') {
            Some(Self::extension(raw))
        } else {
            Some(Self::scheme(raw.trim_end_matches("://")))
        }
    }

    pub fn matches(&self, url: &str) -> bool {
        let lower = url.trim().to_ascii_lowercase();
        match self {
            UrlPattern::Extension(ext) => {
                let path = lower.split(['?', '#']).next().unwrap_or_default();
                path.ends_with(ext.as_str())
            }
            UrlPattern::Scheme(prefix) => lower.starts_with(prefix.as_str()),
        }
    }
}

/// Keyword and URL allow-list deciding which page content counts as a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFilter {
    keyword: String,
    keyword_upper: String,
    patterns: Vec<UrlPattern>,
}

impl StreamFilter {
    pub fn new(keyword: impl Into<String>, patterns: Vec<UrlPattern>) -> Self {
        let keyword = keyword.into();
        let keyword_upper = keyword.to_uppercase();
        Self {
            keyword,
            keyword_upper,
            patterns,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn patterns(&self) -> &[UrlPattern] {
        &self.patterns
    }

    /// Case-insensitive containment test of the keyword.
    pub fn matches_keyword(&self, text: &str) -> bool {
        text.to_uppercase().contains(&self.keyword_upper)
    }

    pub fn accepts_url(&self, url: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(url))
    }

    /// First URL-looking token in `text` that the allow-list accepts.
    pub fn find_url_in_text(&self, text: &str) -> Option<String> {
        TEXT_URL
            .find_iter(text)
            .map(|m| m.as_str())
            .find(|candidate| self.accepts_url(candidate))
            .map(str::to_string)
    }
}

impl Default for StreamFilter {
    fn default() -> Self {
        Self::new(
            DEFAULT_KEYWORD,
            vec![
                UrlPattern::extension(".m3u8"),
                UrlPattern::extension(".flv"),
                UrlPattern::scheme("rtmp"),
                UrlPattern::scheme("rtsp"),
            ],
        )
    }
}
