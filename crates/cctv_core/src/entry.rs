/// One channel-name / stream-URL pair found on the scraped page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamEntry {
    pub channel: String,
    pub url: String,
}

impl StreamEntry {
    pub fn new(channel: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            url: url.into(),
        }
    }

    /// Data line in the output file: `channel,url`. Commas in the channel are kept as-is.
    pub fn to_line(&self) -> String {
        format!("{},{}", self.channel, self.url)
    }
}

/// Final, deduplicated result of a single run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOutcome {
    pub entries: Vec<StreamEntry>,
    pub found_any: bool,
}

impl RunOutcome {
    pub fn new(entries: Vec<StreamEntry>) -> Self {
        let found_any = !entries.is_empty();
        Self { entries, found_any }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
