use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};

/// Asia/Shanghai has no daylight saving, so a fixed +08:00 offset is exact.
pub const SHANGHAI_OFFSET_SECS: i32 = 8 * 3600;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Source of "now" in the civil time zone used for logs, file headers and date queries.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn shanghai() -> Self {
        Self::with_offset(shanghai_offset())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::shanghai()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Always returns the same instant. Used to make output deterministic.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    /// Build from a Shanghai civil time; `None` for an invalid date/time.
    pub fn shanghai(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        shanghai_offset()
            .with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

pub fn shanghai_offset() -> FixedOffset {
    FixedOffset::east_opt(SHANGHAI_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

pub fn format_timestamp(at: &DateTime<FixedOffset>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
