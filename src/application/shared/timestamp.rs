use chrono::{DateTime, FixedOffset, Local, Timelike, Utc};

/// Formats attempt timestamps (epoch milliseconds) for the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampFormatter {
    offset: Option<FixedOffset>,
}

impl TimestampFormatter {
    pub fn local() -> Self {
        Self { offset: None }
    }

    pub fn utc() -> Self {
        Self {
            offset: FixedOffset::east_opt(0),
        }
    }

    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| Self {
            offset: Some(offset),
        })
    }

    pub fn from_config(utc_offset_minutes: Option<i32>) -> Self {
        utc_offset_minutes
            .and_then(Self::with_offset_minutes)
            .unwrap_or_else(Self::local)
    }

    fn resolve(&self, unix_ms: i64) -> Option<DateTime<FixedOffset>> {
        let utc = DateTime::<Utc>::from_timestamp_millis(unix_ms)?;
        Some(match self.offset {
            Some(offset) => utc.with_timezone(&offset),
            None => utc.with_timezone(&Local).fixed_offset(),
        })
    }

    /// `H:MM`, hour unpadded.
    pub fn time_of_day(&self, unix_ms: i64) -> String {
        self.resolve(unix_ms)
            .map(|dt| format!("{}:{:02}", dt.hour(), dt.minute()))
            .unwrap_or_default()
    }

    /// `YYYY-MM-DD`.
    pub fn date(&self, unix_ms: i64) -> String {
        self.resolve(unix_ms)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    /// `H:MM | YYYY-MM-DD`, the table's timestamp column.
    pub fn recorded_at(&self, unix_ms: i64) -> String {
        if self.resolve(unix_ms).is_none() {
            return String::new();
        }
        format!("{} | {}", self.time_of_day(unix_ms), self.date(unix_ms))
    }
}

impl Default for TimestampFormatter {
    fn default() -> Self {
        Self::local()
    }
}
