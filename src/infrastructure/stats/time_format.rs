use crate::application::ports::time_formatter::TimeFormatter;

const MS_PER_SECOND: u64 = 1000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Timer-style durations: `S.cc`, `M:SS.cc` or `H:MM:SS.cc`, centiseconds truncated.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsTimeFormatter;

impl StatsTimeFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl TimeFormatter for StatsTimeFormatter {
    fn format(&self, duration_ms: i64) -> String {
        let sign = if duration_ms < 0 { "-" } else { "" };
        let mut remaining = duration_ms.unsigned_abs();

        let hours = remaining / MS_PER_HOUR;
        remaining %= MS_PER_HOUR;
        let minutes = remaining / MS_PER_MINUTE;
        remaining %= MS_PER_MINUTE;
        let seconds = remaining / MS_PER_SECOND;
        let centiseconds = (remaining % MS_PER_SECOND) / 10;

        if hours > 0 {
            format!("{sign}{hours}:{minutes:02}:{seconds:02}.{centiseconds:02}")
        } else if minutes > 0 {
            format!("{sign}{minutes}:{seconds:02}.{centiseconds:02}")
        } else {
            format!("{sign}{seconds}.{centiseconds:02}")
        }
    }
}
