/// Formats a solve duration for display, without a unit suffix.
pub trait TimeFormatter: Send + Sync {
    fn format(&self, duration_ms: i64) -> String;
}
