pub mod time_format;

pub use time_format::StatsTimeFormatter;
