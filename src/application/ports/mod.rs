pub mod attempt_store;
pub mod clock;
pub mod link_encoder;
pub mod results_table;
pub mod time_formatter;

pub use attempt_store::AttemptStore;
pub use clock::Clock;
pub use link_encoder::{LinkEncoder, LinkRequest};
pub use results_table::{ResultsTable, ViewHost};
pub use time_formatter::TimeFormatter;
