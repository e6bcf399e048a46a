pub mod alg;
pub mod clock;
pub mod database;
pub mod stats;
pub mod view;

pub use alg::AlgCubingNetEncoder;
pub use clock::SystemClock;
pub use database::{ConnectionPool, SqliteAttemptStore};
pub use stats::StatsTimeFormatter;
pub use view::{InMemoryResultsTable, StaticViewHost, render_text};
