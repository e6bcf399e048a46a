pub mod connection_pool;
pub mod queries;
pub mod sqlite_attempt_store;

pub use connection_pool::ConnectionPool;
pub use sqlite_attempt_store::SqliteAttemptStore;
