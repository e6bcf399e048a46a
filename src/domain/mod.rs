pub mod entities;
pub mod value_objects;

pub use entities::{AttemptRecord, AttemptRef, DisplayRow, SyncBatch};
pub use value_objects::{AttemptId, Revision};
