pub mod attempt_id;

pub use attempt_id::{AttemptId, Revision};
