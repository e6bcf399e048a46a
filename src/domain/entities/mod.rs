pub mod attempt;
pub mod display_row;
pub mod sync_batch;

pub use attempt::{AttemptDraft, AttemptRecord, AttemptRef, ReplicatedDocument};
pub use display_row::{
    DeleteControl, DisplayRow, LinkError, SOLUTION_LINK_GLYPH, ScrambleCell, SolutionCell,
};
pub use sync_batch::{ChangedDocument, SyncBatch, SyncDirection};
