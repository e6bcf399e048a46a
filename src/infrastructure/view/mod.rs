pub mod memory_table;
pub mod text_table;

pub use memory_table::{InMemoryResultsTable, StaticViewHost};
pub use text_table::render_text;
