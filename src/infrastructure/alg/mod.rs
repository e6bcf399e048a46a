pub mod encoder;
pub mod parser;

pub use encoder::AlgCubingNetEncoder;
pub use parser::{ParseError, Sequence, parse};
