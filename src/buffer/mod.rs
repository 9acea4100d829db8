mod rope;
mod wrap;

pub use rope::Buffer;
pub use wrap::{wrap_line, RowRef, Segments, WrapCache};
