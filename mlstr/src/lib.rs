pub mod block;
pub mod error;
pub mod format;

pub use block::Block;
pub use error::Error;
pub use format::arg::FormatArg;
