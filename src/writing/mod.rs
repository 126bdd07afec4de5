//! Record output: the write session, its internal buffer, and its sinks

mod fixed;
mod flags;
mod record;
mod session;
mod sink;

// Re-export all public symbols
pub use fixed::*;
pub use flags::*;
pub use record::*;
pub use session::*;
pub use sink::*;
