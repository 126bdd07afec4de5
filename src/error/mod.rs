// Error types surfaced by format compilation and record output

mod display;
mod write;

// Re-export all public symbols
pub use display::*;
pub use write::*;
