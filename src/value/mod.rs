//! Values that can be written into a record

mod array;
mod scalar;
mod writable;

// Re-export all public symbols
pub use array::*;
pub use scalar::*;
pub use writable::*;
