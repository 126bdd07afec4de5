//! Formatted record output driven by legacy edit descriptor formats.
//!
//! A [`Session`](writing::Session) renders one output record: values are
//! pushed through a compiled [`Format`](format::Format), and when the session
//! ends the record is committed to its sink exactly once.

pub mod error;
pub mod format;
pub mod value;
pub mod writing;
