use std::fmt;

/// Failures detected while a record is being written. These never escape a
/// session as control flow; the first one is kept and reported through the
/// status object when the session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// The destination refused the committed record.
    Sink(String),
    /// The active descriptor cannot render a value of this kind.
    Unsupported {
        descriptor: String,
        value: &'static str,
    },
    /// A value was pushed but the format offers no descriptor to consume it.
    Exhausted,
}

impl WriteError {
    /// Legacy IOSTAT style code, always positive for an error.
    pub fn code(&self) -> i32 {
        match self {
            WriteError::Sink(_) => 1,
            WriteError::Unsupported { .. } => 2,
            WriteError::Exhausted => 3,
        }
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::Sink(details) => write!(f, "failed writing record: {}", details),
            WriteError::Unsupported { descriptor, value } => {
                write!(f, "{} value cannot be written with {}", value, descriptor)
            }
            WriteError::Exhausted => write!(f, "format has no descriptor for value"),
        }
    }
}

impl std::error::Error for WriteError {}
