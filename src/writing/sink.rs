use std::fmt;
use std::io;

use crate::error::WriteError;
use crate::writing::FixedString;

/// Where a finished record goes. Nothing reaches the destination until the
/// session commits, which happens exactly once.
pub enum Sink<'s> {
    /// Written through and flushed.
    Stream(&'s mut dyn io::Write),
    /// Assigned, replacing the previous contents.
    Text(&'s mut String),
    /// Assigned with blank padding or truncation to its fixed length.
    Fixed(&'s mut FixedString),
}

impl<'s> Sink<'s> {
    pub fn stream(stream: &'s mut dyn io::Write) -> Sink<'s> {
        Sink::Stream(stream)
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Sink::Stream(_))
    }

    /// In-memory targets hold exactly one record and never get a terminator.
    pub fn is_internal(&self) -> bool {
        !self.is_stream()
    }

    pub(crate) fn commit(&mut self, text: &str) -> Result<(), WriteError> {
        match self {
            Sink::Stream(stream) => stream
                .write_all(text.as_bytes())
                .and_then(|_| stream.flush())
                .map_err(|error| WriteError::Sink(error.to_string())),
            Sink::Text(target) => {
                target.clear();
                target.push_str(text);
                Ok(())
            }
            Sink::Fixed(target) => {
                target.assign(text);
                Ok(())
            }
        }
    }
}

impl<'s> From<&'s mut String> for Sink<'s> {
    fn from(target: &'s mut String) -> Sink<'s> {
        Sink::Text(target)
    }
}

impl<'s> From<&'s mut FixedString> for Sink<'s> {
    fn from(target: &'s mut FixedString) -> Sink<'s> {
        Sink::Fixed(target)
    }
}

impl<'s> fmt::Debug for Sink<'s> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Stream(_) => write!(f, "Stream"),
            Sink::Text(target) => write!(f, "Text({:?})", target),
            Sink::Fixed(target) => write!(f, "Fixed({:?})", target),
        }
    }
}
