use crate::error::WriteError;

pub const LF: &str = "\n";
pub const CRLF: &str = "\r\n";

/// Caller-owned input/output options and the status of the last record
/// written with them. Sessions never raise errors; they leave them here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IoFlags {
    non_advancing: bool,
    terminator: Option<String>,
    error: Option<WriteError>,
}

impl IoFlags {
    pub fn new() -> IoFlags {
        IoFlags::default()
    }

    /// Request non-advancing output: no terminator at the end of the record.
    pub fn non_advancing(mut self, non_advancing: bool) -> IoFlags {
        self.non_advancing = non_advancing;
        self
    }

    /// Line terminator to use when writing to a stream.
    pub fn terminator(mut self, terminator: impl Into<String>) -> IoFlags {
        self.terminator = Some(terminator.into());
        self
    }

    pub fn is_non_advancing(&self) -> bool {
        self.non_advancing
    }

    pub fn ter(&self) -> Option<&str> {
        self.terminator
            .as_deref()
    }

    pub fn clear_status(&mut self) -> &mut IoFlags {
        self.error = None;
        self
    }

    pub fn set_status(&mut self, error: Option<&WriteError>) {
        self.error = error.cloned();
    }

    pub fn ok(&self) -> bool {
        self.error
            .is_none()
    }

    pub fn err(&self) -> bool {
        self.error
            .is_some()
    }

    pub fn error(&self) -> Option<&WriteError> {
        self.error
            .as_ref()
    }

    /// Zero when healthy, a positive code otherwise.
    pub fn ios(&self) -> i32 {
        match &self.error {
            Some(error) => error.code(),
            None => 0,
        }
    }
}
