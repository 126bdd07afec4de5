//! The write session: one record's worth of formatted output

use tracing::{debug, warn};

use crate::error::WriteError;
use crate::format::{Descriptor, Format, FormatError};
use crate::value::{Scalar, Writable};
use crate::writing::{IoFlags, Record, Sink, LF};

/// How a session holds its format. An owned format is dropped with the
/// session; a borrowed one is rewound when the session ends so the caller
/// can reuse it.
#[derive(Debug)]
pub enum Binding<'f> {
    Owned(Format),
    Borrowed(&'f mut Format),
}

impl<'f> Binding<'f> {
    fn get(&mut self) -> &mut Format {
        match self {
            Binding::Owned(format) => format,
            Binding::Borrowed(format) => format,
        }
    }

    fn peek(&self) -> &Format {
        match self {
            Binding::Owned(format) => format,
            Binding::Borrowed(format) => format,
        }
    }

    fn release(&mut self) {
        if let Binding::Borrowed(format) = self {
            format.reset();
        }
    }
}

impl<'f> From<Format> for Binding<'f> {
    fn from(format: Format) -> Binding<'f> {
        Binding::Owned(format)
    }
}

impl<'f> From<&'f mut Format> for Binding<'f> {
    fn from(format: &'f mut Format) -> Binding<'f> {
        Binding::Borrowed(format)
    }
}

/// Which value-less descriptors a drain may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drain {
    /// Ahead of a value; a colon passes because a value follows.
    Leading,
    /// Behind a value; skipped entirely in formats with a colon.
    Trailing,
    /// At the end of the record; a colon stops output.
    Final,
}

/// One formatted output record, the equivalent of a single legacy WRITE
/// statement.
///
/// Values are pushed with [`write`](Session::write). All output accumulates
/// in an internal record; the sink is only touched when the session ends,
/// either by [`finish`](Session::finish) or by going out of scope. A failure
/// makes every later push inert, but the partial record is still committed.
#[derive(Debug)]
pub struct Session<'s> {
    sink: Sink<'s>,
    format: Binding<'s>,
    flags: Option<&'s mut IoFlags>,
    terminator: String,
    explicit_terminator: bool,
    non_advancing: bool,
    record: Record,
    pos: usize,
    reverts: usize,
    error: Option<WriteError>,
    closed: bool,
}

impl<'s> Session<'s> {
    pub fn new(sink: impl Into<Sink<'s>>, format: impl Into<Binding<'s>>) -> Session<'s> {
        let sink = sink.into();
        let format = format.into();
        let non_advancing = format
            .peek()
            .is_non_advancing();

        debug!(
            "Opening record on {:?} with {} descriptors",
            sink,
            format
                .peek()
                .descriptors()
                .len()
        );

        Session {
            sink,
            format,
            flags: None,
            terminator: LF.to_string(),
            explicit_terminator: false,
            non_advancing,
            record: Record::new(),
            pos: 0,
            reverts: 0,
            error: None,
            closed: false,
        }
    }

    /// Compile `text` into a format owned by the new session.
    pub fn compile(sink: impl Into<Sink<'s>>, text: &str) -> Result<Session<'s>, FormatError> {
        let format = Format::parse(text)?;
        Ok(Session::new(sink, format))
    }

    /// Attach a status object. Its status is cleared now and set from this
    /// session's outcome; its options apply to this record.
    ///
    /// The flags' terminator is used for any stream sink.
    pub fn with_flags(mut self, flags: &'s mut IoFlags) -> Session<'s> {
        flags.clear_status();

        if !self.explicit_terminator && self
            .sink
            .is_stream()
        {
            if let Some(terminator) = flags.ter() {
                self.terminator = terminator.to_string();
            }
        }

        // the format's own mode is left alone so a borrowed format comes back
        // unchanged
        self.non_advancing |= flags.is_non_advancing();
        self.flags = Some(flags);
        self
    }

    /// Override the line terminator.
    pub fn with_terminator(mut self, terminator: impl Into<String>) -> Session<'s> {
        self.terminator = terminator.into();
        self.explicit_terminator = true;
        self
    }

    /// Push any writable value: scalars, complex pairs, and containers.
    pub fn write<V: Writable + ?Sized>(&mut self, value: &V) -> &mut Session<'s> {
        value.write_to(self);
        self
    }

    /// Push one scalar value through the format.
    pub fn scalar(&mut self, value: Scalar<'_>) -> &mut Session<'s> {
        if !self.is_good() || self.closed {
            return self;
        }

        // a value finding the list exhausted starts the next pass, at most
        // once per push
        let mut reverted = false;
        loop {
            let format = self
                .format
                .get();
            if format.is_exhausted() {
                if reverted || !format.reverts_to_value() {
                    break;
                }
                format.revert();
                reverted = true;
            }
            self.reverts = format.reverts();

            if !self.drain(Drain::Leading) {
                self.set_status();
                return self;
            }
            if !self
                .format
                .peek()
                .is_exhausted()
            {
                break;
            }
        }

        let format = self
            .format
            .get();
        let consumes = format
            .current()
            .map(Descriptor::requires_argument)
            .unwrap_or(false);

        if !consumes {
            self.fail(WriteError::Exhausted);
            self.set_status();
            return self;
        }

        match format.render_value(&mut self.record, self.pos, value, &self.terminator) {
            Ok(pos) => {
                self.pos = pos;
                format.advance();
                self.reverts = format.reverts();
                self.drain(Drain::Trailing);
            }
            Err(error) => self.fail(error),
        }

        self.set_status();
        self
    }

    /// Fail the record on a value that has no scalar form, such as an
    /// integer too wide for any descriptor.
    pub(crate) fn reject(&mut self, value: &'static str) -> &mut Session<'s> {
        if !self.is_good() || self.closed {
            return self;
        }

        let descriptor = self
            .format
            .peek()
            .upcoming()
            .map(Descriptor::to_string)
            .unwrap_or_default();
        self.fail(WriteError::Unsupported { descriptor, value });
        self.set_status();
        self
    }

    /// Push a complex pair as two values. In free-form output the pair is
    /// written in parentheses, separated by a comma.
    pub fn complex(&mut self, re: Scalar<'_>, im: Scalar<'_>) -> &mut Session<'s> {
        if !self.is_good() || self.closed {
            return self;
        }

        let list_directed = self
            .format
            .peek()
            .is_list_directed();

        if list_directed {
            self.punctuate("(");
        }
        self.scalar(re);
        if list_directed && self.is_good() {
            self.punctuate(",");
        }
        self.scalar(im);
        if list_directed && self.is_good() {
            self.punctuate(")");
        }

        self
    }

    /// Push the elements of a container in order, stopping at the first
    /// failure without touching the remaining elements.
    pub fn items<'v, T, I>(&mut self, items: I) -> &mut Session<'s>
    where
        I: IntoIterator<Item = &'v T>,
        T: Writable + ?Sized + 'v,
    {
        for item in items {
            if !self.is_good() || self.closed {
                break;
            }
            item.write_to(self);
        }
        self
    }

    /// End the record now rather than at the end of scope, returning the
    /// outcome that would otherwise only reach the status object.
    pub fn finish(mut self) -> Result<(), WriteError> {
        self.finalize();
        match self
            .error
            .take()
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Virtual position within the record.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Reversion count as of the last value pushed.
    pub fn reverts(&self) -> usize {
        self.reverts
    }

    /// Whether the record ends without a terminator.
    pub fn is_non_advancing(&self) -> bool {
        self.non_advancing
            || self
                .sink
                .is_internal()
    }

    pub fn terminator(&self) -> &str {
        &self.terminator
    }

    pub fn format(&self) -> &Format {
        self.format
            .peek()
    }

    pub fn is_good(&self) -> bool {
        self.error
            .is_none()
    }

    pub fn error(&self) -> Option<&WriteError> {
        self.error
            .as_ref()
    }

    /// Text accumulated so far, not yet committed.
    pub fn pending(&self) -> String {
        self.record
            .text()
    }

    /// Emit value-less descriptors from the cursor onward until one needs a
    /// value, the list is exhausted, or the reversion count moves away from
    /// the one observed when this push began. Returns false if the session
    /// is unhealthy.
    fn drain(&mut self, stage: Drain) -> bool {
        let format = self
            .format
            .get();

        if stage == Drain::Trailing && format.stops_before_next_item() {
            return self
                .error
                .is_none();
        }

        while self
            .error
            .is_none()
            && format.reverts() == self.reverts
        {
            let (no_arg, colon) = match format.current() {
                Some(descriptor) => (
                    descriptor.requires_no_argument(),
                    *descriptor == Descriptor::Colon,
                ),
                None => break,
            };

            if !no_arg || (colon && stage == Drain::Final) {
                break;
            }

            self.pos = format.render_literal(&mut self.record, self.pos, &self.terminator);
            format.advance();
        }

        self.error
            .is_none()
    }

    /// Free-form punctuation around compound values.
    fn punctuate(&mut self, mark: &str) {
        if mark == "(" && self
            .record
            .needs_separator(self.pos)
        {
            self.pos = self
                .record
                .put(self.pos, " ");
        }
        self.pos = self
            .record
            .put(self.pos, mark);
    }

    fn fail(&mut self, error: WriteError) {
        if self
            .error
            .is_none()
        {
            warn!("Record output failed: {}", error);
            self.error = Some(error);
        }
    }

    fn set_status(&mut self) {
        if let Some(flags) = self
            .flags
            .as_deref_mut()
        {
            flags.set_status(
                self.error
                    .as_ref(),
            );
        }
    }

    fn finalize(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if self.is_good() {
            // flush trailing literals still queued at the cursor
            self.reverts = self
                .format
                .peek()
                .reverts();
            self.drain(Drain::Final);

            if self.is_non_advancing() {
                self.format
                    .peek()
                    .output_pos(&mut self.record, self.pos);
            } else {
                self.record
                    .terminate(&self.terminator);
            }
        }

        let text = self
            .record
            .text();
        if let Err(error) = self
            .sink
            .commit(&text)
        {
            self.fail(error);
        }

        self.set_status();
        self.format
            .release();

        debug!(
            "Committed record of {} characters{}",
            text.chars()
                .count(),
            if self.is_good() { "" } else { " after failure" }
        );
    }
}

impl<'s> Drop for Session<'s> {
    fn drop(&mut self) {
        self.finalize();
    }
}
