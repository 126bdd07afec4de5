//! Compiled formats: a descriptor list with a cursor and a reversion counter

mod descriptor;
mod parser;

// Re-export all public symbols
pub use descriptor::*;
pub use parser::FormatError;

use tracing::debug;

use crate::error::WriteError;
use crate::value::Scalar;
use crate::writing::Record;

/// A compiled format. Descriptors are walked left to right; a value pushed
/// once the list is exhausted reverts the cursor to the reversion point and
/// starts a new record.
///
/// The reversion counter lives here rather than in any session, so a format
/// reused across sessions carries consistent wrap semantics until it is
/// `reset()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    descriptors: Vec<Descriptor>,
    cursor: usize,
    reverts: usize,
    revert_to: usize,
    list_directed: bool,
    non_advancing: bool,
    colon: bool,
    pending_break: bool,
}

impl Format {
    pub fn new(descriptors: Vec<Descriptor>) -> Format {
        let colon = descriptors
            .iter()
            .any(|d| *d == Descriptor::Colon);

        Format {
            descriptors,
            cursor: 0,
            reverts: 0,
            revert_to: 0,
            list_directed: false,
            non_advancing: false,
            colon,
            pending_break: false,
        }
    }

    /// The free-form format, `*`.
    pub fn list_directed() -> Format {
        let mut format = Format::new(vec![Descriptor::ListDirected]);
        format.list_directed = true;
        format
    }

    /// Compile format text such as `(A, 3I5, /, 2(F8.3, :, ', '))`.
    pub fn parse(text: &str) -> Result<Format, FormatError> {
        let format = parser::compile(text)?;
        debug!(
            "Compiled {} descriptor{}",
            format
                .descriptors
                .len(),
            if format
                .descriptors
                .len()
                == 1
            {
                ""
            } else {
                "s"
            }
        );
        Ok(format)
    }

    /// Set where the cursor lands on reversion. Out of range indices are
    /// clamped to the start of the list.
    pub fn with_reversion_point(mut self, index: usize) -> Format {
        self.revert_to = if index < self
            .descriptors
            .len()
        {
            index
        } else {
            0
        };
        self
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    pub fn reversion_point(&self) -> usize {
        self.revert_to
    }

    /// The active descriptor, or None once the list is exhausted.
    pub fn current(&self) -> Option<&Descriptor> {
        self.descriptors
            .get(self.cursor)
    }

    /// The descriptor the next value would be rendered with, looking past
    /// value-less descriptors and across a reversion.
    pub fn upcoming(&self) -> Option<&Descriptor> {
        let ahead = self
            .descriptors
            .get(self.cursor..)
            .unwrap_or(&[]);
        let again = self
            .descriptors
            .get(self.revert_to..)
            .unwrap_or(&[]);

        ahead
            .iter()
            .chain(again)
            .find(|d| d.requires_argument())
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor
            >= self
                .descriptors
                .len()
    }

    /// Move past the active descriptor. The free-form format never moves; its
    /// single descriptor serves every value.
    pub fn advance(&mut self) {
        if !self.list_directed && !self.is_exhausted() {
            self.cursor += 1;
        }
    }

    /// Wrap back to the reversion point. The next output begins a new record.
    pub fn revert(&mut self) {
        self.cursor = self.revert_to;
        self.reverts += 1;
        self.pending_break = true;
    }

    /// Whether a pass starting at the reversion point would reach a
    /// descriptor that consumes a value.
    pub fn reverts_to_value(&self) -> bool {
        self.descriptors
            .get(self.revert_to..)
            .map(|rest| {
                rest.iter()
                    .any(Descriptor::requires_argument)
            })
            .unwrap_or(false)
    }

    pub fn reverts(&self) -> usize {
        self.reverts
    }

    /// Rewind to the state just after compilation.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.reverts = 0;
        self.pending_break = false;
    }

    pub fn is_list_directed(&self) -> bool {
        self.list_directed
    }

    pub fn is_non_advancing(&self) -> bool {
        self.non_advancing
    }

    pub fn set_non_advancing(&mut self, non_advancing: bool) {
        self.non_advancing = non_advancing;
    }

    /// Whether value-less descriptors following a value wait for the next
    /// value before being emitted (the format contains a `:`).
    pub fn stops_before_next_item(&self) -> bool {
        self.colon
    }

    /// Emit the active descriptor if it takes no value.
    pub fn render_literal(&mut self, record: &mut Record, pos: usize, terminator: &str) -> usize {
        let pos = self.begin_pass(record, pos, terminator);

        match self
            .descriptors
            .get(self.cursor)
        {
            Some(descriptor) => descriptor.render_literal(record, pos, terminator),
            None => pos,
        }
    }

    /// Render `value` with the active descriptor.
    pub fn render_value(
        &mut self,
        record: &mut Record,
        pos: usize,
        value: Scalar<'_>,
        terminator: &str,
    ) -> Result<usize, WriteError> {
        // convert before any record break is emitted
        let text = match self
            .descriptors
            .get(self.cursor)
        {
            Some(descriptor) if descriptor.requires_argument() => descriptor.convert(value)?,
            _ => return Err(WriteError::Exhausted),
        };

        let pos = self.begin_pass(record, pos, terminator);
        Ok(self.descriptors[self.cursor].place(record, pos, &text))
    }

    /// Move the record to the virtual position, padding with blanks if the
    /// position lies beyond what has been written.
    pub fn output_pos(&self, record: &mut Record, pos: usize) {
        record.move_to(pos);
    }

    fn begin_pass(&mut self, record: &mut Record, pos: usize, terminator: &str) -> usize {
        if self.pending_break {
            self.pending_break = false;
            record.break_line(terminator)
        } else {
            pos
        }
    }
}
