/// The text of a record under construction. Positions are counted in
/// characters and may run past the end of what has been written; writing at
/// such a position fills the gap with blanks, and writing before the end
/// overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    chars: Vec<char>,
    line_start: usize,
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    pub fn len(&self) -> usize {
        self.chars
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars
            .is_empty()
    }

    /// Where the current line begins; tab positions are relative to this.
    pub fn line_start(&self) -> usize {
        self.line_start
    }

    /// Write `text` at `pos`, returning the position just after it.
    pub fn put(&mut self, pos: usize, text: &str) -> usize {
        self.move_to(pos);

        let mut pos = pos;
        for c in text.chars() {
            if pos < self.len() {
                self.chars[pos] = c;
            } else {
                self.chars
                    .push(c);
            }
            pos += 1;
        }
        pos
    }

    /// Pad with blanks so that the record extends at least to `pos`.
    pub fn move_to(&mut self, pos: usize) {
        if pos > self.len() {
            self.chars
                .resize(pos, ' ');
        }
    }

    /// End the current line after everything written so far, returning the
    /// position at the start of the new line.
    pub fn break_line(&mut self, terminator: &str) -> usize {
        self.chars
            .extend(terminator.chars());
        self.line_start = self.len();
        self.line_start
    }

    /// Append the record terminator without starting a tab-addressable line.
    pub fn terminate(&mut self, terminator: &str) {
        self.chars
            .extend(terminator.chars());
    }

    /// Whether a free-form item written at `pos` needs a blank in front of
    /// it: not at the start of a line, and not straight after a blank, an
    /// opening parenthesis, or a comma.
    pub fn needs_separator(&self, pos: usize) -> bool {
        if pos <= self.line_start {
            return false;
        }
        match self
            .chars
            .get(pos - 1)
        {
            Some(' ') | Some('(') | Some(',') => false,
            Some(_) => true,
            None => false, // past the end, the gap is already blank
        }
    }

    pub fn text(&self) -> String {
        self.chars
            .iter()
            .collect()
    }
}
