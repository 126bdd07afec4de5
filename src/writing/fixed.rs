use std::fmt;

/// A fixed-length, blank-padded string, as the legacy language's CHARACTER
/// variables are. Assignments pad short text with blanks and truncate long
/// text on the right.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedString {
    text: String,
    length: usize,
}

impl FixedString {
    /// All blanks, `length` characters long.
    pub fn new(length: usize) -> FixedString {
        FixedString {
            text: " ".repeat(length),
            length,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn assign(&mut self, text: &str) {
        let mut result: String = text
            .chars()
            .take(self.length)
            .collect();

        let n = result
            .chars()
            .count();
        for _ in n..self.length {
            result.push(' ');
        }

        self.text = result;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The contents without trailing blanks.
    pub fn trimmed(&self) -> &str {
        self.text
            .trim_end_matches(' ')
    }
}

impl From<&str> for FixedString {
    fn from(text: &str) -> FixedString {
        FixedString {
            text: text.to_string(),
            length: text
                .chars()
                .count(),
        }
    }
}

impl fmt::Display for FixedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
