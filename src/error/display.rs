use std::fmt;

use owo_colors::OwoColorize;

use crate::format::FormatError;

/// A format compilation failure paired with the format text it came from, so
/// it can be shown to a human with the offending column marked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatProblem<'i> {
    pub problem: String,
    pub source: &'i str,
    pub offset: usize,
}

impl<'i> FormatProblem<'i> {
    pub fn new(error: &FormatError, source: &'i str) -> FormatProblem<'i> {
        FormatProblem {
            problem: error.message(),
            source,
            offset: error
                .offset()
                .min(source.len()),
        }
    }

    // Verbose detailed explanation
    pub fn full_details(&self) -> String {
        let column = calculate_column_number(self.source, self.offset) + 1;

        format!(
            r#"
{}: {}

  {} {}
  {} {:>column$}
            "#,
            "error".bright_red(),
            self.problem
                .bold(),
            '|'.bright_blue(),
            self.source,
            '|'.bright_blue(),
            '^'.bright_red(),
        )
        .trim_ascii()
        .to_string()
    }
}

// Concise version for internal use
impl<'i> fmt::Display for FormatProblem<'i> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = calculate_column_number(self.source, self.offset) + 1;

        write!(f, "error: format:{} {}", column, self.problem)
    }
}

// Zero-origin, counted in characters rather than bytes.
fn calculate_column_number(content: &str, offset: usize) -> usize {
    content[..offset]
        .chars()
        .count()
}
