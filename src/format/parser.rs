//! Compiler from format text to a descriptor list

use std::fmt;

use super::{Descriptor, Format};

/// Upper bound on the descriptor list once repeat counts are expanded.
const MAX_DESCRIPTORS: usize = 1 << 16;

macro_rules! regex {
    ($pattern:expr) => {{
        use std::sync::OnceLock;
        static REGEX: OnceLock<regex::Regex> = OnceLock::new();
        REGEX.get_or_init(|| regex::Regex::new($pattern).unwrap_or_else(|e| panic!("{}", e)))
    }};
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    Empty(usize),
    UnterminatedLiteral(usize),
    UnbalancedParenthesis(usize),
    UnknownDescriptor(usize),
    MissingWidth(usize),
    MissingDecimals(usize),
    ZeroRepeat(usize),
    RepeatNotAllowed(usize),
    TooLarge(usize),
    TrailingInput(usize),
}

impl FormatError {
    pub fn offset(&self) -> usize {
        match self {
            FormatError::Empty(offset) => *offset,
            FormatError::UnterminatedLiteral(offset) => *offset,
            FormatError::UnbalancedParenthesis(offset) => *offset,
            FormatError::UnknownDescriptor(offset) => *offset,
            FormatError::MissingWidth(offset) => *offset,
            FormatError::MissingDecimals(offset) => *offset,
            FormatError::ZeroRepeat(offset) => *offset,
            FormatError::RepeatNotAllowed(offset) => *offset,
            FormatError::TooLarge(offset) => *offset,
            FormatError::TrailingInput(offset) => *offset,
        }
    }

    pub fn message(&self) -> String {
        match self {
            FormatError::Empty(_) => "empty format".to_string(),
            FormatError::UnterminatedLiteral(_) => "unterminated character literal".to_string(),
            FormatError::UnbalancedParenthesis(_) => "unbalanced parenthesis".to_string(),
            FormatError::UnknownDescriptor(_) => "unknown edit descriptor".to_string(),
            FormatError::MissingWidth(_) => "missing field width".to_string(),
            FormatError::MissingDecimals(_) => "missing decimal digit count".to_string(),
            FormatError::ZeroRepeat(_) => "repeat count must be positive".to_string(),
            FormatError::RepeatNotAllowed(_) => "descriptor cannot be repeated".to_string(),
            FormatError::TooLarge(_) => format!(
                "format expands to more than {} descriptors",
                MAX_DESCRIPTORS
            ),
            FormatError::TrailingInput(_) => "unexpected text after format".to_string(),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message(), self.offset())
    }
}

impl std::error::Error for FormatError {}

/// Items as written, before repeat counts are expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Single(Descriptor),
    Group(usize, Vec<Item>),
}

pub(super) fn compile(content: &str) -> Result<Format, FormatError> {
    let mut input = Parser::new();
    input.initialize(content);

    input.trim_whitespace();
    if input.is_finished() {
        return Err(FormatError::Empty(input.offset));
    }

    if input
        .source
        .starts_with('*')
    {
        input.advance(1);
        input.require_finished()?;
        return Ok(Format::list_directed());
    }

    let items = if input
        .source
        .starts_with('(')
    {
        input.advance(1);
        let items = input.read_items(true)?;
        input.require_finished()?;
        items
    } else {
        input.read_items(false)?
    };

    // reversion goes to the last top level group, or the very start
    let mut descriptors = Vec::new();
    let mut revert_to = 0;
    for item in &items {
        if let Item::Group(_, _) = item {
            revert_to = descriptors.len();
        }
        expand(item, &mut descriptors);
    }

    Ok(Format::new(descriptors).with_reversion_point(revert_to))
}

/// Length of the descriptor list these items expand to, saturating.
fn size(items: &[Item]) -> usize {
    items
        .iter()
        .fold(0usize, |total, item| {
            let n = match item {
                Item::Single(_) => 1,
                Item::Group(repeat, inner) => repeat.saturating_mul(size(inner)),
            };
            total.saturating_add(n)
        })
}

fn expand(item: &Item, out: &mut Vec<Descriptor>) {
    match item {
        Item::Single(descriptor) => out.push(descriptor.clone()),
        Item::Group(repeat, items) => {
            for _ in 0..*repeat {
                for inner in items {
                    expand(inner, out);
                }
            }
        }
    }
}

#[derive(Debug)]
struct Parser<'i> {
    source: &'i str,
    offset: usize,
}

impl<'i> Parser<'i> {
    fn new() -> Parser<'i> {
        Parser {
            source: "",
            offset: 0,
        }
    }

    fn initialize(&mut self, content: &'i str) {
        self.source = content;
        self.offset = 0;
    }

    fn advance(&mut self, width: usize) {
        // advance the parser position
        self.source = &self.source[width..];
        self.offset += width;
    }

    fn is_finished(&self) -> bool {
        self.source
            .is_empty()
    }

    fn peek(&self) -> Option<char> {
        self.source
            .chars()
            .next()
    }

    fn trim_whitespace(&mut self) {
        let trimmed = self
            .source
            .trim_start();
        let width = self.source.len() - trimmed.len();
        self.advance(width);
    }

    fn require_finished(&mut self) -> Result<(), FormatError> {
        self.trim_whitespace();
        if self.is_finished() {
            Ok(())
        } else {
            Err(FormatError::TrailingInput(self.offset))
        }
    }

    /// Read a comma separated list of items. A nested list ends at, and
    /// consumes, its closing parenthesis.
    fn read_items(&mut self, nested: bool) -> Result<Vec<Item>, FormatError> {
        let start = self.offset;
        let mut items = Vec::new();
        let mut total = 0usize;

        loop {
            self.trim_whitespace();

            let before = items.len();
            let c = match self.peek() {
                Some(c) => c,
                None if nested => return Err(FormatError::UnbalancedParenthesis(self.offset)),
                None => break,
            };

            match c {
                ')' if nested => {
                    self.advance(1);
                    break;
                }
                ')' => return Err(FormatError::UnbalancedParenthesis(self.offset)),
                ',' => self.advance(1),
                '/' => {
                    self.advance(1);
                    items.push(Item::Single(Descriptor::Slash));
                }
                ':' => {
                    self.advance(1);
                    items.push(Item::Single(Descriptor::Colon));
                }
                '\'' | '"' => {
                    let text = self.read_literal(c)?;
                    items.push(Item::Single(Descriptor::Literal(text)));
                }
                '(' => {
                    self.advance(1);
                    let inner = self.read_items(true)?;
                    items.push(Item::Group(1, inner));
                }
                _ => self.read_repeatable(&mut items)?,
            }

            total = total.saturating_add(size(&items[before..]));
            if total > MAX_DESCRIPTORS {
                return Err(FormatError::TooLarge(start));
            }
        }

        Ok(items)
    }

    fn read_literal(&mut self, quote: char) -> Result<String, FormatError> {
        let start = self.offset;
        let mut text = String::new();
        let source = self.source;
        let mut chars = source
            .char_indices()
            .skip(1)
            .peekable();

        while let Some((i, c)) = chars.next() {
            if c == quote {
                // a doubled quote stands for itself
                if let Some(&(_, next)) = chars.peek() {
                    if next == quote {
                        chars.next();
                        text.push(quote);
                        continue;
                    }
                }
                self.advance(i + 1);
                return Ok(text);
            }
            text.push(c);
        }

        Err(FormatError::UnterminatedLiteral(start))
    }

    fn read_count(&mut self) -> Option<usize> {
        let re = regex!(r"^[0-9]+");
        let count = re.find(self.source)?;
        let width = count.end();
        let value = count
            .as_str()
            .parse()
            .ok()?;
        self.advance(width);
        Some(value)
    }

    /// A descriptor or group, optionally preceded by a repeat count.
    fn read_repeatable(&mut self, items: &mut Vec<Item>) -> Result<(), FormatError> {
        let start = self.offset;
        let repeat = self.read_count();

        if repeat == Some(0) {
            return Err(FormatError::ZeroRepeat(start));
        }
        // checked before anything is pushed for it
        if repeat.unwrap_or(1) > MAX_DESCRIPTORS {
            return Err(FormatError::TooLarge(start));
        }

        self.trim_whitespace();

        match self.peek() {
            Some('(') => {
                self.advance(1);
                let inner = self.read_items(true)?;
                let group = Item::Group(repeat.unwrap_or(1), inner);
                if size(std::slice::from_ref(&group)) > MAX_DESCRIPTORS {
                    return Err(FormatError::TooLarge(start));
                }
                items.push(group);
                return Ok(());
            }
            Some('/') if repeat.is_some() => {
                self.advance(1);
                for _ in 0..repeat.unwrap_or(1) {
                    items.push(Item::Single(Descriptor::Slash));
                }
                return Ok(());
            }
            _ => (),
        }

        let re = regex!(r"^(?i:(TL|TR|T|I|F|E|A|L|X))([0-9]*)(?:\.([0-9]+))?");
        let cap = match re.captures(self.source) {
            Some(cap) => cap,
            None => return Err(FormatError::UnknownDescriptor(self.offset)),
        };

        let at = self.offset;
        let name = cap
            .get(1)
            .map(|m| m.as_str())
            .unwrap_or("")
            .to_ascii_uppercase();
        let width = cap
            .get(2)
            .and_then(|m| {
                m.as_str()
                    .parse::<usize>()
                    .ok()
            });
        let decimals = cap
            .get(3)
            .and_then(|m| {
                m.as_str()
                    .parse::<usize>()
                    .ok()
            });
        let length = cap
            .get(0)
            .map(|m| m.end())
            .unwrap_or(0);
        self.advance(length);

        let descriptor = match name.as_str() {
            "X" => {
                if width.is_some() || decimals.is_some() {
                    return Err(FormatError::UnknownDescriptor(at));
                }
                items.push(Item::Single(Descriptor::Skip(repeat.unwrap_or(1))));
                return Ok(());
            }
            "T" | "TL" | "TR" => {
                if repeat.is_some() {
                    return Err(FormatError::RepeatNotAllowed(start));
                }
                if decimals.is_some() {
                    return Err(FormatError::UnknownDescriptor(at));
                }
                let n = width.ok_or(FormatError::MissingWidth(at))?;
                match name.as_str() {
                    "T" => Descriptor::Tab(n),
                    "TL" => Descriptor::TabLeft(n),
                    _ => Descriptor::TabRight(n),
                }
            }
            "I" => Descriptor::Integer {
                width: width.ok_or(FormatError::MissingWidth(at))?,
                digits: decimals,
            },
            "F" => Descriptor::Fixed {
                width: width.ok_or(FormatError::MissingWidth(at))?,
                decimals: decimals.ok_or(FormatError::MissingDecimals(at))?,
            },
            "E" => Descriptor::Exponent {
                width: width.ok_or(FormatError::MissingWidth(at))?,
                decimals: decimals.ok_or(FormatError::MissingDecimals(at))?,
            },
            "A" | "L" if decimals.is_some() => return Err(FormatError::UnknownDescriptor(at)),
            "A" => Descriptor::Text { width },
            "L" => Descriptor::Logical {
                width: width.ok_or(FormatError::MissingWidth(at))?,
            },
            _ => return Err(FormatError::UnknownDescriptor(at)),
        };

        for _ in 0..repeat.unwrap_or(1) {
            items.push(Item::Single(descriptor.clone()));
        }

        Ok(())
    }
}
