//! Edit descriptors and their value-to-text rules

use std::fmt;

use crate::error::WriteError;
use crate::value::Scalar;
use crate::writing::Record;

/// One unit of a compiled format. Either consumes a value and renders it, or
/// consumes nothing and emits literal text or moves the record position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    Literal(String),
    Skip(usize),     // nX
    Tab(usize),      // Tn, 1-origin column of the current record
    TabLeft(usize),  // TLn
    TabRight(usize), // TRn
    Slash,
    Colon,
    Integer { width: usize, digits: Option<usize> },
    Fixed { width: usize, decimals: usize },
    Exponent { width: usize, decimals: usize },
    Text { width: Option<usize> },
    Logical { width: usize },
    ListDirected,
}

impl Descriptor {
    pub fn literal(text: impl Into<String>) -> Descriptor {
        Descriptor::Literal(text.into())
    }

    pub fn requires_no_argument(&self) -> bool {
        match self {
            Descriptor::Literal(_)
            | Descriptor::Skip(_)
            | Descriptor::Tab(_)
            | Descriptor::TabLeft(_)
            | Descriptor::TabRight(_)
            | Descriptor::Slash
            | Descriptor::Colon => true,
            _ => false,
        }
    }

    pub fn requires_argument(&self) -> bool {
        !self.requires_no_argument()
    }

    /// Emit a value-less descriptor at `pos`, returning the new virtual
    /// position. Value-consuming descriptors leave the record untouched.
    pub fn render_literal(&self, record: &mut Record, pos: usize, terminator: &str) -> usize {
        match self {
            Descriptor::Literal(text) => record.put(pos, text),
            Descriptor::Skip(n) => pos + n,
            Descriptor::Tab(n) => record.line_start() + n.saturating_sub(1),
            Descriptor::TabLeft(n) => pos
                .saturating_sub(*n)
                .max(record.line_start()),
            Descriptor::TabRight(n) => pos + n,
            Descriptor::Slash => record.break_line(terminator),
            _ => pos,
        }
    }

    /// Render `value` at `pos`, returning the new virtual position.
    pub fn render_value(
        &self,
        record: &mut Record,
        pos: usize,
        value: Scalar<'_>,
    ) -> Result<usize, WriteError> {
        let text = self.convert(value)?;
        Ok(self.place(record, pos, &text))
    }

    /// Write already converted text at `pos`. Free-form items are separated
    /// from whatever precedes them on the record by a single blank.
    pub fn place(&self, record: &mut Record, pos: usize, text: &str) -> usize {
        let pos = match self {
            Descriptor::ListDirected if record.needs_separator(pos) => record.put(pos, " "),
            _ => pos,
        };

        record.put(pos, text)
    }

    /// Convert a value to the text this descriptor would write for it.
    pub fn convert(&self, value: Scalar<'_>) -> Result<String, WriteError> {
        match (self, value) {
            (Descriptor::Integer { width, digits }, Scalar::Integer(i)) => {
                Ok(integer(i, *width, *digits))
            }
            (Descriptor::Fixed { width, decimals }, Scalar::Real(x)) => {
                Ok(fixed(x, *width, *decimals))
            }
            (Descriptor::Exponent { width, decimals }, Scalar::Real(x)) => {
                Ok(fit(&exponent(x, *decimals), *width))
            }
            (Descriptor::Text { width }, Scalar::Text(s)) => Ok(text(s, *width)),
            (Descriptor::Logical { width }, Scalar::Logical(b)) => {
                Ok(fit(if b { "T" } else { "F" }, *width))
            }
            (Descriptor::ListDirected, value) => Ok(list_directed(value)),
            (descriptor, value) => Err(WriteError::Unsupported {
                descriptor: descriptor.to_string(),
                value: value.kind(),
            }),
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Literal(text) => write!(f, "'{}'", text.replace('\'', "''")),
            Descriptor::Skip(n) => write!(f, "{}X", n),
            Descriptor::Tab(n) => write!(f, "T{}", n),
            Descriptor::TabLeft(n) => write!(f, "TL{}", n),
            Descriptor::TabRight(n) => write!(f, "TR{}", n),
            Descriptor::Slash => write!(f, "/"),
            Descriptor::Colon => write!(f, ":"),
            Descriptor::Integer {
                width,
                digits: Some(m),
            } => write!(f, "I{}.{}", width, m),
            Descriptor::Integer {
                width,
                digits: None,
            } => write!(f, "I{}", width),
            Descriptor::Fixed { width, decimals } => write!(f, "F{}.{}", width, decimals),
            Descriptor::Exponent { width, decimals } => write!(f, "E{}.{}", width, decimals),
            Descriptor::Text { width: Some(w) } => write!(f, "A{}", w),
            Descriptor::Text { width: None } => write!(f, "A"),
            Descriptor::Logical { width } => write!(f, "L{}", width),
            Descriptor::ListDirected => write!(f, "*"),
        }
    }
}

/// Right-justify in `width`, or fill the field with asterisks when the text
/// does not fit. A zero width means "as wide as needed".
fn fit(text: &str, width: usize) -> String {
    let n = text
        .chars()
        .count();

    if width == 0 {
        text.to_string()
    } else if n > width {
        "*".repeat(width)
    } else {
        format!("{:>width$}", text)
    }
}

fn integer(i: i64, width: usize, digits: Option<usize>) -> String {
    let magnitude = i.unsigned_abs();
    let digits = digits.unwrap_or(1);

    let body = if digits == 0 && magnitude == 0 {
        String::new()
    } else {
        format!("{:0digits$}", magnitude)
    };

    let text = if i < 0 { format!("-{}", body) } else { body };

    fit(&text, width)
}

fn fixed(x: f64, width: usize, decimals: usize) -> String {
    if !x.is_finite() {
        return fit(&special(x), width);
    }

    let digits = round_half_away(x.abs(), decimals);
    let text = if x < 0.0 {
        format!("-{}", digits)
    } else {
        digits
    };

    // the optional leading zero is the first thing to go
    if width > 0 && text.len() > width {
        if let Some(rest) = text.strip_prefix("0.") {
            return fit(&format!(".{}", rest), width);
        }
        if let Some(rest) = text.strip_prefix("-0.") {
            return fit(&format!("-.{}", rest), width);
        }
    }

    fit(&text, width)
}

/// Normalised `0.dddE+xx` form, mantissa in [0.1, 1).
fn exponent(x: f64, decimals: usize) -> String {
    if !x.is_finite() {
        return special(x);
    }

    let sign = if x < 0.0 { "-" } else { "" };
    let (digits, e) = significant(x.abs(), decimals);

    let exponent_sign = if e < 0 { '-' } else { '+' };
    let exponent = if e.abs() <= 99 {
        format!("E{}{:02}", exponent_sign, e.abs())
    } else {
        format!("{}{:03}", exponent_sign, e.abs())
    };

    format!("{}0.{}{}", sign, digits, exponent)
}

fn special(x: f64) -> String {
    if x.is_nan() {
        "NaN"
    } else if x < 0.0 {
        "-Inf"
    } else {
        "Inf"
    }
    .to_string()
}

// Enough fraction digits to hold the exact expansion of any finite f64, so
// rounding below works on the true value rather than on a rounded one.
fn expansion(magnitude: f64) -> String {
    format!("{:.1100}", magnitude)
}

/// `magnitude` with `decimals` fraction digits, halves rounded away from
/// zero. The point is always present, even with no fraction digits.
fn round_half_away(magnitude: f64, decimals: usize) -> String {
    let exact = expansion(magnitude);
    let point = exact
        .find('.')
        .unwrap_or(exact.len());
    let cut = (point + 1 + decimals).min(exact.len());

    let mut digits = exact.as_bytes()[..cut].to_vec();
    if exact
        .as_bytes()
        .get(cut)
        .is_some_and(|d| *d >= b'5')
    {
        carry(&mut digits);
    }

    String::from_utf8(digits).unwrap_or_default()
}

/// The first `count` significant digits of `magnitude`, halves rounded away
/// from zero, and the exponent that makes them a fraction in [0.1, 1).
fn significant(magnitude: f64, count: usize) -> (String, i32) {
    if magnitude == 0.0 {
        return ("0".repeat(count), 0);
    }

    let exact = expansion(magnitude);
    let (whole, fraction) = exact
        .split_once('.')
        .unwrap_or((exact.as_str(), ""));
    let all: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes())
        .collect();

    let first = all
        .iter()
        .position(|d| *d != b'0')
        .unwrap_or(0);
    let mut e = whole.len() as i32 - first as i32;

    let end = (first + count).min(all.len());
    let mut digits = all[first..end].to_vec();
    digits.resize(count, b'0');

    if all
        .get(first + count)
        .is_some_and(|d| *d >= b'5')
    {
        carry(&mut digits);
        if digits.len() > count {
            // rounding carried into a new leading digit
            digits.truncate(count);
            e += 1;
        }
    }

    (String::from_utf8(digits).unwrap_or_default(), e)
}

/// Add one in the last place of a digit string that may contain a point.
fn carry(digits: &mut Vec<u8>) {
    for d in digits
        .iter_mut()
        .rev()
    {
        match *d {
            b'.' => continue,
            b'9' => *d = b'0',
            _ => {
                *d += 1;
                return;
            }
        }
    }
    digits.insert(0, b'1');
}

fn text(s: &str, width: Option<usize>) -> String {
    match width {
        None => s.to_string(),
        Some(w) => {
            let n = s
                .chars()
                .count();
            if n >= w {
                s.chars()
                    .take(w)
                    .collect()
            } else {
                format!("{:>w$}", s)
            }
        }
    }
}

fn list_directed(value: Scalar<'_>) -> String {
    match value {
        Scalar::Integer(i) => i.to_string(),
        Scalar::Real(x) => real(x),
        Scalar::Logical(b) => if b { "T" } else { "F" }.to_string(),
        Scalar::Text(s) => s.to_string(),
    }
}

/// Shortest round-trip spelling, always with a point in the mantissa; very
/// large and very small values take a `1.5E+20` exponent form.
fn real(x: f64) -> String {
    let text = format!("{:?}", x);

    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let e: i32 = exponent
                .parse()
                .unwrap_or(0);
            let mantissa = if mantissa.contains('.') {
                mantissa.to_string()
            } else {
                format!("{}.0", mantissa)
            };
            format!("{}E{}{:02}", mantissa, if e < 0 { '-' } else { '+' }, e.abs())
        }
        None => text,
    }
}
