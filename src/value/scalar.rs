use crate::value::Array;

/// The view of a single value that descriptors convert to text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Integer(i64),
    Real(f64),
    Logical(bool),
    Text(&'a str),
}

impl<'a> Scalar<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Integer(_) => "integer",
            Scalar::Real(_) => "real",
            Scalar::Logical(_) => "logical",
            Scalar::Text(_) => "text",
        }
    }
}

/// A complex number; written as two consecutive values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub fn new(re: T, im: T) -> Complex<T> {
        Complex { re, im }
    }
}

/// A value whose kind is only known at runtime, for heterogeneous
/// containers and values read from text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Logical(bool),
    Text(String),
    Complex(Complex<f64>),
    Array(Array<Value>),
}

impl Value {
    /// Read a value the way it would be spelled on a command line: integer,
    /// real, `.true.` or `.false.`, `(re,im)`, and anything else as text.
    pub fn parse(text: &str) -> Value {
        let trimmed = text.trim();

        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(x) = trimmed.parse::<f64>() {
            return Value::Real(x);
        }

        match trimmed
            .to_ascii_lowercase()
            .as_str()
        {
            ".true." => return Value::Logical(true),
            ".false." => return Value::Logical(false),
            _ => (),
        }

        if let Some(inner) = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
        {
            if let Some((re, im)) = inner.split_once(',') {
                if let (Ok(re), Ok(im)) = (
                    re.trim()
                        .parse::<f64>(),
                    im.trim()
                        .parse::<f64>(),
                ) {
                    return Value::Complex(Complex::new(re, im));
                }
            }
        }

        Value::Text(text.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Value {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Value {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Value {
        Value::Real(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Logical(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Text(s)
    }
}

impl From<Complex<f64>> for Value {
    fn from(c: Complex<f64>) -> Value {
        Value::Complex(c)
    }
}

impl From<Array<Value>> for Value {
    fn from(a: Array<Value>) -> Value {
        Value::Array(a)
    }
}
