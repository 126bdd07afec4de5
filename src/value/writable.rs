use crate::value::{Array, Complex, Scalar, Value};
use crate::writing::Session;

/// Anything that can be pushed into a write session. Scalars feed one
/// descriptor, complex pairs two, and containers one per element.
pub trait Writable {
    fn write_to(&self, session: &mut Session<'_>);
}

macro_rules! integers {
    ($($t:ty),*) => {
        $(
            impl Writable for $t {
                fn write_to(&self, session: &mut Session<'_>) {
                    session.scalar(Scalar::Integer(i64::from(*self)));
                }
            }
        )*
    };
}

integers!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! wide_integers {
    ($($t:ty),*) => {
        $(
            impl Writable for $t {
                fn write_to(&self, session: &mut Session<'_>) {
                    match i64::try_from(*self) {
                        Ok(i) => session.scalar(Scalar::Integer(i)),
                        Err(_) => session.reject("out of range integer"),
                    };
                }
            }
        )*
    };
}

wide_integers!(u64, usize, isize, i128, u128);

impl Writable for f64 {
    fn write_to(&self, session: &mut Session<'_>) {
        session.scalar(Scalar::Real(*self));
    }
}

impl Writable for f32 {
    fn write_to(&self, session: &mut Session<'_>) {
        session.scalar(Scalar::Real(widen(*self)));
    }
}

impl Writable for bool {
    fn write_to(&self, session: &mut Session<'_>) {
        session.scalar(Scalar::Logical(*self));
    }
}

impl Writable for char {
    fn write_to(&self, session: &mut Session<'_>) {
        let mut buffer = [0u8; 4];
        let text = self.encode_utf8(&mut buffer);
        session.scalar(Scalar::Text(text));
    }
}

impl Writable for str {
    fn write_to(&self, session: &mut Session<'_>) {
        session.scalar(Scalar::Text(self));
    }
}

impl Writable for String {
    fn write_to(&self, session: &mut Session<'_>) {
        session.scalar(Scalar::Text(self));
    }
}

impl Writable for Complex<f64> {
    fn write_to(&self, session: &mut Session<'_>) {
        session.complex(Scalar::Real(self.re), Scalar::Real(self.im));
    }
}

impl Writable for Complex<f32> {
    fn write_to(&self, session: &mut Session<'_>) {
        session.complex(Scalar::Real(widen(self.re)), Scalar::Real(widen(self.im)));
    }
}

impl<T: Writable> Writable for [T] {
    fn write_to(&self, session: &mut Session<'_>) {
        session.items(self);
    }
}

impl<T: Writable> Writable for Vec<T> {
    fn write_to(&self, session: &mut Session<'_>) {
        session.items(self);
    }
}

impl<T: Writable, const N: usize> Writable for [T; N] {
    fn write_to(&self, session: &mut Session<'_>) {
        session.items(self);
    }
}

impl<T: Writable> Writable for Array<T> {
    fn write_to(&self, session: &mut Session<'_>) {
        session.items(self);
    }
}

impl<T: Writable + ?Sized> Writable for &T {
    fn write_to(&self, session: &mut Session<'_>) {
        (**self).write_to(session);
    }
}

impl Writable for Value {
    fn write_to(&self, session: &mut Session<'_>) {
        match self {
            Value::Integer(i) => i.write_to(session),
            Value::Real(x) => x.write_to(session),
            Value::Logical(b) => b.write_to(session),
            Value::Text(s) => s.write_to(session),
            Value::Complex(c) => c.write_to(session),
            Value::Array(a) => a.write_to(session),
        }
    }
}

// Single precision values keep their shortest decimal spelling rather than
// the binary expansion a plain widening would expose.
fn widen(x: f32) -> f64 {
    x.to_string()
        .parse()
        .unwrap_or(f64::from(x))
}
