//! Rank-generic arrays stored in column-major order

use std::fmt;

/// A multi-dimensional array of any rank. Elements are stored, iterated and
/// written with the first index varying fastest. Indices are zero-origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Array<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeError {
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shape holds {} elements but {} were supplied",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for ShapeError {}

impl<T> Array<T> {
    /// Wrap `data`, already in column-major order, with the given extents.
    pub fn new(shape: &[usize], data: Vec<T>) -> Result<Array<T>, ShapeError> {
        let expected = shape
            .iter()
            .product();
        if data.len() != expected {
            return Err(ShapeError {
                expected,
                actual: data.len(),
            });
        }

        Ok(Array {
            shape: shape.to_vec(),
            data,
        })
    }

    /// Build an array by calling `f` with each index tuple, in column-major
    /// order.
    pub fn from_fn<F>(shape: &[usize], mut f: F) -> Array<T>
    where
        F: FnMut(&[usize]) -> T,
    {
        let total: usize = shape
            .iter()
            .product();
        let mut data = Vec::with_capacity(total);
        let mut index = vec![0; shape.len()];

        for _ in 0..total {
            data.push(f(&index));
            step(&mut index, shape);
        }

        Array {
            shape: shape.to_vec(),
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape
            .len()
    }

    pub fn len(&self) -> usize {
        self.data
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.data
            .is_empty()
    }

    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.rank() {
            return None;
        }

        let mut linear = 0;
        let mut stride = 1;
        for (i, extent) in index
            .iter()
            .zip(&self.shape)
        {
            if i >= extent {
                return None;
            }
            linear += i * stride;
            stride *= extent;
        }

        self.data
            .get(linear)
    }

    /// Elements in column-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data
            .iter()
    }

    /// Elements paired with their index tuples, in column-major order.
    pub fn indexed(&self) -> Indexed<'_, T> {
        Indexed {
            array: self,
            index: vec![0; self.rank()],
            linear: 0,
        }
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy, single-pass walk over an array's index tuples. Request a new one
/// from [`Array::indexed`] to start again.
pub struct Indexed<'a, T> {
    array: &'a Array<T>,
    index: Vec<usize>,
    linear: usize,
}

impl<'a, T> Iterator for Indexed<'a, T> {
    type Item = (Vec<usize>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let element = self
            .array
            .data
            .get(self.linear)?;
        let index = self
            .index
            .clone();

        step(&mut self.index, &self.array.shape);
        self.linear += 1;

        Some((index, element))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .array
            .len()
            - self.linear;
        (remaining, Some(remaining))
    }
}

// Odometer increment with the first position turning fastest.
fn step(index: &mut [usize], shape: &[usize]) {
    for (i, extent) in index
        .iter_mut()
        .zip(shape)
    {
        *i += 1;
        if *i < *extent {
            return;
        }
        *i = 0;
    }
}
