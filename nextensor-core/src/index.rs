//! Conversion between multi-dimensional indices and flat buffer offsets.

use crate::{Error, Result};

pub(crate) fn flatten_index_unchecked(strides: &[usize], indices: &[usize]) -> usize {
    strides.iter().zip(indices).map(|(s, i)| s * i).sum()
}

fn unflatten_into(strides: &[usize], mut flat: usize, out: &mut [usize]) {
    for (index, &stride) in out.iter_mut().zip(strides) {
        if stride == 0 {
            *index = 0;
            continue;
        }
        *index = flat / stride;
        flat %= stride;
    }
}

/// `Σ indices[i] * strides[i]`.
///
/// Components are not bounds checked against any shape; use
/// [`TensorMetadata::offset_of`](crate::TensorMetadata::offset_of) for that.
pub fn flatten_index(strides: &[usize], indices: &[usize]) -> Result<usize> {
    if strides.len() != indices.len() {
        return Err(Error::ShapeMismatch {
            op: "flatten_index",
            what: "indices",
            expected: strides.len(),
            got: indices.len(),
        });
    }
    Ok(flatten_index_unchecked(strides, indices))
}

/// Fixed-rank form of [`flatten_index`]. The lengths agree by construction.
pub fn flatten_index_static<const N: usize>(strides: &[usize; N], indices: &[usize; N]) -> usize {
    flatten_index_unchecked(strides, indices)
}

/// Recover a multi-index from a flat offset by successive division.
///
/// Only valid when `strides` are the canonical row-major strides of some shape.
/// Sliced, permuted or otherwise custom strides give meaningless results; use
/// [`TensorMetadata::unflatten`](crate::TensorMetadata::unflatten), which checks
/// contiguity, when the layout is not known to be canonical.
pub fn unflatten_index(strides: &[usize], flat: usize) -> Vec<usize> {
    let mut indices = vec![0; strides.len()];
    unflatten_into(strides, flat, &mut indices);
    indices
}

/// Fixed-rank form of [`unflatten_index`].
pub fn unflatten_index_static<const N: usize>(strides: &[usize; N], flat: usize) -> [usize; N] {
    let mut indices = [0; N];
    unflatten_into(strides, flat, &mut indices);
    indices
}

/// Iterator over the buffer positions of every element of a strided view,
/// in logical row-major order (last index changes fastest).
#[derive(Debug, Clone)]
pub struct StridedIndex<'a> {
    next: Option<usize>,
    multi_index: Vec<usize>,
    shape: &'a [usize],
    strides: &'a [usize],
    remaining: usize,
}

impl<'a> StridedIndex<'a> {
    pub fn new(shape: &'a [usize], strides: &'a [usize], offset: usize) -> Self {
        let remaining: usize = shape.iter().product();
        Self {
            next: (remaining > 0).then_some(offset),
            multi_index: vec![0; shape.len()],
            shape,
            strides,
            remaining,
        }
    }
}

impl Iterator for StridedIndex<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.remaining -= 1;

        // Odometer step from the innermost axis
        let mut position = current;
        let mut carried = true;
        for ((index, &dim), &stride) in self
            .multi_index
            .iter_mut()
            .zip(self.shape)
            .zip(self.strides)
            .rev()
        {
            if *index + 1 < dim {
                *index += 1;
                position += stride;
                carried = false;
                break;
            }
            position -= *index * stride;
            *index = 0;
        }
        self.next = if carried { None } else { Some(position) };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for StridedIndex<'_> {}
