use std::fmt::{self, Display};

use crate::{
    index::{unflatten_index, StridedIndex},
    shape::{checked_size, compute_size, compute_strides, is_column_major, is_row_major},
    Error, Result, Shape,
};

/// How the strides of a tensor relate to its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryLayout {
    RowMajor,
    ColumnMajor,
    Unknown,
}

impl MemoryLayout {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RowMajor => "row-major",
            Self::ColumnMajor => "column-major",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for MemoryLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape, strides and offset of a tensor view over a flat element buffer.
///
/// The buffer itself is never referenced: whoever owns it must make sure
/// [`TensorMetadata::storage_span`] fits. Apart from the contiguity flag nothing
/// changes after construction; the view methods all build new values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TensorMetadata {
    shape: Vec<usize>,
    strides: Vec<usize>,
    offset: usize,
    total_size: usize,
    is_contiguous: bool,
}

impl TensorMetadata {
    /// A fresh, contiguous tensor of `shape` starting at element 0.
    pub fn new(shape: &[usize]) -> Self {
        Self::with_offset(shape, 0)
    }

    /// A fresh, contiguous tensor of `shape` starting at element `offset`.
    ///
    /// Shapes whose element count does not fit in a `usize` get a saturated
    /// size and strides; [`TensorMetadata::from_parts`] and the view methods
    /// reject them.
    pub fn with_offset(shape: &[usize], offset: usize) -> Self {
        Self {
            shape: shape.to_vec(),
            strides: compute_strides(shape),
            offset,
            total_size: compute_size(shape),
            is_contiguous: true,
        }
    }

    /// Metadata for a compile-time shape.
    pub fn from_shape<S: Shape>() -> Self {
        Self::new(&S::shape())
    }

    /// A view with explicit strides. Contiguity is derived from the strides.
    ///
    /// Fails if the element count or the addressed span does not fit in a `usize`.
    pub fn from_parts(shape: Vec<usize>, strides: Vec<usize>, offset: usize) -> Result<Self> {
        if shape.len() != strides.len() {
            return Err(Error::ShapeMismatch {
                op: "from_parts",
                what: "strides",
                expected: shape.len(),
                got: strides.len(),
            });
        }
        let Some(total_size) = checked_size(&shape) else {
            log::debug!("from_parts: element count of {shape:?} overflows");
            return Err(Error::Overflow {
                op: "from_parts",
                shape,
            });
        };
        let is_contiguous = is_row_major(&shape, &strides);
        let out = Self {
            total_size,
            shape,
            strides,
            offset,
            is_contiguous,
        };
        if out.storage_span().is_none() {
            log::debug!("from_parts: span of {out} overflows");
            return Err(Error::Overflow {
                op: "from_parts",
                shape: out.shape,
            });
        }
        Ok(out)
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of elements, 1 for a scalar.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    pub fn is_contiguous(&self) -> bool {
        self.is_contiguous
    }

    pub fn set_contiguous(&mut self, contiguous: bool) {
        self.is_contiguous = contiguous;
    }

    pub fn layout(&self) -> MemoryLayout {
        if is_row_major(&self.shape, &self.strides) {
            MemoryLayout::RowMajor
        } else if self.rank() >= 2 && is_column_major(&self.shape, &self.strides) {
            MemoryLayout::ColumnMajor
        } else {
            MemoryLayout::Unknown
        }
    }

    /// Minimum buffer length needed for every element of this view to be addressable,
    /// or `None` if that length does not fit in a `usize`.
    pub fn storage_span(&self) -> Option<usize> {
        if self.total_size == 0 {
            return Some(self.offset);
        }
        let last = self
            .shape
            .iter()
            .zip(&self.strides)
            .try_fold(0usize, |acc, (&dim, &stride)| {
                acc.checked_add((dim - 1).checked_mul(stride)?)
            })?;
        self.offset.checked_add(last)?.checked_add(1)
    }

    /// Buffer position of the element at `indices`, bounds checked.
    pub fn offset_of(&self, indices: &[usize]) -> Result<usize> {
        if indices.len() != self.rank() {
            return Err(Error::ShapeMismatch {
                op: "offset_of",
                what: "indices",
                expected: self.rank(),
                got: indices.len(),
            });
        }
        for (axis, (&index, &dim)) in indices.iter().zip(&self.shape).enumerate() {
            if index >= dim {
                return Err(Error::IndexOutOfBounds {
                    op: "offset_of",
                    axis,
                    index,
                    limit: dim,
                });
            }
        }
        indices
            .iter()
            .zip(&self.strides)
            .try_fold(self.offset, |acc, (&index, &stride)| {
                acc.checked_add(index.checked_mul(stride)?)
            })
            .ok_or_else(|| Error::Overflow {
                op: "offset_of",
                shape: self.shape.clone(),
            })
    }

    /// Multi-index of the element stored at buffer `position`.
    ///
    /// Division-based recovery is only sound for canonical strides, so this
    /// requires the view to be contiguous.
    pub fn unflatten(&self, position: usize) -> Result<Vec<usize>> {
        if !self.is_contiguous {
            return Err(Error::NonContiguous {
                op: "unflatten",
                shape: self.shape.clone(),
                strides: self.strides.clone(),
            });
        }
        let end = self.offset.saturating_add(self.total_size);
        if position < self.offset || position >= end {
            return Err(Error::IndexOutOfBounds {
                op: "unflatten",
                axis: 0,
                index: position,
                limit: end,
            });
        }
        Ok(unflatten_index(&self.strides, position - self.offset))
    }

    /// Buffer positions of all elements, in logical row-major order.
    pub fn strided_index(&self) -> StridedIndex<'_> {
        StridedIndex::new(&self.shape, &self.strides, self.offset)
    }
}

impl Display for TensorMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TensorMetadata(shape={:?}, strides={:?}, offset={}, size={}, rank={}, contiguous={})",
            self.shape,
            self.strides,
            self.offset,
            self.total_size,
            self.rank(),
            self.is_contiguous
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::R2;

    #[test]
    fn fresh_metadata() {
        let m = TensorMetadata::new(&[2, 3, 4]);
        assert_eq!(m.shape(), &[2, 3, 4]);
        assert_eq!(m.strides(), &[12, 4, 1]);
        assert_eq!(m.offset(), 0);
        assert_eq!(m.total_size(), 24);
        assert_eq!(m.rank(), 3);
        assert!(m.is_contiguous());
        assert_eq!(m.layout(), MemoryLayout::RowMajor);
        assert_eq!(m.layout().to_string(), "row-major");
    }

    #[test]
    fn scalar_metadata() {
        let m = TensorMetadata::with_offset(&[], 5);
        assert!(m.is_scalar());
        assert_eq!(m.total_size(), 1);
        assert_eq!(m.storage_span(), Some(6));
        assert_eq!(m.offset_of(&[]).unwrap(), 5);
        assert_eq!(m.strided_index().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn from_shape_marker() {
        assert_eq!(
            TensorMetadata::from_shape::<R2<3, 4>>(),
            TensorMetadata::new(&[3, 4])
        );
    }

    #[test]
    fn from_parts_recomputes_contiguity() {
        let m = TensorMetadata::from_parts(vec![3, 2], vec![1, 3], 0).unwrap();
        assert!(!m.is_contiguous());
        assert_eq!(m.layout(), MemoryLayout::ColumnMajor);
        assert_eq!(MemoryLayout::ColumnMajor.to_string(), "column-major");

        let m = TensorMetadata::from_parts(vec![2, 3], vec![3, 1], 4).unwrap();
        assert!(m.is_contiguous());
    }

    #[test]
    fn from_parts_length_mismatch() {
        let err = TensorMetadata::from_parts(vec![2, 3], vec![1], 0).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn set_contiguous_only_touches_flag() {
        let mut m = TensorMetadata::new(&[2, 2]);
        m.set_contiguous(false);
        assert!(!m.is_contiguous());
        assert_eq!(m.strides(), &[2, 1]);
    }

    #[test]
    fn checked_addressing() {
        let m = TensorMetadata::with_offset(&[4, 5], 3);
        assert_eq!(m.offset_of(&[2, 1]).unwrap(), 3 + 11);
        assert!(matches!(
            m.offset_of(&[4, 0]).unwrap_err(),
            Error::IndexOutOfBounds {
                axis: 0,
                index: 4,
                limit: 4,
                ..
            }
        ));
        assert!(matches!(
            m.offset_of(&[1]).unwrap_err(),
            Error::ShapeMismatch { .. }
        ));
    }

    #[test]
    fn unflatten_contiguous_only() {
        let m = TensorMetadata::with_offset(&[2, 3], 2);
        assert_eq!(m.unflatten(2 + 4).unwrap(), vec![1, 1]);
        assert!(matches!(
            m.unflatten(8).unwrap_err(),
            Error::IndexOutOfBounds { .. }
        ));
        assert!(matches!(
            m.unflatten(1).unwrap_err(),
            Error::IndexOutOfBounds { .. }
        ));

        let t = TensorMetadata::from_parts(vec![3, 2], vec![1, 3], 0).unwrap();
        assert!(matches!(
            t.unflatten(1).unwrap_err(),
            Error::NonContiguous { .. }
        ));
    }

    #[test]
    fn span_of_views() {
        assert_eq!(TensorMetadata::new(&[4, 5]).storage_span(), Some(20));
        let m = TensorMetadata::from_parts(vec![2, 3], vec![5, 1], 6).unwrap();
        assert_eq!(m.storage_span(), Some(6 + 5 + 2 + 1));
        assert_eq!(TensorMetadata::with_offset(&[0, 3], 2).storage_span(), Some(2));
    }

    #[test]
    fn oversized_shapes_are_rejected() {
        let big = 1usize << 32;
        assert!(matches!(
            TensorMetadata::from_parts(vec![big, big], vec![0, 0], 0).unwrap_err(),
            Error::Overflow {
                op: "from_parts",
                ..
            }
        ));
        assert!(matches!(
            TensorMetadata::from_parts(vec![3, 2], vec![usize::MAX, 1], 0).unwrap_err(),
            Error::Overflow { .. }
        ));
        let zero = TensorMetadata::from_parts(vec![big, big, 0], vec![0, 0, 0], 0).unwrap();
        assert_eq!(zero.total_size(), 0);

        let m = TensorMetadata::new(&[usize::MAX, 2]);
        assert_eq!(m.strides(), &[2, 1]);
        assert_eq!(m.total_size(), usize::MAX);
        assert_eq!(m.storage_span(), None);
        assert!(matches!(
            m.offset_of(&[usize::MAX - 1, 1]).unwrap_err(),
            Error::Overflow { .. }
        ));
    }

    #[test]
    fn display() {
        let m = TensorMetadata::new(&[2, 3]);
        assert_eq!(
            m.to_string(),
            "TensorMetadata(shape=[2, 3], strides=[3, 1], offset=0, size=6, rank=2, contiguous=true)"
        );
    }
}
