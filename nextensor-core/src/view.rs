//! View transformations: each takes a metadata by reference and builds a new
//! one describing the same buffer differently. Inputs are validated before
//! anything is constructed.

use crate::{shape::checked_size, Error, Result, TensorMetadata};

impl TensorMetadata {
    /// Restrict every axis to `start[i]..end[i]`.
    ///
    /// Strides are inherited; the offset moves to the parent element at `start`.
    pub fn slice(&self, start: &[usize], end: &[usize]) -> Result<Self> {
        let rank = self.rank();
        for (bounds, what) in [(start, "start indices"), (end, "end indices")] {
            if bounds.len() != rank {
                log::debug!("slice: {what} {bounds:?} do not match rank {rank}");
                return Err(Error::ShapeMismatch {
                    op: "slice",
                    what,
                    expected: rank,
                    got: bounds.len(),
                });
            }
        }

        let mut new_shape = Vec::with_capacity(rank);
        let mut offset = self.offset();
        for (axis, ((&s, &e), (&dim, &stride))) in start
            .iter()
            .zip(end)
            .zip(self.shape().iter().zip(self.strides()))
            .enumerate()
        {
            if e > dim {
                log::debug!("slice: end {e} exceeds dim {dim} on axis {axis}");
                return Err(Error::IndexOutOfBounds {
                    op: "slice",
                    axis,
                    index: e,
                    limit: dim,
                });
            }
            if s >= e {
                log::debug!("slice: empty range {s}..{e} on axis {axis}");
                return Err(Error::IndexOutOfBounds {
                    op: "slice",
                    axis,
                    index: s,
                    limit: e,
                });
            }
            new_shape.push(e - s);
            offset = s
                .checked_mul(stride)
                .and_then(|step| offset.checked_add(step))
                .ok_or_else(|| Error::Overflow {
                    op: "slice",
                    shape: self.shape().to_vec(),
                })?;
        }

        let out = Self::from_parts(new_shape, self.strides().to_vec(), offset)?;
        log::trace!("slice {:?} -> {:?} @ {}", self.shape(), out.shape(), out.offset());
        Ok(out)
    }

    /// Reinterpret a contiguous view with a different shape of the same size.
    pub fn reshape(&self, new_shape: &[usize]) -> Result<Self> {
        let Some(new_size) = checked_size(new_shape) else {
            log::debug!("reshape: element count of {new_shape:?} overflows");
            return Err(Error::Overflow {
                op: "reshape",
                shape: new_shape.to_vec(),
            });
        };
        if new_size != self.total_size() {
            log::debug!(
                "reshape: {:?} ({}) to {new_shape:?} ({new_size})",
                self.shape(),
                self.total_size()
            );
            return Err(Error::ShapeMismatch {
                op: "reshape",
                what: "elements",
                expected: self.total_size(),
                got: new_size,
            });
        }
        if !self.is_contiguous() {
            log::debug!("reshape: non-contiguous source {self}");
            return Err(Error::NonContiguous {
                op: "reshape",
                shape: self.shape().to_vec(),
                strides: self.strides().to_vec(),
            });
        }

        let out = Self::with_offset(new_shape, self.offset());
        log::trace!("reshape {:?} -> {:?}", self.shape(), out.shape());
        Ok(out)
    }

    /// Collapse into a single axis of `total_size` elements.
    pub fn flatten(&self) -> Result<Self> {
        self.reshape(&[self.total_size()])
    }

    /// Reorder axes so that axis `i` of the result is axis `permutation[i]` of `self`.
    ///
    /// An empty `permutation` reverses all axes.
    pub fn permute(&self, permutation: &[usize]) -> Result<Self> {
        let rank = self.rank();
        let permutation: Vec<usize> = if permutation.is_empty() {
            (0..rank).rev().collect()
        } else {
            permutation.to_vec()
        };

        if permutation.len() != rank {
            log::debug!("permute: {permutation:?} does not match rank {rank}");
            return Err(Error::ShapeMismatch {
                op: "permute",
                what: "axes",
                expected: rank,
                got: permutation.len(),
            });
        }
        let mut seen = vec![false; rank];
        let is_bijection = permutation.iter().all(|&axis| {
            let fresh = axis < rank && !seen[axis];
            if fresh {
                seen[axis] = true;
            }
            fresh
        });
        if !is_bijection {
            log::debug!("permute: {permutation:?} is not a permutation of 0..{rank}");
            return Err(Error::InvalidPermutation {
                perm: permutation,
                rank,
            });
        }

        let shape = permutation.iter().map(|&p| self.shape()[p]).collect();
        let strides = permutation.iter().map(|&p| self.strides()[p]).collect();
        let out = Self::from_parts(shape, strides, self.offset())?;
        log::trace!(
            "permute {:?} by {permutation:?} -> {:?}",
            self.shape(),
            out.shape()
        );
        Ok(out)
    }

    /// Reverse the order of all axes.
    pub fn transpose(&self) -> Result<Self> {
        self.permute(&[])
    }

    /// Remove size-1 axes: the listed ones, or every one if `axes` is empty.
    ///
    /// Strides of the remaining axes are carried over unchanged.
    pub fn squeeze(&self, axes: &[usize]) -> Result<Self> {
        let rank = self.rank();
        let mut remove = vec![false; rank];
        if axes.is_empty() {
            for (flag, &dim) in remove.iter_mut().zip(self.shape()) {
                *flag = dim == 1;
            }
        } else {
            for &axis in axes {
                if axis >= rank || self.shape()[axis] != 1 || remove[axis] {
                    log::debug!("squeeze: cannot remove axis {axis} of {:?}", self.shape());
                    return Err(Error::InvalidAxis {
                        op: "squeeze",
                        axis,
                        shape: self.shape().to_vec(),
                    });
                }
                remove[axis] = true;
            }
        }

        let (shape, strides) = self
            .shape()
            .iter()
            .zip(self.strides())
            .zip(&remove)
            .filter(|(_, &removed)| !removed)
            .map(|((&dim, &stride), _)| (dim, stride))
            .unzip();
        let out = Self::from_parts(shape, strides, self.offset())?;
        log::trace!("squeeze {:?} -> {:?}", self.shape(), out.shape());
        Ok(out)
    }

    /// Insert size-1 axes so that each of `axes` is a size-1 axis of the result.
    ///
    /// Axes are inserted in ascending order, each one at most at the rank reached
    /// so far. An inserted axis gets the extent of its right neighbour
    /// (`stride * dim`), or 1 when it is last, so contiguous views stay contiguous.
    pub fn unsqueeze(&self, axes: &[usize]) -> Result<Self> {
        let mut sorted = axes.to_vec();
        sorted.sort_unstable();
        if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
            log::debug!("unsqueeze: axis {} requested twice", pair[0]);
            return Err(Error::InvalidAxis {
                op: "unsqueeze",
                axis: pair[0],
                shape: self.shape().to_vec(),
            });
        }

        let mut shape = self.shape().to_vec();
        let mut strides = self.strides().to_vec();
        for axis in sorted {
            if axis > shape.len() {
                log::debug!("unsqueeze: axis {axis} beyond rank {}", shape.len());
                return Err(Error::IndexOutOfBounds {
                    op: "unsqueeze",
                    axis,
                    index: axis,
                    limit: shape.len(),
                });
            }
            let stride = match (shape.get(axis), strides.get(axis)) {
                (Some(dim), Some(stride)) => dim.saturating_mul(*stride),
                _ => 1,
            };
            shape.insert(axis, 1);
            strides.insert(axis, stride);
        }

        let out = Self::from_parts(shape, strides, self.offset())?;
        log::trace!("unsqueeze {:?} -> {:?}", self.shape(), out.shape());
        Ok(out)
    }
}
