//! Compile-time shapes and row-major stride/size arithmetic.
//!
//! The slice-based functions are the single implementation; the `*_static`
//! forms only choose where the result lives.

/// A shape known at compile time.
pub trait Shape {
    const RANK: usize;

    fn shape() -> Vec<usize>;

    fn strides() -> Vec<usize> {
        compute_strides(&Self::shape())
    }

    fn element_count() -> usize {
        compute_size(&Self::shape())
    }
}

/// The rank 0 (scalar) shape.
pub struct R0;

impl Shape for R0 {
    const RANK: usize = 0;

    fn shape() -> Vec<usize> {
        Vec::new()
    }
}

macro_rules! shape {
    (($($C:ident),*), ($($N:tt),*), $rank:expr, $name:ident) => {
        pub struct $name<$($C $N: usize, )*>;

        impl<$($C $N: usize, )*> Shape for $name<$({ $N }, )*> {
            const RANK: usize = $rank;

            fn shape() -> Vec<usize> {
                vec![$($N, )*]
            }
        }
    };
}

shape!((const), (A), 1, R1);
shape!((const, const), (A, B), 2, R2);
shape!((const, const, const), (A, B, C), 3, R3);
shape!((const, const, const, const), (A, B, C, D), 4, R4);
shape!((const, const, const, const, const), (A, B, C, D, E), 5, R5);
shape!((const, const, const, const, const, const), (A, B, C, D, E, F), 6, R6);

/// Write the canonical row-major strides of `shape` into `out`.
///
/// `out` must have the same length as `shape`. Strides saturate at `usize::MAX`
/// when the trailing dimensions do not fit; [`checked_size`] tells whether that
/// can happen for a shape.
pub(crate) fn fill_strides(shape: &[usize], out: &mut [usize]) {
    debug_assert_eq!(shape.len(), out.len());
    let mut acc: usize = 1;
    // Iterate dims in reverse to accumulate products
    for (stride, dim) in out.iter_mut().zip(shape).rev() {
        *stride = acc;
        acc = acc.saturating_mul(*dim);
    }
}

/// Canonical row-major strides: `strides[rank - 1] == 1` and
/// `strides[i] == strides[i + 1] * shape[i + 1]`. Empty for a scalar.
pub fn compute_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    fill_strides(shape, &mut strides);
    strides
}

/// Fixed-rank form of [`compute_strides`].
pub fn compute_strides_static<const N: usize>(shape: &[usize; N]) -> [usize; N] {
    let mut strides = [0; N];
    fill_strides(shape, &mut strides);
    strides
}

/// Number of elements addressed by `shape`, or `None` if it does not fit in a `usize`.
///
/// An empty shape is a scalar and holds one element; any zero dimension
/// makes the total zero, however large the other dimensions are.
pub fn checked_size(shape: &[usize]) -> Option<usize> {
    if shape.contains(&0) {
        return Some(0);
    }
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

/// Number of elements addressed by `shape`.
///
/// Saturates at `usize::MAX` for shapes [`checked_size`] rejects.
pub fn compute_size(shape: &[usize]) -> usize {
    checked_size(shape).unwrap_or(usize::MAX)
}

/// Fixed-rank form of [`compute_size`].
pub fn compute_size_static<const N: usize>(shape: &[usize; N]) -> usize {
    compute_size(shape)
}

/// Whether `strides` are exactly the canonical row-major strides of `shape`.
pub(crate) fn is_row_major(shape: &[usize], strides: &[usize]) -> bool {
    if shape.len() != strides.len() {
        return false;
    }
    let mut acc: usize = 1;
    for (&dim, &stride) in shape.iter().zip(strides).rev() {
        if stride != acc {
            return false;
        }
        acc = acc.saturating_mul(dim);
    }
    true
}

/// Whether `strides` are exactly the canonical column-major strides of `shape`.
pub(crate) fn is_column_major(shape: &[usize], strides: &[usize]) -> bool {
    if shape.len() != strides.len() {
        return false;
    }
    let mut acc: usize = 1;
    for (&dim, &stride) in shape.iter().zip(strides) {
        if stride != acc {
            return false;
        }
        acc = acc.saturating_mul(dim);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_and_size_2x3x4() {
        assert_eq!(compute_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(compute_size(&[2, 3, 4]), 24);
    }

    #[test]
    fn scalar_convention() {
        assert!(compute_strides(&[]).is_empty());
        assert_eq!(compute_size(&[]), 1);
        assert_eq!(compute_strides_static(&[]), [0usize; 0]);
        assert_eq!(compute_size_static(&[]), 1);
    }

    #[test]
    fn zero_dims() {
        assert_eq!(compute_size(&[3, 0, 2]), 0);
        assert_eq!(compute_strides(&[3, 0, 2]), vec![0, 2, 1]);
    }

    #[test]
    fn oversized_shapes_saturate() {
        let big = 1usize << 32;
        assert_eq!(checked_size(&[big, big]), None);
        assert_eq!(compute_size(&[big, big]), usize::MAX);
        assert_eq!(checked_size(&[big, big, 0]), Some(0));
        assert_eq!(checked_size(&[usize::MAX, 1]), Some(usize::MAX));
        assert_eq!(compute_strides(&[usize::MAX, 2]), vec![2, 1]);
        assert_eq!(compute_strides(&[2, big, big]), vec![usize::MAX, big, 1]);
    }

    #[test]
    fn static_matches_dynamic() {
        let shapes: [[usize; 4]; 3] = [[1, 3, 1, 4], [5, 1, 2, 7], [2, 2, 2, 2]];
        for shape in shapes {
            assert_eq!(
                compute_strides_static(&shape).to_vec(),
                compute_strides(&shape)
            );
            assert_eq!(compute_size_static(&shape), compute_size(&shape));
        }
    }

    #[test]
    fn shape_markers() {
        assert_eq!(R0::shape(), Vec::<usize>::new());
        assert_eq!(R0::element_count(), 1);
        assert_eq!(R3::<2, 3, 4>::RANK, 3);
        assert_eq!(R3::<2, 3, 4>::strides(), vec![12, 4, 1]);
        assert_eq!(R6::<1, 2, 3, 4, 5, 6>::element_count(), 720);
    }

    #[test]
    fn layout_classification() {
        assert!(is_row_major(&[2, 3], &[3, 1]));
        assert!(!is_row_major(&[2, 3], &[1, 2]));
        assert!(is_column_major(&[2, 3], &[1, 2]));
        assert!(is_row_major(&[], &[]));
        assert!(!is_row_major(&[2], &[]));
    }
}
