//! Nextensor describes n-dimensional tensors without touching their elements.
//!
//! A [`TensorMetadata`] holds the shape, strides and offset that locate a tensor's
//! elements inside a flat buffer. Slicing, reshaping, permuting, squeezing and
//! unsqueezing are pure functions from one metadata to another: no element is
//! copied and the input is never modified.
//!
//! Layouts are row-major. Fresh tensors get canonical strides
//! (`strides[rank - 1] == 1`, `strides[i] == strides[i + 1] * shape[i + 1]`);
//! views keep whatever strides the transformation produced and recompute the
//! contiguity flag. A rank 0 shape is a scalar holding one element.
//!
//! ## A quick guide
//! - Build metadata with [`TensorMetadata::new`] or, for a compile-time shape,
//!   [`TensorMetadata::from_shape`].
//! - Derive views with [`TensorMetadata::slice`], [`TensorMetadata::reshape`],
//!   [`TensorMetadata::permute`], [`TensorMetadata::transpose`],
//!   [`TensorMetadata::squeeze`] and [`TensorMetadata::unsqueeze`].
//! - Map between indices and buffer positions with [`flatten_index`],
//!   [`unflatten_index`] and [`TensorMetadata::offset_of`].
//! - Pair metadata with an owned buffer through [`Tensor`].
//!
//! ## What can you do with it?
//! ```
//! use nextensor_core::{Tensor, TensorMetadata};
//!
//! let m = TensorMetadata::new(&[4, 5]);
//! let s = m.slice(&[1, 1], &[3, 4]).unwrap();
//! assert_eq!(s.shape(), &[2, 3]);
//! assert_eq!(s.strides(), &[5, 1]);
//! assert_eq!(s.offset(), 6);
//!
//! let t = Tensor::from_vec((0..20).collect::<Vec<i32>>(), &[4, 5]).unwrap();
//! let view = t.slice(&[1, 1], &[3, 4]).unwrap().transpose().unwrap();
//! assert_eq!(view.to_vec2().unwrap(), vec![vec![6, 11], vec![7, 12], vec![8, 13]]);
//! ```

mod cpu_storage;
mod device;
mod dtype;
mod error;
mod index;
mod metadata;
mod op;
mod shape;
mod storage;
mod tensor;
mod view;

pub use cpu_storage::{CpuStorage, PARALLEL_GATHER_THRESHOLD};
pub use device::DeviceType;
pub use dtype::{DType, DataType};
pub use error::{Context, Error, Result};
pub use index::{
    flatten_index, flatten_index_static, unflatten_index, unflatten_index_static, StridedIndex,
};
pub use metadata::{MemoryLayout, TensorMetadata};
pub use op::{OpCategory, OpType};
pub use shape::{
    checked_size, compute_size, compute_size_static, compute_strides, compute_strides_static,
    Shape, R0, R1, R2, R3, R4, R5, R6,
};
pub use storage::{BackendStorage, TensorStorage};
pub use tensor::Tensor;
