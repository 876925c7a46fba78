use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    index::{flatten_index_unchecked, unflatten_index},
    shape::compute_strides,
    storage::BackendStorage,
    DType, DeviceType, MemoryLayout, TensorMetadata,
};

/// Gathers of at least this many elements from a non-contiguous view run on
/// the rayon pool.
pub const PARALLEL_GATHER_THRESHOLD: usize = 1 << 15;

#[derive(Debug, Clone, PartialEq)]
pub struct CpuStorage<T: DType>(pub(crate) Vec<T>);

impl<T: DType> CpuStorage<T> {
    pub fn from_vec(data: Vec<T>) -> Self {
        Self(data)
    }

    pub fn full(len: usize, v: T) -> Self {
        Self(vec![v; len])
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.0
    }

    /// Copy the elements addressed by `metadata` out in logical row-major order.
    ///
    /// `metadata.storage_span()` must not exceed the buffer length. The direct copy
    /// is chosen from the strides, never from the settable contiguity flag.
    pub(crate) fn gather(&self, metadata: &TensorMetadata) -> Vec<T> {
        let data = &self.0;
        let n = metadata.total_size();
        if metadata.layout() == MemoryLayout::RowMajor {
            let start = metadata.offset();
            return data[start..start + n].to_vec();
        }
        if n < PARALLEL_GATHER_THRESHOLD {
            return metadata.strided_index().map(|pos| data[pos]).collect();
        }

        log::debug!("parallel gather of {n} elements from {metadata}");
        let logical = compute_strides(metadata.shape());
        let offset = metadata.offset();
        let strides = metadata.strides();
        (0..n)
            .into_par_iter()
            .map(|i| {
                let indices = unflatten_index(&logical, i);
                data[offset + flatten_index_unchecked(strides, &indices)]
            })
            .collect()
    }
}

impl<T: DType> BackendStorage<T> for CpuStorage<T> {
    fn device(&self) -> DeviceType {
        DeviceType::Cpu
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn as_slice(&self) -> &[T] {
        &self.0
    }
}
