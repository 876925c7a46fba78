use std::sync::Arc;

use crate::{
    cpu_storage::CpuStorage,
    storage::{BackendStorage, TensorStorage},
    Context, DType, DataType, DeviceType, Error, MemoryLayout, Result, Shape, TensorMetadata,
};

/// An owned element buffer paired with one [`TensorMetadata`].
///
/// View methods return new tensors that share the buffer. Writes go through
/// copy-on-write, so a view never observes a write made through another one.
#[derive(Debug, Clone)]
pub struct Tensor<T: DType> {
    storage: Arc<CpuStorage<T>>,
    metadata: TensorMetadata,
}

impl<T: DType> Tensor<T> {
    /// Pair a buffer with metadata, checking that every addressed element exists.
    pub fn from_parts(storage: Arc<CpuStorage<T>>, metadata: TensorMetadata) -> Result<Self> {
        check_span(&storage, &metadata)?;
        Ok(Self { storage, metadata })
    }

    /// A contiguous tensor over `data`, which must hold exactly `shape`'s element count.
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let metadata = TensorMetadata::new(shape);
        if data.len() != metadata.total_size() {
            return Err(Error::ShapeMismatch {
                op: "from_vec",
                what: "elements",
                expected: metadata.total_size(),
                got: data.len(),
            });
        }
        Ok(Self {
            storage: Arc::new(CpuStorage::from_vec(data)),
            metadata,
        })
    }

    /// Materialize a tensor filled with some value.
    pub fn full(shape: &[usize], v: T) -> Self {
        let metadata = TensorMetadata::new(shape);
        Self {
            storage: Arc::new(CpuStorage::full(metadata.total_size(), v)),
            metadata,
        }
    }

    /// Materialize a tensor filled with zeros.
    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, T::ZERO)
    }

    /// Materialize a tensor filled with ones.
    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, T::ONE)
    }

    /// Materialize a tensor of a compile-time shape filled with some value.
    pub fn full_static<S: Shape>(v: T) -> Self {
        Self::full(&S::shape(), v)
    }

    /// Materialize a tensor of a compile-time shape filled with zeros.
    pub fn zeros_static<S: Shape>() -> Self {
        Self::full_static::<S>(T::ZERO)
    }

    /// Create a tensor filled with zeros with the same shape as `self`.
    pub fn zeros_like(&self) -> Self {
        Self::zeros(self.shape())
    }

    pub fn metadata(&self) -> &TensorMetadata {
        &self.metadata
    }

    pub fn shape(&self) -> &[usize] {
        self.metadata.shape()
    }

    pub fn strides(&self) -> &[usize] {
        self.metadata.strides()
    }

    pub fn offset(&self) -> usize {
        self.metadata.offset()
    }

    pub fn rank(&self) -> usize {
        self.metadata.rank()
    }

    pub fn elem_count(&self) -> usize {
        self.metadata.total_size()
    }

    pub fn is_contiguous(&self) -> bool {
        self.metadata.is_contiguous()
    }

    pub fn dtype(&self) -> DataType {
        T::DATA_TYPE
    }

    /// Whether both tensors view the same buffer.
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }

    /// The whole backing buffer, not just the elements this view addresses.
    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// The whole backing buffer, mutably. Clones it first if another view shares it.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if Arc::strong_count(&self.storage) > 1 {
            log::debug!(
                "copy-on-write of {} elements for {}",
                self.storage.len(),
                self.metadata
            );
        }
        Arc::make_mut(&mut self.storage).as_mut_slice()
    }

    /// A tensor sharing this buffer under different metadata.
    pub fn with_metadata(&self, metadata: TensorMetadata) -> Result<Self> {
        Self::from_parts(self.storage.clone(), metadata)
    }

    /// Replace the metadata of this tensor in place.
    pub fn set_metadata(&mut self, metadata: TensorMetadata) -> Result<()> {
        check_span(&self.storage, &metadata)?;
        self.metadata = metadata;
        Ok(())
    }

    pub fn slice(&self, start: &[usize], end: &[usize]) -> Result<Self> {
        self.with_metadata(self.metadata.slice(start, end)?)
    }

    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        self.with_metadata(self.metadata.reshape(shape)?)
    }

    pub fn flatten(&self) -> Result<Self> {
        self.with_metadata(self.metadata.flatten()?)
    }

    pub fn permute(&self, permutation: &[usize]) -> Result<Self> {
        self.with_metadata(self.metadata.permute(permutation)?)
    }

    pub fn transpose(&self) -> Result<Self> {
        self.with_metadata(self.metadata.transpose()?)
    }

    pub fn squeeze(&self, axes: &[usize]) -> Result<Self> {
        self.with_metadata(self.metadata.squeeze(axes)?)
    }

    pub fn unsqueeze(&self, axes: &[usize]) -> Result<Self> {
        self.with_metadata(self.metadata.unsqueeze(axes)?)
    }

    /// The element at `indices`.
    pub fn get(&self, indices: &[usize]) -> Result<T> {
        let position = self.metadata.offset_of(indices)?;
        self.as_slice()
            .get(position)
            .copied()
            .with_context(|| format!("position {position} outside the buffer"))
    }

    /// Get data in logical row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        self.storage.gather(&self.metadata)
    }

    /// Get data for a matrix.
    pub fn to_vec2(&self) -> Result<Vec<Vec<T>>> {
        let &[_, cols] = self.shape() else {
            return Err(Error::ShapeMismatch {
                op: "to_vec2",
                what: "dims",
                expected: 2,
                got: self.rank(),
            });
        };
        let data = self.to_vec();
        if cols == 0 {
            return Ok(vec![Vec::new(); self.shape()[0]]);
        }
        Ok(data.chunks(cols).map(<[T]>::to_vec).collect())
    }

    /// A contiguous tensor with the same elements. Shares the buffer when this
    /// view is already contiguous.
    pub fn contiguous(&self) -> Self {
        if self.metadata.layout() == MemoryLayout::RowMajor {
            return self.clone();
        }
        log::debug!("materializing non-contiguous view {}", self.metadata);
        Self {
            storage: Arc::new(CpuStorage::from_vec(self.to_vec())),
            metadata: TensorMetadata::new(self.shape()),
        }
    }
}

impl<T: DType> TensorStorage for Tensor<T> {
    type Elem = T;

    fn metadata(&self) -> &TensorMetadata {
        &self.metadata
    }

    fn device(&self) -> DeviceType {
        self.storage.device()
    }

    fn as_ptr(&self) -> *const T {
        self.storage.as_slice().as_ptr()
    }

    fn as_mut_ptr(&mut self) -> *mut T {
        self.as_mut_slice().as_mut_ptr()
    }
}

fn check_span<T: DType>(storage: &CpuStorage<T>, metadata: &TensorMetadata) -> Result<()> {
    match metadata.storage_span() {
        Some(span) if span <= storage.len() => Ok(()),
        span => {
            log::debug!("rejecting {metadata} over a buffer of {}", storage.len());
            Err(Error::StorageOverrun {
                offset: metadata.offset(),
                span: span.map_or(usize::MAX, |span| span - metadata.offset()),
                len: storage.len(),
            })
        }
    }
}
