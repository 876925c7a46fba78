use crate::{DType, DataType, DeviceType, TensorMetadata};

/// A flat element buffer living on some device.
pub trait BackendStorage<T: DType> {
    fn device(&self) -> DeviceType;

    /// Number of elements in the buffer.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn as_slice(&self) -> &[T];
}

/// What a tensor exposes to the outside: one metadata, one element type and
/// access to the buffer the metadata addresses.
///
/// Raw pointers point at element 0 of the buffer, not at the view's offset.
pub trait TensorStorage {
    type Elem: DType;

    fn metadata(&self) -> &TensorMetadata;

    fn data_type(&self) -> DataType {
        <Self::Elem as DType>::DATA_TYPE
    }

    fn device(&self) -> DeviceType;

    fn as_ptr(&self) -> *const Self::Elem;

    /// Mutable access to the buffer. Implementations must not hand out a pointer
    /// into a buffer that another live view can still read.
    fn as_mut_ptr(&mut self) -> *mut Self::Elem;
}
