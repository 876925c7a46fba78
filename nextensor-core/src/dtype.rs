use std::fmt::{self, Debug, Display};

#[cfg(feature = "bfloat")]
use half::bf16;
#[cfg(feature = "half")]
use half::f16;

/// Runtime tag for the element type stored behind a tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    F32,
    F64,
    F16,
    BF16,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Bool,
    Unknown,
}

impl DataType {
    /// Size of one element in bytes. `Unknown` has size 0.
    pub const fn size_in_bytes(&self) -> usize {
        match self {
            Self::F64 | Self::I64 | Self::U64 => 8,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::F16 | Self::BF16 | Self::I16 | Self::U16 => 2,
            // bool is stored as a byte
            Self::I8 | Self::U8 | Self::Bool => 1,
            Self::Unknown => 0,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::F16 => "f16",
            Self::BF16 => "bf16",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Bool => "bool",
            Self::Unknown => "unknown",
        }
    }

    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64 | Self::F16 | Self::BF16)
    }

    pub const fn is_int(&self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
        )
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Marker trait for tensor element types.
pub trait DType: Debug + Clone + Copy + PartialEq + Send + Sync + 'static {
    const ZERO: Self;
    const ONE: Self;
    const DATA_TYPE: DataType;
}

macro_rules! dtype {
    ($rt:ident, $zero:expr, $one:expr, $tag:ident) => {
        impl DType for $rt {
            const ZERO: $rt = $zero;
            const ONE: $rt = $one;
            const DATA_TYPE: DataType = DataType::$tag;
        }
    };
}

dtype!(bool, false, true, Bool);
dtype!(u8, 0u8, 1u8, U8);
dtype!(u16, 0u16, 1u16, U16);
dtype!(u32, 0u32, 1u32, U32);
dtype!(u64, 0u64, 1u64, U64);
dtype!(i8, 0i8, 1i8, I8);
dtype!(i16, 0i16, 1i16, I16);
dtype!(i32, 0i32, 1i32, I32);
dtype!(i64, 0i64, 1i64, I64);
dtype!(f32, 0f32, 1f32, F32);
dtype!(f64, 0f64, 1f64, F64);

#[cfg(feature = "half")]
impl DType for f16 {
    const ZERO: f16 = f16::from_f64_const(0.0);
    const ONE: f16 = f16::from_f64_const(1.0);
    const DATA_TYPE: DataType = DataType::F16;
}

#[cfg(feature = "bfloat")]
impl DType for bf16 {
    const ZERO: bf16 = bf16::from_f64_const(0.0);
    const ONE: bf16 = bf16::from_f64_const(1.0);
    const DATA_TYPE: DataType = DataType::BF16;
}
