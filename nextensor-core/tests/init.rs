use nextensor_core::{DataType, Tensor, TensorStorage, R1, R2, R3};

macro_rules! test_dtype {
    ($dtype:ty, $tag:ident, $zero:expr, $one:expr, $full:expr, $dtype_mod:ident) => {
        mod $dtype_mod {
            use super::*;

            #[test]
            fn zeros() {
                let a = Tensor::<$dtype>::zeros(&[3, 4]);
                assert_eq!(a.to_vec2().unwrap(), vec![vec![$zero; 4]; 3]);
            }

            #[test]
            fn ones() {
                let a = Tensor::<$dtype>::ones(&[3, 4]);
                assert_eq!(a.to_vec2().unwrap(), vec![vec![$one; 4]; 3]);
            }

            #[test]
            fn full() {
                let a = Tensor::<$dtype>::full(&[3, 4], $full);
                assert_eq!(a.to_vec2().unwrap(), vec![vec![$full; 4]; 3]);
            }

            #[test]
            fn dim1() {
                let a = Tensor::<$dtype>::full_static::<R1<3>>($full);
                assert_eq!(a.to_vec(), vec![$full; 3]);
            }

            #[test]
            fn dim2() {
                let a = Tensor::<$dtype>::full_static::<R2<3, 4>>($full);
                assert_eq!(a.strides(), &[4, 1]);
                assert_eq!(a.to_vec2().unwrap(), vec![vec![$full; 4]; 3]);
            }

            #[test]
            fn dim3() {
                let a = Tensor::<$dtype>::full_static::<R3<3, 4, 5>>($full);
                assert_eq!(a.elem_count(), 60);
                assert_eq!(a.to_vec(), vec![$full; 60]);
            }

            #[test]
            fn tag() {
                let a = Tensor::<$dtype>::zeros(&[2]);
                assert_eq!(a.data_type(), DataType::$tag);
                assert_eq!(
                    a.data_type().size_in_bytes(),
                    std::mem::size_of::<$dtype>()
                );
            }
        }
    };
}

test_dtype!(f32, F32, 0.0, 1.0, std::f32::consts::PI, f32_test);
test_dtype!(f64, F64, 0.0, 1.0, std::f64::consts::PI, f64_test);
test_dtype!(bool, Bool, false, true, false, bool_test);
test_dtype!(u8, U8, 0, 1, u8::MAX, u8_test);
test_dtype!(u32, U32, 0, 1, u32::MAX, u32_test);
test_dtype!(i64, I64, 0, 1, i64::MAX, i64_test);
#[cfg(feature = "half")]
use half::f16;
#[cfg(feature = "half")]
test_dtype!(
    f16,
    F16,
    f16::from_f32_const(0.0),
    f16::from_f32_const(1.0),
    f16::from_f32_const(0.5),
    f16_test
);
#[cfg(feature = "bfloat")]
use half::bf16;
#[cfg(feature = "bfloat")]
test_dtype!(
    bf16,
    BF16,
    bf16::from_f32_const(0.0),
    bf16::from_f32_const(1.0),
    bf16::from_f32_const(0.5),
    bf16_test
);
