//! Big-endian, bounds-checked primitive reads for class file decoding.
//!
//! Every multi-byte quantity in a JVM class file is stored big-endian. This module provides the
//! [`crate::file::io::ClassIO`] trait, implemented for the primitive integer and floating point
//! types, and the free functions [`crate::file::io::read_be`] and [`crate::file::io::read_be_at`]
//! which the [`crate::Parser`] builds on.
//!
//! # Supported Types
//! - **Unsigned integers**: `u8` (`u1`), `u16` (`u2`), `u32` (`u4`), `u64`
//! - **Signed integers**: `i8`, `i16`, `i32`, `i64`
//! - **Floating point**: `f32`, `f64`
//!
//! # Examples
//!
//! ```rust,ignore
//! use classscope::file::io::read_be_at;
//!
//! let data = [0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x41];
//! let mut offset = 0;
//! let magic: u32 = read_be_at(&data, &mut offset)?;
//! let major: u16 = read_be_at(&data, &mut offset)?;
//! assert_eq!(magic, 0xCAFE_BABE);
//! assert_eq!(major, 0x41);
//! assert_eq!(offset, 6);
//! ```

use crate::{Error::TruncatedInput, Result};

/// Trait for primitive types that can be decoded from their big-endian byte representation.
///
/// Each implementation names the fixed-size byte array it is decoded from through the
/// associated `Bytes` type (e.g. `[u8; 4]` for `u32`).
pub trait ClassIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in big-endian
    fn from_be_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_class_io {
    ($($ty:ty => $len:literal),* $(,)?) => {
        $(
            impl ClassIO for $ty {
                type Bytes = [u8; $len];

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }
            }
        )*
    };
}

impl_class_io! {
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
    f32 => 4,
    f64 => 8,
}

/// Reads a big-endian value from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::TruncatedInput`] if `data` is shorter than `T`.
pub fn read_be<T: ClassIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_be_at(data, &mut offset)
}

/// Reads a big-endian value at `offset` and advances `offset` by the size of `T`.
///
/// The offset is left untouched when the read fails.
///
/// # Errors
/// Returns [`crate::Error::TruncatedInput`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_be_at<T: ClassIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(TruncatedInput);
    };

    if end > data.len() {
        return Err(TruncatedInput);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(TruncatedInput);
    };

    *offset = end;

    Ok(T::from_be_bytes(read))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_be_u8() {
        let result = read_be::<u8>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x1);
    }

    #[test]
    fn read_be_i8() {
        let result = read_be::<i8>(&[0xFF]).unwrap();
        assert_eq!(result, -1);
    }

    #[test]
    fn read_be_u16() {
        let result = read_be::<u16>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x102);
    }

    #[test]
    fn read_be_i16() {
        let result = read_be::<i16>(&[0xFF, 0xFE]).unwrap();
        assert_eq!(result, -2);
    }

    #[test]
    fn read_be_u32() {
        let result = read_be::<u32>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0102_0304);
    }

    #[test]
    fn read_be_i32() {
        let result = read_be::<i32>(&[0x80, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(result, i32::MIN);
    }

    #[test]
    fn read_be_u64() {
        let result = read_be::<u64>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0102_0304_0506_0708);
    }

    #[test]
    fn read_be_f32() {
        let result = read_be::<f32>(&[0x3F, 0xC0, 0x00, 0x00]).unwrap();
        assert_eq!(result, 1.5);
    }

    #[test]
    fn read_be_f64() {
        let result = read_be::<f64>(&[0x40, 0x00, 0, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(result, 2.0);
    }

    #[test]
    fn read_be_at_advances() {
        let mut offset = 2;
        let value = read_be_at::<u16>(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(value, 0x0304);
        assert_eq!(offset, 4);
    }

    #[test]
    fn read_be_at_truncated_keeps_offset() {
        let mut offset = 6;
        let result = read_be_at::<u32>(&TEST_BUFFER, &mut offset);
        assert!(matches!(result, Err(Error::TruncatedInput)));
        assert_eq!(offset, 6);
    }

    #[test]
    fn read_be_empty() {
        assert!(matches!(read_be::<u8>(&[]), Err(Error::TruncatedInput)));
    }
}
