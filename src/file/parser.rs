//! Low-level byte stream parser for class file decoding.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a cursor-based binary data parser
//! for reading the big-endian structures of the JVM class file format and the raw bytecode of
//! `Code` attributes. It offers bounds-checked access to binary data, length-prefixed byte and
//! string reads and alignment support for the padded switch instructions.
//!
//! # Key Components
//!
//! ## Navigation Methods
//! - [`crate::file::parser::Parser::advance_by`] - Skip a number of bytes
//! - [`crate::file::parser::Parser::pos`] - Get current position
//! - [`crate::file::parser::Parser::align`] - Align to byte boundaries
//! - [`crate::file::parser::Parser::remaining`] - Bytes left after the cursor
//!
//! ## Data Access Methods
//! - [`crate::file::parser::Parser::read_be`] - Read primitive types (big-endian)
//! - [`crate::file::parser::Parser::read_u1`], [`crate::file::parser::Parser::read_u2`],
//!   [`crate::file::parser::Parser::read_u4`] - Class file sized unsigned reads
//! - [`crate::file::parser::Parser::peek_byte`] - Peek at current byte without advancing
//! - [`crate::file::parser::Parser::read_bytes`] - Borrow a run of raw bytes
//! - [`crate::file::parser::Parser::read_utf8`] - Decode a run of modified UTF-8
//!
//! # Usage Examples
//!
//! ```rust
//! use classscope::Parser;
//!
//! let data = [0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x41];
//! let mut parser = Parser::new(&data);
//!
//! assert_eq!(parser.read_u4()?, 0xCAFE_BABE);
//! assert_eq!(parser.read_u2()?, 0);
//! assert_eq!(parser.read_u2()?, 65);
//! assert!(!parser.has_more_data());
//! # Ok::<(), classscope::Error>(())
//! ```

use crate::{
    file::io::{read_be_at, ClassIO},
    Error::TruncatedInput,
    Result,
};

/// A cursor over a byte slice that reads class file structures.
///
/// `Parser` maintains an internal position and validates every read against the end of the
/// slice, so truncated or corrupted input surfaces as [`crate::Error::TruncatedInput`] instead of
/// a panic. A failed read never moves the cursor.
///
/// Sub-structures with a declared length (attributes, the code array) are decoded by creating a
/// fresh `Parser` over the slice returned from [`Parser::read_bytes`], which bounds the inner
/// decoder to exactly the declared bytes.
///
/// # Examples
///
/// ```rust
/// use classscope::Parser;
///
/// let data = [0x00, 0x03, b'f', b'o', b'o'];
/// let mut parser = Parser::new(&data);
///
/// let length = parser.read_u2()? as usize;
/// assert_eq!(parser.read_utf8(length)?, "foo");
/// # Ok::<(), classscope::Error>(())
/// ```
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::file::parser::Parser`] from a byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` while the cursor has not reached the end of the data.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Move the cursor forward by `step` bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if fewer than `step` bytes remain.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        self.calc_end_position(step)?;
        self.position += step;
        Ok(())
    }

    /// Returns the current position of the cursor.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Returns the byte at the cursor without consuming it.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if the cursor is at the end of the data.
    pub fn peek_byte(&self) -> Result<u8> {
        if self.position >= self.data.len() {
            return Err(TruncatedInput);
        }
        Ok(self.data[self.position])
    }

    /// Skip padding until the cursor is a multiple of `alignment` from the start of the data.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if the padding runs past the end of the data.
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        let padding = (alignment - (self.position % alignment)) % alignment;
        self.advance_by(padding)
    }

    /// Read a big-endian value of type `T`.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if fewer than `size_of::<T>()` bytes remain.
    pub fn read_be<T: ClassIO>(&mut self) -> Result<T> {
        read_be_at::<T>(self.data, &mut self.position)
    }

    /// Read a `u1`.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] at the end of the data.
    pub fn read_u1(&mut self) -> Result<u8> {
        self.read_be::<u8>()
    }

    /// Read a big-endian `u2`.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if fewer than 2 bytes remain.
    pub fn read_u2(&mut self) -> Result<u16> {
        self.read_be::<u16>()
    }

    /// Read a big-endian `u4`.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if fewer than 4 bytes remain.
    pub fn read_u4(&mut self) -> Result<u32> {
        self.read_be::<u32>()
    }

    /// Read a signed byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] at the end of the data.
    pub fn read_i1(&mut self) -> Result<i8> {
        self.read_be::<i8>()
    }

    /// Read a big-endian signed 16-bit value.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if fewer than 2 bytes remain.
    pub fn read_i2(&mut self) -> Result<i16> {
        self.read_be::<i16>()
    }

    /// Read a big-endian signed 32-bit value.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if fewer than 4 bytes remain.
    pub fn read_i4(&mut self) -> Result<i32> {
        self.read_be::<i32>()
    }

    /// Read a big-endian signed 64-bit value.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if fewer than 8 bytes remain.
    pub fn read_i8(&mut self) -> Result<i64> {
        self.read_be::<i64>()
    }

    /// Returns the number of bytes after the cursor.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Verify that at least `needed` bytes are left, without moving the cursor.
    ///
    /// Used before allocating tables whose size comes from the input.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if fewer than `needed` bytes remain.
    pub fn ensure_remaining(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(TruncatedInput);
        }
        Ok(())
    }

    fn calc_end_position(&self, length: usize) -> Result<usize> {
        let end = self.position.checked_add(length).ok_or(TruncatedInput)?;

        if end > self.data.len() {
            return Err(TruncatedInput);
        }

        Ok(end)
    }

    /// Borrow the next `length` bytes and advance past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if fewer than `length` bytes remain.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let end = self.calc_end_position(length)?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Read `length` bytes of modified UTF-8 (JVMS §4.4.7) and decode them.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if fewer than `length` bytes remain.
    pub fn read_utf8(&mut self, length: usize) -> Result<String> {
        let bytes = self.read_bytes(length)?;
        Ok(decode_modified_utf8(bytes))
    }
}

/// Decode the JVM's modified UTF-8 into a Rust [`String`].
///
/// Plain UTF-8 is taken as is. Otherwise `0xC0 0x80` becomes U+0000, surrogate halves encoded as
/// separate three-byte sequences are recombined and anything undecodable becomes U+FFFD.
#[must_use]
pub fn decode_modified_utf8(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    let is_continuation = |index: usize| bytes.get(index).is_some_and(|b| b & 0xC0 == 0x80);

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        let lead = bytes[index];
        if lead < 0x80 {
            units.push(u16::from(lead));
            index += 1;
        } else if lead & 0xE0 == 0xC0 && is_continuation(index + 1) {
            units.push((u16::from(lead & 0x1F) << 6) | u16::from(bytes[index + 1] & 0x3F));
            index += 2;
        } else if lead & 0xF0 == 0xE0 && is_continuation(index + 1) && is_continuation(index + 2) {
            units.push(
                (u16::from(lead & 0x0F) << 12)
                    | (u16::from(bytes[index + 1] & 0x3F) << 6)
                    | u16::from(bytes[index + 2] & 0x3F),
            );
            index += 3;
        } else {
            units.push(0xFFFD);
            index += 1;
        }
    }

    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn read_class_sized_values() {
        let data = [0x7F, 0x12, 0x34, 0xDE, 0xAD, 0xBE, 0xEF];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_u1().unwrap(), 0x7F);
        assert_eq!(parser.read_u2().unwrap(), 0x1234);
        assert_eq!(parser.read_u4().unwrap(), 0xDEAD_BEEF);
        assert_eq!(parser.pos(), 7);
        assert!(!parser.has_more_data());
    }

    #[test]
    fn read_signed_values() {
        let data = [0xFE, 0xFF, 0x9C, 0xFF, 0xFF, 0xFF, 0xF6];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_i1().unwrap(), -2);
        assert_eq!(parser.read_i2().unwrap(), -100);
        assert_eq!(parser.read_i4().unwrap(), -10);
    }

    #[test]
    fn truncated_read_does_not_advance() {
        let mut parser = Parser::new(&[0x01, 0x02, 0x03]);
        parser.read_u1().unwrap();

        assert!(matches!(parser.read_u4(), Err(Error::TruncatedInput)));
        assert_eq!(parser.pos(), 1);
        assert_eq!(parser.read_u2().unwrap(), 0x0203);
    }

    #[test]
    fn read_bytes_and_remaining() {
        let data = [1, 2, 3, 4, 5];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_bytes(2).unwrap(), &[1, 2]);
        assert_eq!(parser.remaining(), 3);
        assert!(parser.ensure_remaining(3).is_ok());
        assert!(matches!(
            parser.ensure_remaining(4),
            Err(Error::TruncatedInput)
        ));
        assert!(matches!(parser.read_bytes(4), Err(Error::TruncatedInput)));
        assert_eq!(parser.pos(), 2);
    }

    #[test]
    fn advance_by_bounds() {
        let mut parser = Parser::new(&[0; 4]);
        parser.advance_by(4).unwrap();
        assert!(!parser.has_more_data());
        assert!(matches!(parser.advance_by(1), Err(Error::TruncatedInput)));
        assert!(matches!(parser.peek_byte(), Err(Error::TruncatedInput)));
    }

    #[test]
    fn align_is_relative_to_start() {
        let data = [0u8; 12];

        for (start, expected) in [(0, 0), (1, 4), (2, 4), (3, 4), (4, 4), (5, 8)] {
            let mut parser = Parser::new(&data);
            parser.advance_by(start).unwrap();
            parser.align(4).unwrap();
            assert_eq!(parser.pos(), expected, "start {start}");
        }

        let mut parser = Parser::new(&data[..5]);
        parser.advance_by(5).unwrap();
        assert!(matches!(parser.align(4), Err(Error::TruncatedInput)));
    }

    #[test]
    fn peek_does_not_consume() {
        let mut parser = Parser::new(&[0xC4, 0x15]);
        assert_eq!(parser.peek_byte().unwrap(), 0xC4);
        assert_eq!(parser.pos(), 0);
        assert_eq!(parser.read_u1().unwrap(), 0xC4);
    }

    #[test]
    fn read_plain_utf8() {
        let data = "中文Main".as_bytes();
        let mut parser = Parser::new(data);
        assert_eq!(parser.read_utf8(data.len()).unwrap(), "中文Main");
    }

    #[test]
    fn modified_utf8_null() {
        assert_eq!(decode_modified_utf8(&[b'a', 0xC0, 0x80, b'b']), "a\u{0}b");
    }

    #[test]
    fn modified_utf8_surrogate_pair() {
        // U+1F600 as a CESU-8 style surrogate pair
        let data = [0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80];
        assert_eq!(decode_modified_utf8(&data), "\u{1F600}");
    }

    #[test]
    fn modified_utf8_invalid_bytes_are_replaced() {
        assert_eq!(decode_modified_utf8(&[b'x', 0xFF, b'y']), "x\u{FFFD}y");
    }
}
