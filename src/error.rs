use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! cp_index_error {
    ($index:expr, $msg:expr) => {
        crate::Error::InvalidConstantPoolIndex {
            index: $index,
            message: $msg.to_string(),
        }
    };

    ($index:expr, $fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidConstantPoolIndex {
            index: $index,
            message: format!($fmt, $($arg)*),
        }
    };
}

macro_rules! malformed_attribute {
    ($attribute:expr, $msg:expr) => {
        crate::Error::MalformedAttribute {
            attribute: $attribute.to_string(),
            message: $msg.to_string(),
        }
    };

    ($attribute:expr, $fmt:expr, $($arg:tt)*) => {
        crate::Error::MalformedAttribute {
            attribute: $attribute.to_string(),
            message: format!($fmt, $($arg)*),
        }
    };
}

macro_rules! malformed_code {
    ($offset:expr, $msg:expr) => {
        crate::Error::MalformedCode {
            offset: $offset,
            message: $msg.to_string(),
        }
    };

    ($offset:expr, $fmt:expr, $($arg:tt)*) => {
        crate::Error::MalformedCode {
            offset: $offset,
            message: format!($fmt, $($arg)*),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every error is fatal to the disassembly request that produced it. Malformed binary input
/// can not self-correct, so decoders propagate the first error they encounter and never
/// resume from a misaligned cursor.
///
/// # Error Categories
///
/// ## Binary Format Errors
/// - [`Error::TruncatedInput`] - A read ran past the end of the available bytes
/// - [`Error::NotAClassFile`] - The magic number is not `0xCAFEBABE`
/// - [`Error::TrailingBytes`] - Bytes remain after the last class attribute
/// - [`Error::Malformed`] - Structural corruption outside of attributes and code
///
/// ## Reference Errors
/// - [`Error::InvalidConstantPoolIndex`] - Index 0, out of range, wrong kind or cyclic chain
///
/// ## Attribute and Code Errors
/// - [`Error::MalformedAttribute`] - An attribute did not consume exactly its declared length
/// - [`Error::MalformedCode`] - Instruction decoding failed or left the code array
/// - [`Error::RecursionLimit`] - Nested annotation values exceeded the depth limit
///
/// ## I/O Errors
/// - [`Error::FileError`] - Filesystem or stream errors while acquiring the bytes
/// - [`Error::Format`] - Writing the rendered listing failed
///
/// # Examples
///
/// ```rust
/// use classscope::{disassemble, Error};
///
/// match disassemble(&[0x01, 0x02, 0x03], false) {
///     Err(Error::NotAClassFile(magic)) => println!("not a class file: {magic:#x}"),
///     Err(e) => println!("other error: {e}"),
///     Ok(text) => println!("{text}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A read would have exceeded the remaining input.
    ///
    /// Raised by the [`crate::Parser`] whenever a fixed-width or length-prefixed read does not
    /// fit into the bytes that are left. The cursor is not moved in that case.
    #[error("Truncated input - a read exceeded the remaining buffer")]
    TruncatedInput,

    /// The input does not start with the class file magic `0xCAFEBABE`.
    ///
    /// Inputs shorter than four bytes are reported with the bytes that were present,
    /// left-aligned into the `u32`.
    #[error("Not a class file - magic {0:#010x}")]
    NotAClassFile(u32),

    /// A constant pool reference could not be resolved.
    ///
    /// Covers index 0, indices past the declared pool count, the unusable slot after a
    /// `Long`/`Double`, references of the wrong kind and cyclic resolution chains.
    #[error("Invalid constant pool index #{index}: {message}")]
    InvalidConstantPoolIndex {
        /// The offending constant pool index
        index: u16,
        /// What was wrong with it
        message: String,
    },

    /// An attribute did not consume exactly its declared length.
    #[error("Malformed attribute {attribute}: {message}")]
    MalformedAttribute {
        /// Name of the attribute that was being decoded
        attribute: String,
        /// Details about the mismatch
        message: String,
    },

    /// The bytecode of a `Code` attribute could not be decoded.
    ///
    /// Raised for unknown opcodes, instructions that overrun the declared code length,
    /// invalid `wide` forms and branch targets that do not land on an instruction boundary.
    #[error("Malformed code at offset {offset}: {message}")]
    MalformedCode {
        /// Offset within the code array at which decoding failed
        offset: usize,
        /// Details about the failure
        message: String,
    },

    /// The file is damaged and could not be parsed.
    ///
    /// Used for structural corruption that is not tied to a specific attribute, such as an
    /// unknown constant pool tag or an undecodable descriptor. The error includes the
    /// source location where the malformation was detected for debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Bytes are left over after the class attributes.
    #[error("{0} trailing bytes after the end of the class file")]
    TrailingBytes(usize),

    /// Recursion limit reached.
    ///
    /// Annotation values can nest annotations and arrays to arbitrary depth. To protect
    /// against corrupted or adversarial input, decoding stops at a fixed depth.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while acquiring the class bytes.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Writing the textual listing failed.
    #[error("{0}")]
    Format(#[from] std::fmt::Error),
}
