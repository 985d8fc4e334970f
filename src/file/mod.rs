//! Class file input abstraction.
//!
//! This module abstracts over the places class file bytes come from (files on disk, in-memory
//! buffers, arbitrary byte streams) and provides the low-level reading primitives used by the
//! decoder.
//!
//! # Key Components
//!
//! ## Core Types
//! - [`crate::file::File`] - Owner of the raw class file bytes
//! - [`crate::file::Backend`] - Trait for different data sources (disk files, memory buffers)
//!
//! ## Parsing Infrastructure
//! - [`crate::file::parser::Parser`] - Cursor based big-endian reader
//! - [`crate::file::io`] - Low-level primitive decoding
//!
//! ## Backend Implementations
//! - [`crate::file::physical::Physical`] - Memory-mapped file backend for disk access
//! - [`crate::file::memory::Memory`] - In-memory buffer backend
//!
//! # Examples
//!
//! ```rust,no_run
//! use classscope::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("Main.class"))?;
//! println!("Loaded class file with {} bytes", file.len());
//! # Ok::<(), classscope::Error>(())
//! ```

pub mod io;
pub mod memory;
pub mod parser;
pub mod physical;

use std::{io::Read, path::Path};

use crate::{Error::TruncatedInput, Result};
use memory::Memory;
use physical::Physical;

/// Backend trait for the source of class file bytes.
///
/// Implementations provide read-only access to a contiguous buffer. They must be `Send + Sync`
/// so that batches of class files can be decoded in parallel.
pub trait Backend: Send + Sync {
    /// Returns a slice of the data at the given offset and length.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TruncatedInput`] if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total size of the data buffer.
    fn len(&self) -> usize;
}

/// The raw bytes of a single class file, independent of where they came from.
pub struct File {
    data: Box<dyn Backend>,
}

impl File {
    /// Memory-map a class file from disk.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file can not be opened or mapped.
    pub fn from_file(path: &Path) -> Result<File> {
        let input = Physical::new(path)?;

        Ok(Self::load(input))
    }

    /// Wrap an owned buffer.
    #[must_use]
    pub fn from_mem(data: Vec<u8>) -> File {
        Self::load(Memory::new(data))
    }

    /// Drain a byte stream into memory.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if reading from the stream fails.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<File> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        Ok(Self::from_mem(data))
    }

    fn load<T: Backend + 'static>(data: T) -> File {
        File {
            data: Box::new(data),
        }
    }

    /// Returns the size of the class file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the class file has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.len() == 0
    }

    /// Returns the complete class file data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.data()
    }

    /// Returns a slice of the class file data.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if the range exceeds the data.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let Some(end) = offset.checked_add(len) else {
            return Err(TruncatedInput);
        };
        if end > self.len() {
            return Err(TruncatedInput);
        }
        self.data.data_slice(offset, len)
    }
}
