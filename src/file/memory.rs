//! In-memory backend for class files that are already loaded into a buffer.

use super::Backend;
use crate::{Error::TruncatedInput, Result};

/// Class file bytes owned in a [`Vec<u8>`].
#[derive(Debug)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Takes ownership of `data`.
    pub fn new(data: Vec<u8>) -> Memory {
        Memory { data }
    }
}

impl Backend for Memory {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(TruncatedInput);
        };

        if offset_end > self.data.len() {
            return Err(TruncatedInput);
        }

        Ok(&self.data[offset..offset_end])
    }

    fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}
