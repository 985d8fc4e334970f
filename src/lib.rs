// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![warn(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # classscope
//!
//! A disassembler for compiled JVM class files. `classscope` decodes the binary class file
//! format into a structured model and renders it as a readable listing: constant pool
//! references resolved to symbolic names, field and method declarations, bytecode with
//! resolved operands and every structural attribute (annotations, generic signatures, inner
//! classes, modules, records, permitted subclasses, bootstrap methods).
//!
//! ## Features
//!
//! - **Complete class file decoding** - Constant pool, members, and 30 attribute kinds
//!   including `Module`, `Record`, `PermittedSubclasses` and type annotations
//! - **Bytecode disassembly** - All JVM opcodes including `wide`, padded switches and
//!   `invokedynamic`, with branch targets checked against instruction boundaries
//! - **Dynamic constants** - `invokedynamic` and `ldc` of dynamic constants print the
//!   bootstrap method and its resolved static arguments
//! - **Strict error reporting** - Malformed input fails with a precise error, never with
//!   partial output
//! - **Parallel batches** - [`disassemble_all`] spreads many classes over a thread pool
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! let bytes = std::fs::read("Main.class")?;
//! let listing = classscope::disassemble(&bytes, false)?;
//! println!("{listing}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Working with the model
//!
//! ```rust,no_run
//! use classscope::ClassFile;
//! use std::path::Path;
//!
//! let class = ClassFile::from_file(Path::new("Main.class"))?;
//! for method in &class.methods {
//!     if let Some(code) = method.code() {
//!         println!("{} has {} instructions", method.name, code.instructions.len());
//!     }
//! }
//! # Ok::<(), classscope::Error>(())
//! ```
//!
//! ### Configuring the listing
//!
//! ```rust,no_run
//! use classscope::{disassemble_with, DisassemblyConfig};
//!
//! let bytes = std::fs::read("Main.class")?;
//! let listing = disassemble_with(&bytes, &DisassemblyConfig::full())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`]. Every error is fatal for the class it was
//! raised for:
//!
//! ```rust,no_run
//! use classscope::{disassemble, Error};
//!
//! match disassemble(&[0x00, 0x01, 0x02], false) {
//!     Ok(listing) => println!("{listing}"),
//!     Err(Error::NotAClassFile(magic)) => println!("not a class file: {magic:#010x}"),
//!     Err(error) => println!("error: {error}"),
//! }
//! ```
//!
//! ## Development and Testing
//!
//! ```bash
//! cargo test
//! cargo bench
//! cargo +nightly fuzz run classfile --release
//! ```
#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust,no_run
/// use classscope::prelude::*;
///
/// let class = ClassFile::from_file("Main.class".as_ref())?;
/// let config = DisassemblyConfig::verbose();
/// println!("{}", Printer::new(&class, &config).print()?);
/// # Ok::<(), classscope::Error>(())
/// ```
pub mod prelude;

/// The class model: constant pool, members, flags, descriptors and attributes.
///
/// # Key Components
///
/// - [`ClassFile`] - A parsed class file
/// - [`classfile::constantpool::ConstantPool`] - Constant pool with symbolic resolution
/// - [`classfile::member`] - Field and method declarations
/// - [`classfile::attributes`] - The attribute decoders
/// - [`classfile::flags`] - Access flag types
/// - [`classfile::descriptor`] - Field and method descriptors
pub mod classfile;

/// JVM bytecode decoding.
///
/// # Key Types
///
/// - [`disassembler::Instruction`] - A decoded instruction
/// - [`disassembler::Operand`] - Instruction operands (constants, locals, targets, tables)
///
/// # Main Functions
///
/// - [`disassembler::decode_instruction`] - Decode a single instruction
/// - [`disassembler::decode_code`] - Decode and validate a complete code array
///
/// # Examples
///
/// ```rust
/// use classscope::{disassembler::decode_instruction, Parser};
///
/// let code = [0x10, 0xFE]; // bipush -2
/// let mut parser = Parser::new(&code);
/// let instruction = decode_instruction(&mut parser)?;
/// assert_eq!(instruction.mnemonic, "bipush");
/// # Ok::<(), classscope::Error>(())
/// ```
pub mod disassembler;

/// Listing output.
pub mod render;

use std::{io::Read, path::Path};

use md5::{Digest, Md5};
use rayon::prelude::*;

/// `classscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `classscope` Error type
///
/// The error type for all operations in this crate.
///
/// # Examples
///
/// ```rust,no_run
/// use classscope::{ClassFile, Error};
///
/// match ClassFile::from_file(std::path::Path::new("Main.class")) {
///     Ok(class) => println!("Loaded {}", class.this_class),
///     Err(Error::NotAClassFile(magic)) => println!("Bad magic {magic:#010x}"),
///     Err(Error::MalformedCode { offset, message }) => println!("Bad code at {offset}: {message}"),
///     Err(e) => println!("Error: {e}"),
/// }
/// ```
pub use error::Error;

/// A parsed class file. See [`classfile::ClassFile`].
pub use classfile::ClassFile;

/// The constant pool of a class. See [`classfile::constantpool::ConstantPool`].
pub use classfile::constantpool::ConstantPool;

/// Listing output types. See [`render::Printer`] and [`render::DisassemblyConfig`].
pub use render::{DisassemblyConfig, Printer};

/// Low-level input access: the big-endian [`Parser`] and the [`File`] byte owner.
///
/// # Example
///
/// ```rust
/// use classscope::Parser;
///
/// let data = [0xCA, 0xFE, 0xBA, 0xBE];
/// let mut parser = Parser::new(&data);
/// assert_eq!(parser.read_u4()?, 0xCAFE_BABE);
/// # Ok::<(), classscope::Error>(())
/// ```
pub use file::{parser::Parser, File};

/// Disassemble an in-memory class file.
///
/// `verbose` adds stack map frames, raw bytes of unrecognised attributes, member flags and
/// code lengths to the listing.
///
/// # Errors
/// Returns the first error found while decoding or rendering; no partial listing is produced.
pub fn disassemble(data: &[u8], verbose: bool) -> Result<String> {
    let config = DisassemblyConfig {
        verbose,
        ..DisassemblyConfig::default()
    };
    disassemble_with(data, &config)
}

/// Disassemble a class file from disk. `constant_pool` adds the constant pool table.
///
/// # Errors
/// Returns [`Error::FileError`] if the file can not be read, otherwise the errors of
/// [`disassemble`].
pub fn disassemble_path(path: &Path, verbose: bool, constant_pool: bool) -> Result<String> {
    let file = File::from_file(path)?;
    let config = DisassemblyConfig {
        verbose,
        constant_pool,
        ..DisassemblyConfig::default()
    };
    disassemble_with(file.data(), &config)
}

/// Disassemble a class file read from a stream. `constant_pool` adds the constant pool table.
///
/// # Errors
/// Returns [`Error::FileError`] if reading fails, otherwise the errors of [`disassemble`].
pub fn disassemble_reader<R: Read>(reader: R, verbose: bool, constant_pool: bool) -> Result<String> {
    let file = File::from_reader(reader)?;
    let config = DisassemblyConfig {
        verbose,
        constant_pool,
        ..DisassemblyConfig::default()
    };
    disassemble_with(file.data(), &config)
}

/// Disassemble an in-memory class file with full control over the listing.
///
/// # Errors
/// See [`disassemble`].
pub fn disassemble_with(data: &[u8], config: &DisassemblyConfig) -> Result<String> {
    let class = ClassFile::parse(data)?;
    let printer = Printer::new(&class, config);
    if config.hash {
        printer.with_digest(md5_hex(data)).print()
    } else {
        printer.print()
    }
}

/// Disassemble many class files from disk in parallel.
///
/// Returns one result per path, in the order of `paths`. A failing class does not affect the
/// others.
pub fn disassemble_all<P>(paths: &[P], config: &DisassemblyConfig) -> Vec<Result<String>>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| {
            let file = File::from_file(path.as_ref())?;
            disassemble_with(file.data(), config)
        })
        .collect()
}

fn md5_hex(data: &[u8]) -> String {
    Md5::digest(data)
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
