//! The in-memory class model and its parser.
//!
//! [`ClassFile::parse`] reads a class file in a single pass in format order (JVMS §4.1):
//! magic, version, constant pool, access flags, this and super class, interfaces, fields,
//! methods and class attributes. All constant pool references outside instructions are
//! resolved while parsing, so the model holds names rather than indices. Instruction
//! operands keep their indices and are resolved by the renderer.
//!
//! # Key Components
//! - [`ClassFile`] - The complete class model
//! - [`constantpool::ConstantPool`] - Index arena of constants with symbolic resolution
//! - [`member::FieldInfo`] / [`member::MethodInfo`] - Field and method declarations
//! - [`attributes::Attribute`] - Decoded attributes
//! - [`flags`] - Access flag types for every location flags appear in
//! - [`descriptor`] - Field and method descriptor decoding
//!
//! # Examples
//!
//! ```rust,no_run
//! use classscope::ClassFile;
//! use std::path::Path;
//!
//! let class = ClassFile::from_file(Path::new("Main.class"))?;
//! println!("{} extends {:?}", class.this_class, class.super_class);
//! for method in &class.methods {
//!     println!("  {}{}", method.name, method.descriptor);
//! }
//! # Ok::<(), classscope::Error>(())
//! ```

pub mod attributes;
pub mod constantpool;
pub mod descriptor;
pub mod flags;
pub mod member;

use std::path::Path;

use crate::{
    file::{parser::Parser, File},
    Error, Result,
};
use attributes::{parse_attributes, Attribute};
use constantpool::ConstantPool;
use flags::ClassAccessFlags;
use member::{FieldInfo, MethodInfo};

/// The magic number every class file starts with.
pub const MAGIC: u32 = 0xCAFE_BABE;

/// `minor_version` marking a class compiled with preview features.
pub const PREVIEW_MINOR_VERSION: u16 = 0xFFFF;

/// A parsed class file.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    /// Minor version
    pub minor_version: u16,
    /// Major version (52 = Java 8, 61 = Java 17, ...)
    pub major_version: u16,
    /// The constant pool, with the bootstrap methods of the class attached
    pub constant_pool: ConstantPool,
    /// Class access flags
    pub access_flags: ClassAccessFlags,
    /// Name of this class in internal form
    pub this_class: String,
    /// Name of the superclass; absent for `java/lang/Object` and `module-info`
    pub super_class: Option<String>,
    /// Directly implemented interfaces in declaration order
    pub interfaces: Vec<String>,
    /// Fields in declaration order
    pub fields: Vec<FieldInfo>,
    /// Methods in declaration order
    pub methods: Vec<MethodInfo>,
    /// Class attributes in declaration order
    pub attributes: Vec<Attribute>,
}

impl ClassFile {
    /// Parse a class file from memory.
    ///
    /// # Errors
    /// - [`Error::NotAClassFile`] if the input does not start with `0xCAFEBABE`
    /// - [`Error::TruncatedInput`] if the input ends inside a structure
    /// - [`Error::InvalidConstantPoolIndex`], [`Error::MalformedAttribute`],
    ///   [`Error::MalformedCode`] or [`Error::Malformed`] for inconsistent content
    /// - [`Error::TrailingBytes`] if bytes follow the class attributes
    pub fn parse(data: &[u8]) -> Result<ClassFile> {
        if data.len() < 4 {
            let mut magic = [0_u8; 4];
            magic[..data.len()].copy_from_slice(data);
            return Err(Error::NotAClassFile(u32::from_be_bytes(magic)));
        }

        let mut parser = Parser::new(data);
        let magic = parser.read_u4()?;
        if magic != MAGIC {
            return Err(Error::NotAClassFile(magic));
        }

        let minor_version = parser.read_u2()?;
        let major_version = parser.read_u2()?;
        let mut constant_pool = ConstantPool::parse(&mut parser)?;

        let access_flags = ClassAccessFlags::from_bits_retain(parser.read_u2()?);
        let this_class = constant_pool.class_name(parser.read_u2()?)?.to_string();
        let super_class = constant_pool
            .optional_class_name(parser.read_u2()?)?
            .map(ToString::to_string);

        let count = parser.read_u2()?;
        let mut interfaces = Vec::with_capacity(count as usize);
        for _ in 0..count {
            interfaces.push(constant_pool.class_name(parser.read_u2()?)?.to_string());
        }

        let count = parser.read_u2()?;
        let mut fields = Vec::with_capacity(count as usize);
        for _ in 0..count {
            fields.push(FieldInfo::parse(&mut parser, &constant_pool)?);
        }

        let count = parser.read_u2()?;
        let mut methods = Vec::with_capacity(count as usize);
        for _ in 0..count {
            methods.push(MethodInfo::parse(&mut parser, &constant_pool)?);
        }

        let attributes = parse_attributes(&mut parser, &constant_pool)?;
        if parser.has_more_data() {
            return Err(Error::TrailingBytes(parser.remaining()));
        }

        if let Some(bootstrap_methods) = attributes.iter().find_map(|attribute| match attribute {
            Attribute::BootstrapMethods(methods) => Some(methods),
            _ => None,
        }) {
            constant_pool.set_bootstrap_methods(bootstrap_methods.clone());
        }

        Ok(ClassFile {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    /// Memory-map and parse a class file from disk.
    ///
    /// # Errors
    /// Returns [`Error::FileError`] if the file can not be read, otherwise the errors of
    /// [`ClassFile::parse`].
    pub fn from_file(path: &Path) -> Result<ClassFile> {
        let file = File::from_file(path)?;
        Self::parse(file.data())
    }

    /// Parse a class file from an owned buffer.
    ///
    /// # Errors
    /// See [`ClassFile::parse`].
    pub fn from_mem(data: Vec<u8>) -> Result<ClassFile> {
        let file = File::from_mem(data);
        Self::parse(file.data())
    }

    /// Find a class attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name() == name)
    }

    /// Returns `true` if the class was compiled with preview features enabled.
    #[must_use]
    pub fn is_preview(&self) -> bool {
        self.minor_version == PREVIEW_MINOR_VERSION
    }

    /// The Java release that introduced the major version, e.g. `Java 17` for 61.
    #[must_use]
    pub fn java_version(&self) -> String {
        match self.major_version {
            0..=44 => "unknown".to_string(),
            45 => "Java 1.1".to_string(),
            46..=48 => format!("Java 1.{}", self.major_version - 44),
            major => format!("Java {}", major - 44),
        }
    }

    /// Returns `true` for `module-info` classes.
    #[must_use]
    pub fn is_module(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::MODULE)
    }

    /// Returns `true` for records, which carry a `Record` attribute.
    #[must_use]
    pub fn is_record(&self) -> bool {
        self.attributes
            .iter()
            .any(|attribute| matches!(attribute, Attribute::Record(_)))
    }

    /// Returns `true` for sealed classes and interfaces, which carry `PermittedSubclasses`.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.attributes
            .iter()
            .any(|attribute| matches!(attribute, Attribute::PermittedSubclasses(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_not_a_class_file() {
        assert!(matches!(ClassFile::parse(&[]), Err(Error::NotAClassFile(0))));
        assert!(matches!(
            ClassFile::parse(&[0xCA, 0xFE]),
            Err(Error::NotAClassFile(0xCAFE_0000))
        ));
    }

    #[test]
    fn wrong_magic() {
        assert!(matches!(
            ClassFile::parse(&[0x50, 0x4B, 0x03, 0x04, 0, 0]),
            Err(Error::NotAClassFile(0x504B_0304))
        ));
    }

    #[test]
    fn header_only_is_truncated() {
        assert!(matches!(
            ClassFile::parse(&[0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 61]),
            Err(Error::TruncatedInput)
        ));
    }
}
