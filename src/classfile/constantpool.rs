//! The constant pool (JVMS §4.4).
//!
//! The pool is stored as an arena: a [`Vec`] of [`ConstantPoolEntry`] addressed by the 1-based
//! indices used throughout the class file. Slot 0 and the slot following every `Long` and
//! `Double` entry hold [`ConstantPoolEntry::Unusable`], so the vector index is always the pool
//! index. Entries keep the raw indices they reference; [`ConstantPool::resolve`] follows those
//! indices on demand and produces the symbolic text the listing shows.
//!
//! # Examples
//!
//! ```rust
//! use classscope::{ConstantPool, Parser};
//!
//! // count = 3: #1 Utf8 "Main", #2 Class #1
//! let data = [0x00, 0x03, 0x01, 0x00, 0x04, b'M', b'a', b'i', b'n', 0x07, 0x00, 0x01];
//! let pool = ConstantPool::parse(&mut Parser::new(&data))?;
//!
//! assert_eq!(pool.class_name(2)?, "Main");
//! assert_eq!(pool.resolve(2)?, "Main");
//! assert!(pool.resolve(0).is_err());
//! # Ok::<(), classscope::Error>(())
//! ```

use std::fmt::Write;

use strum::{AsRefStr, FromRepr};

use crate::{
    classfile::attributes::BootstrapMethod, disassembler::ConstantOperand, file::parser::Parser,
    Error, Result,
};

/// Resolution chains deeper than this are rejected with [`Error::RecursionLimit`].
///
/// Only dynamic constants can nest (through their bootstrap arguments); ordinary references
/// are at most three levels deep.
pub const MAX_RESOLVE_DEPTH: usize = 64;

/// Method handle reference kinds (JVMS §5.4.3.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, FromRepr)]
#[repr(u8)]
pub enum ReferenceKind {
    #[strum(serialize = "REF_getField")]
    GetField = 1,
    #[strum(serialize = "REF_getStatic")]
    GetStatic = 2,
    #[strum(serialize = "REF_putField")]
    PutField = 3,
    #[strum(serialize = "REF_putStatic")]
    PutStatic = 4,
    #[strum(serialize = "REF_invokeVirtual")]
    InvokeVirtual = 5,
    #[strum(serialize = "REF_invokeStatic")]
    InvokeStatic = 6,
    #[strum(serialize = "REF_invokeSpecial")]
    InvokeSpecial = 7,
    #[strum(serialize = "REF_newInvokeSpecial")]
    NewInvokeSpecial = 8,
    #[strum(serialize = "REF_invokeInterface")]
    InvokeInterface = 9,
}

impl ReferenceKind {
    /// Kinds 1 to 4 reference a field, the others a method.
    #[must_use]
    pub fn is_field_access(self) -> bool {
        (self as u8) <= 4
    }
}

/// A single constant pool slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantPoolEntry {
    /// Slot 0 and the second slot of a `Long` or `Double`
    Unusable,
    /// `CONSTANT_Utf8`, already decoded from modified UTF-8
    Utf8(String),
    /// `CONSTANT_Integer`
    Integer(i32),
    /// `CONSTANT_Float`
    Float(f32),
    /// `CONSTANT_Long`
    Long(i64),
    /// `CONSTANT_Double`
    Double(f64),
    /// `CONSTANT_Class`
    Class {
        /// Utf8 holding the internal name
        name_index: u16,
    },
    /// `CONSTANT_String`
    String {
        /// Utf8 holding the value
        string_index: u16,
    },
    /// `CONSTANT_Fieldref`
    FieldRef {
        /// Owning class
        class_index: u16,
        /// Name and descriptor
        name_and_type_index: u16,
    },
    /// `CONSTANT_Methodref`
    MethodRef {
        /// Owning class
        class_index: u16,
        /// Name and descriptor
        name_and_type_index: u16,
    },
    /// `CONSTANT_InterfaceMethodref`
    InterfaceMethodRef {
        /// Owning interface
        class_index: u16,
        /// Name and descriptor
        name_and_type_index: u16,
    },
    /// `CONSTANT_NameAndType`
    NameAndType {
        /// Utf8 member name
        name_index: u16,
        /// Utf8 descriptor
        descriptor_index: u16,
    },
    /// `CONSTANT_MethodHandle`
    MethodHandle {
        /// How the handle accesses its target
        reference_kind: ReferenceKind,
        /// Field or method reference
        reference_index: u16,
    },
    /// `CONSTANT_MethodType`
    MethodType {
        /// Utf8 method descriptor
        descriptor_index: u16,
    },
    /// `CONSTANT_Dynamic`
    Dynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method_attr_index: u16,
        /// Name and field descriptor
        name_and_type_index: u16,
    },
    /// `CONSTANT_InvokeDynamic`
    InvokeDynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method_attr_index: u16,
        /// Name and method descriptor
        name_and_type_index: u16,
    },
    /// `CONSTANT_Module`
    Module {
        /// Utf8 module name
        name_index: u16,
    },
    /// `CONSTANT_Package`
    Package {
        /// Utf8 package name in internal form
        name_index: u16,
    },
}

impl ConstantPoolEntry {
    /// Name of the entry kind as used in the constant pool listing.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ConstantPoolEntry::Unusable => "Unusable",
            ConstantPoolEntry::Utf8(_) => "Utf8",
            ConstantPoolEntry::Integer(_) => "Integer",
            ConstantPoolEntry::Float(_) => "Float",
            ConstantPoolEntry::Long(_) => "Long",
            ConstantPoolEntry::Double(_) => "Double",
            ConstantPoolEntry::Class { .. } => "Class",
            ConstantPoolEntry::String { .. } => "String",
            ConstantPoolEntry::FieldRef { .. } => "Fieldref",
            ConstantPoolEntry::MethodRef { .. } => "Methodref",
            ConstantPoolEntry::InterfaceMethodRef { .. } => "InterfaceMethodref",
            ConstantPoolEntry::NameAndType { .. } => "NameAndType",
            ConstantPoolEntry::MethodHandle { .. } => "MethodHandle",
            ConstantPoolEntry::MethodType { .. } => "MethodType",
            ConstantPoolEntry::Dynamic { .. } => "Dynamic",
            ConstantPoolEntry::InvokeDynamic { .. } => "InvokeDynamic",
            ConstantPoolEntry::Module { .. } => "Module",
            ConstantPoolEntry::Package { .. } => "Package",
        }
    }

    /// The raw references of the entry, e.g. `#4.#9` for a method reference.
    ///
    /// Literal entries return an empty string.
    #[must_use]
    pub fn references(&self) -> String {
        match self {
            ConstantPoolEntry::Unusable
            | ConstantPoolEntry::Utf8(_)
            | ConstantPoolEntry::Integer(_)
            | ConstantPoolEntry::Float(_)
            | ConstantPoolEntry::Long(_)
            | ConstantPoolEntry::Double(_) => String::new(),
            ConstantPoolEntry::Class { name_index: index }
            | ConstantPoolEntry::String {
                string_index: index,
            }
            | ConstantPoolEntry::MethodType {
                descriptor_index: index,
            }
            | ConstantPoolEntry::Module { name_index: index }
            | ConstantPoolEntry::Package { name_index: index } => format!("#{index}"),
            ConstantPoolEntry::FieldRef {
                class_index,
                name_and_type_index,
            }
            | ConstantPoolEntry::MethodRef {
                class_index,
                name_and_type_index,
            }
            | ConstantPoolEntry::InterfaceMethodRef {
                class_index,
                name_and_type_index,
            } => format!("#{class_index}.#{name_and_type_index}"),
            ConstantPoolEntry::NameAndType {
                name_index,
                descriptor_index,
            } => format!("#{name_index}:#{descriptor_index}"),
            ConstantPoolEntry::MethodHandle {
                reference_kind,
                reference_index,
            } => format!("{}:#{reference_index}", *reference_kind as u8),
            ConstantPoolEntry::Dynamic {
                bootstrap_method_attr_index,
                name_and_type_index,
            }
            | ConstantPoolEntry::InvokeDynamic {
                bootstrap_method_attr_index,
                name_and_type_index,
            } => format!("#{bootstrap_method_attr_index}:#{name_and_type_index}"),
        }
    }
}

/// The decoded constant pool of one class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantPool {
    entries: Vec<ConstantPoolEntry>,
    bootstrap_methods: Vec<BootstrapMethod>,
}

impl ConstantPool {
    /// Read `constant_pool_count` followed by the pool entries.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedInput`] if the pool runs past the input and
    /// [`Error::Malformed`] for an unknown tag or method handle kind.
    pub fn parse(parser: &mut Parser) -> Result<ConstantPool> {
        let count = parser.read_u2()? as usize;
        if count == 0 {
            return Err(malformed_error!("constant_pool_count must be at least 1"));
        }

        let mut entries = Vec::with_capacity(count);
        entries.push(ConstantPoolEntry::Unusable);

        while entries.len() < count {
            let index = entries.len();
            let tag = parser.read_u1()?;
            let entry = match tag {
                1 => {
                    let length = parser.read_u2()? as usize;
                    ConstantPoolEntry::Utf8(parser.read_utf8(length)?)
                }
                3 => ConstantPoolEntry::Integer(parser.read_i4()?),
                4 => ConstantPoolEntry::Float(parser.read_be::<f32>()?),
                5 => ConstantPoolEntry::Long(parser.read_i8()?),
                6 => ConstantPoolEntry::Double(parser.read_be::<f64>()?),
                7 => ConstantPoolEntry::Class {
                    name_index: parser.read_u2()?,
                },
                8 => ConstantPoolEntry::String {
                    string_index: parser.read_u2()?,
                },
                9 => ConstantPoolEntry::FieldRef {
                    class_index: parser.read_u2()?,
                    name_and_type_index: parser.read_u2()?,
                },
                10 => ConstantPoolEntry::MethodRef {
                    class_index: parser.read_u2()?,
                    name_and_type_index: parser.read_u2()?,
                },
                11 => ConstantPoolEntry::InterfaceMethodRef {
                    class_index: parser.read_u2()?,
                    name_and_type_index: parser.read_u2()?,
                },
                12 => ConstantPoolEntry::NameAndType {
                    name_index: parser.read_u2()?,
                    descriptor_index: parser.read_u2()?,
                },
                15 => {
                    let kind = parser.read_u1()?;
                    let Some(reference_kind) = ReferenceKind::from_repr(kind) else {
                        return Err(malformed_error!(
                            "Invalid method handle kind {} at constant pool index {}",
                            kind,
                            index
                        ));
                    };
                    ConstantPoolEntry::MethodHandle {
                        reference_kind,
                        reference_index: parser.read_u2()?,
                    }
                }
                16 => ConstantPoolEntry::MethodType {
                    descriptor_index: parser.read_u2()?,
                },
                17 => ConstantPoolEntry::Dynamic {
                    bootstrap_method_attr_index: parser.read_u2()?,
                    name_and_type_index: parser.read_u2()?,
                },
                18 => ConstantPoolEntry::InvokeDynamic {
                    bootstrap_method_attr_index: parser.read_u2()?,
                    name_and_type_index: parser.read_u2()?,
                },
                19 => ConstantPoolEntry::Module {
                    name_index: parser.read_u2()?,
                },
                20 => ConstantPoolEntry::Package {
                    name_index: parser.read_u2()?,
                },
                _ => {
                    return Err(malformed_error!(
                        "Unknown constant pool tag {} at index {}",
                        tag,
                        index
                    ))
                }
            };

            let wide = matches!(
                entry,
                ConstantPoolEntry::Long(_) | ConstantPoolEntry::Double(_)
            );
            entries.push(entry);
            if wide {
                if entries.len() == count {
                    return Err(malformed_error!(
                        "8-byte constant at index {} occupies the last pool slot",
                        index
                    ));
                }
                entries.push(ConstantPoolEntry::Unusable);
            }
        }

        Ok(ConstantPool {
            entries,
            bootstrap_methods: Vec::new(),
        })
    }

    /// Make the class's `BootstrapMethods` available to dynamic constant resolution.
    pub fn set_bootstrap_methods(&mut self, bootstrap_methods: Vec<BootstrapMethod>) {
        self.bootstrap_methods = bootstrap_methods;
    }

    /// The bootstrap method table attached with [`ConstantPool::set_bootstrap_methods`].
    #[must_use]
    pub fn bootstrap_methods(&self) -> &[BootstrapMethod] {
        &self.bootstrap_methods
    }

    /// The declared `constant_pool_count`, one more than the highest valid index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the pool has no usable entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Iterate usable entries with their pool index, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &ConstantPoolEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !matches!(entry, ConstantPoolEntry::Unusable))
            .filter_map(|(index, entry)| u16::try_from(index).ok().map(|index| (index, entry)))
    }

    /// Look up the entry at `index`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstantPoolIndex`] for index 0, indices past the pool and the
    /// unusable slot after a `Long` or `Double`.
    pub fn get(&self, index: u16) -> Result<&ConstantPoolEntry> {
        if index == 0 {
            return Err(cp_index_error!(index, "index 0 is not a valid entry"));
        }
        match self.entries.get(index as usize) {
            Some(ConstantPoolEntry::Unusable) => Err(cp_index_error!(
                index,
                "slot is the second half of an 8-byte constant"
            )),
            Some(entry) => Ok(entry),
            None => Err(cp_index_error!(
                index,
                "past the end of a pool with {} slots",
                self.entries.len()
            )),
        }
    }

    /// Look up the entry an instruction operand references, checking that its kind fits the
    /// instruction.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstantPoolIndex`] if `index` is invalid or the entry is of a
    /// kind `operand` does not accept.
    pub fn operand(&self, index: u16, operand: ConstantOperand) -> Result<&ConstantPoolEntry> {
        let entry = self.get(index)?;
        if operand.accepts(entry) {
            Ok(entry)
        } else {
            Err(wrong_kind(index, operand.expected(), entry))
        }
    }

    /// The text of a `CONSTANT_Utf8` entry.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstantPoolIndex`] if `index` is invalid or not a Utf8 entry.
    pub fn utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            ConstantPoolEntry::Utf8(value) => Ok(value.as_str()),
            other => Err(wrong_kind(index, "Utf8", other)),
        }
    }

    /// Like [`ConstantPool::utf8`], but index 0 yields `None`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstantPoolIndex`] for a non-zero invalid index.
    pub fn optional_utf8(&self, index: u16) -> Result<Option<&str>> {
        if index == 0 {
            return Ok(None);
        }
        self.utf8(index).map(Some)
    }

    /// The internal name of a `CONSTANT_Class` entry.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstantPoolIndex`] if `index` is not a Class entry.
    pub fn class_name(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            ConstantPoolEntry::Class { name_index } => self.utf8(*name_index),
            other => Err(wrong_kind(index, "Class", other)),
        }
    }

    /// Like [`ConstantPool::class_name`], but index 0 yields `None`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstantPoolIndex`] for a non-zero invalid index.
    pub fn optional_class_name(&self, index: u16) -> Result<Option<&str>> {
        if index == 0 {
            return Ok(None);
        }
        self.class_name(index).map(Some)
    }

    /// Name and descriptor of a `CONSTANT_NameAndType` entry.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstantPoolIndex`] if `index` is not a NameAndType entry.
    pub fn name_and_type(&self, index: u16) -> Result<(&str, &str)> {
        match self.get(index)? {
            ConstantPoolEntry::NameAndType {
                name_index,
                descriptor_index,
            } => Ok((self.utf8(*name_index)?, self.utf8(*descriptor_index)?)),
            other => Err(wrong_kind(index, "NameAndType", other)),
        }
    }

    /// Owner, name and descriptor of a field, method or interface method reference.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstantPoolIndex`] if `index` is not a member reference.
    pub fn member_ref(&self, index: u16) -> Result<(&str, &str, &str)> {
        match self.get(index)? {
            ConstantPoolEntry::FieldRef {
                class_index,
                name_and_type_index,
            }
            | ConstantPoolEntry::MethodRef {
                class_index,
                name_and_type_index,
            }
            | ConstantPoolEntry::InterfaceMethodRef {
                class_index,
                name_and_type_index,
            } => {
                let owner = self.class_name(*class_index)?;
                let (name, descriptor) = self.name_and_type(*name_and_type_index)?;
                Ok((owner, name, descriptor))
            }
            other => Err(wrong_kind(index, "Fieldref or Methodref", other)),
        }
    }

    /// Value of a `CONSTANT_Integer` entry.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstantPoolIndex`] if `index` is not an Integer entry.
    pub fn integer(&self, index: u16) -> Result<i32> {
        match self.get(index)? {
            ConstantPoolEntry::Integer(value) => Ok(*value),
            other => Err(wrong_kind(index, "Integer", other)),
        }
    }

    /// Value of a `CONSTANT_Float` entry.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstantPoolIndex`] if `index` is not a Float entry.
    pub fn float(&self, index: u16) -> Result<f32> {
        match self.get(index)? {
            ConstantPoolEntry::Float(value) => Ok(*value),
            other => Err(wrong_kind(index, "Float", other)),
        }
    }

    /// Value of a `CONSTANT_Long` entry.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstantPoolIndex`] if `index` is not a Long entry.
    pub fn long(&self, index: u16) -> Result<i64> {
        match self.get(index)? {
            ConstantPoolEntry::Long(value) => Ok(*value),
            other => Err(wrong_kind(index, "Long", other)),
        }
    }

    /// Value of a `CONSTANT_Double` entry.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstantPoolIndex`] if `index` is not a Double entry.
    pub fn double(&self, index: u16) -> Result<f64> {
        match self.get(index)? {
            ConstantPoolEntry::Double(value) => Ok(*value),
            other => Err(wrong_kind(index, "Double", other)),
        }
    }

    /// Name of a `CONSTANT_Module` entry.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstantPoolIndex`] if `index` is not a Module entry.
    pub fn module_name(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            ConstantPoolEntry::Module { name_index } => self.utf8(*name_index),
            other => Err(wrong_kind(index, "Module", other)),
        }
    }

    /// Name of a `CONSTANT_Package` entry.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstantPoolIndex`] if `index` is not a Package entry.
    pub fn package_name(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            ConstantPoolEntry::Package { name_index } => self.utf8(*name_index),
            other => Err(wrong_kind(index, "Package", other)),
        }
    }

    /// Produce the symbolic text of the entry at `index`.
    ///
    /// References are followed to their Utf8 leaves. Dynamic constants and call sites are
    /// expanded through the bootstrap method table, with every static argument resolved in
    /// turn.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstantPoolIndex`] for invalid, wrong-kind or cyclic references
    /// and [`Error::RecursionLimit`] for chains deeper than [`MAX_RESOLVE_DEPTH`].
    pub fn resolve(&self, index: u16) -> Result<String> {
        let mut visiting = Vec::new();
        self.resolve_inner(index, &mut visiting)
    }

    fn resolve_inner(&self, index: u16, visiting: &mut Vec<u16>) -> Result<String> {
        if visiting.contains(&index) {
            return Err(cp_index_error!(index, "cyclic constant reference"));
        }
        if visiting.len() >= MAX_RESOLVE_DEPTH {
            return Err(Error::RecursionLimit(MAX_RESOLVE_DEPTH));
        }

        visiting.push(index);
        let resolved = self.resolve_entry(index, visiting);
        visiting.pop();
        resolved
    }

    fn resolve_entry(&self, index: u16, visiting: &mut Vec<u16>) -> Result<String> {
        let text = match self.get(index)? {
            ConstantPoolEntry::Unusable => {
                return Err(cp_index_error!(index, "unusable slot"));
            }
            ConstantPoolEntry::Utf8(value) => value.clone(),
            ConstantPoolEntry::Integer(value) => value.to_string(),
            ConstantPoolEntry::Float(value) => {
                format_float(f64::from(*value), &format!("{value:?}"), 'f')
            }
            ConstantPoolEntry::Long(value) => format!("{value}L"),
            ConstantPoolEntry::Double(value) => format_float(*value, &format!("{value:?}"), 'd'),
            ConstantPoolEntry::Class { .. } => self.class_name(index)?.to_string(),
            ConstantPoolEntry::String { string_index } => quote(self.utf8(*string_index)?),
            ConstantPoolEntry::FieldRef { .. }
            | ConstantPoolEntry::MethodRef { .. }
            | ConstantPoolEntry::InterfaceMethodRef { .. } => {
                let (owner, name, descriptor) = self.member_ref(index)?;
                format!("{owner}.{name}:{descriptor}")
            }
            ConstantPoolEntry::NameAndType { .. } => {
                let (name, descriptor) = self.name_and_type(index)?;
                format!("{name}:{descriptor}")
            }
            ConstantPoolEntry::MethodHandle {
                reference_kind,
                reference_index,
            } => self.method_handle(*reference_kind, *reference_index)?,
            ConstantPoolEntry::MethodType { descriptor_index } => {
                self.utf8(*descriptor_index)?.to_string()
            }
            ConstantPoolEntry::Dynamic {
                bootstrap_method_attr_index,
                name_and_type_index,
            }
            | ConstantPoolEntry::InvokeDynamic {
                bootstrap_method_attr_index,
                name_and_type_index,
            } => self.dynamic(
                index,
                *bootstrap_method_attr_index,
                *name_and_type_index,
                visiting,
            )?,
            ConstantPoolEntry::Module { name_index }
            | ConstantPoolEntry::Package { name_index } => self.utf8(*name_index)?.to_string(),
        };

        Ok(text)
    }

    fn method_handle(&self, kind: ReferenceKind, reference_index: u16) -> Result<String> {
        let target = self.get(reference_index)?;
        let matches_kind = if kind.is_field_access() {
            matches!(target, ConstantPoolEntry::FieldRef { .. })
        } else {
            matches!(
                target,
                ConstantPoolEntry::MethodRef { .. } | ConstantPoolEntry::InterfaceMethodRef { .. }
            )
        };
        if !matches_kind {
            return Err(wrong_kind(reference_index, kind.as_ref(), target));
        }

        let (owner, name, descriptor) = self.member_ref(reference_index)?;
        Ok(format!("{} {owner}.{name}:{descriptor}", kind.as_ref()))
    }

    fn dynamic(
        &self,
        index: u16,
        bootstrap_index: u16,
        name_and_type_index: u16,
        visiting: &mut Vec<u16>,
    ) -> Result<String> {
        let (name, descriptor) = self.name_and_type(name_and_type_index)?;
        let Some(bootstrap) = self.bootstrap_methods.get(bootstrap_index as usize) else {
            return Err(cp_index_error!(
                index,
                "bootstrap method #{} is outside a table of {} entries",
                bootstrap_index,
                self.bootstrap_methods.len()
            ));
        };

        let handle = match self.get(bootstrap.method_ref)? {
            ConstantPoolEntry::MethodHandle {
                reference_kind,
                reference_index,
            } => self.method_handle(*reference_kind, *reference_index)?,
            other => return Err(wrong_kind(bootstrap.method_ref, "MethodHandle", other)),
        };

        let mut text =
            format!("{name}:{descriptor} bootstrap #{bootstrap_index} {handle} arguments [");
        for (position, argument) in bootstrap.arguments.iter().enumerate() {
            if position > 0 {
                text.push_str(", ");
            }
            text.push_str(&self.resolve_inner(*argument, visiting)?);
        }
        text.push(']');

        Ok(text)
    }
}

fn wrong_kind(index: u16, expected: &str, found: &ConstantPoolEntry) -> Error {
    cp_index_error!(index, "expected {}, found {}", expected, found.kind())
}

fn format_float(value: f64, debug: &str, suffix: char) -> String {
    if value.is_nan() {
        format!("NaN{suffix}")
    } else if value.is_infinite() {
        if value > 0.0 {
            format!("Infinity{suffix}")
        } else {
            format!("-Infinity{suffix}")
        }
    } else {
        format!("{debug}{suffix}")
    }
}

/// Quote `value` as a Java string literal.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\u{8}' => quoted.push_str("\\b"),
            '\u{c}' => quoted.push_str("\\f"),
            c if c.is_control() => {
                let _ = write!(quoted, "\\u{:04x}", c as u32);
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
