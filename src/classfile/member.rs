//! Fields and methods (JVMS §4.5, §4.6).

use crate::{
    classfile::{
        attributes::{code::CodeAttribute, parse_attributes, Attribute},
        constantpool::ConstantPool,
        flags::{FieldAccessFlags, MethodAccessFlags},
    },
    file::parser::Parser,
    Result,
};

/// A field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Declared flags
    pub access_flags: FieldAccessFlags,
    /// Field name
    pub name: String,
    /// Field descriptor, e.g. `Ljava/lang/String;`
    pub descriptor: String,
    /// Field attributes in declaration order
    pub attributes: Vec<Attribute>,
}

/// A method declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    /// Declared flags
    pub access_flags: MethodAccessFlags,
    /// Method name, `<init>` and `<clinit>` for initializers
    pub name: String,
    /// Method descriptor, e.g. `(I)V`
    pub descriptor: String,
    /// Method attributes in declaration order
    pub attributes: Vec<Attribute>,
}

impl FieldInfo {
    pub(crate) fn parse(parser: &mut Parser, pool: &ConstantPool) -> Result<FieldInfo> {
        let access_flags = FieldAccessFlags::from_bits_retain(parser.read_u2()?);
        let name = pool.utf8(parser.read_u2()?)?.to_string();
        let descriptor = pool.utf8(parser.read_u2()?)?.to_string();
        let attributes = parse_attributes(parser, pool)?;

        Ok(FieldInfo {
            access_flags,
            name,
            descriptor,
            attributes,
        })
    }

    /// Find an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        find(&self.attributes, name)
    }

    /// Constant pool index of the `ConstantValue`, if the field has one.
    #[must_use]
    pub fn constant_value(&self) -> Option<u16> {
        self.attributes.iter().find_map(|attribute| match attribute {
            Attribute::ConstantValue(index) => Some(*index),
            _ => None,
        })
    }
}

impl MethodInfo {
    pub(crate) fn parse(parser: &mut Parser, pool: &ConstantPool) -> Result<MethodInfo> {
        let access_flags = MethodAccessFlags::from_bits_retain(parser.read_u2()?);
        let name = pool.utf8(parser.read_u2()?)?.to_string();
        let descriptor = pool.utf8(parser.read_u2()?)?.to_string();
        let attributes = parse_attributes(parser, pool)?;

        Ok(MethodInfo {
            access_flags,
            name,
            descriptor,
            attributes,
        })
    }

    /// Find an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        find(&self.attributes, name)
    }

    /// The method body; `None` for abstract and native methods.
    #[must_use]
    pub fn code(&self) -> Option<&CodeAttribute> {
        self.attributes.iter().find_map(|attribute| match attribute {
            Attribute::Code(code) => Some(code.as_ref()),
            _ => None,
        })
    }

    /// Returns `true` for instance and static initializers.
    #[must_use]
    pub fn is_initializer(&self) -> bool {
        self.name == "<init>" || self.name == "<clinit>"
    }
}

fn find<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attributes.iter().find(|attribute| attribute.name() == name)
}
