//! Annotations, element values and type annotations (JVMS §4.7.16 - §4.7.22).
//!
//! Element values can contain nested annotations and arrays, so decoding is recursive. The
//! depth is capped at [`MAX_ANNOTATION_DEPTH`]; deeper input is reported as
//! [`crate::Error::RecursionLimit`] instead of exhausting the stack. All constant pool
//! references are resolved while decoding, so the decoded values are plain data.

use std::fmt;

use crate::{
    classfile::{
        constantpool::{quote, ConstantPool},
        descriptor::FieldType,
    },
    file::parser::Parser,
    Error, Result,
};

/// Maximum nesting depth of annotation element values.
pub const MAX_ANNOTATION_DEPTH: usize = 64;

/// A single annotation: its type and the explicitly given element values.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Annotation type as a Java name, e.g. `java.lang.Deprecated`
    pub type_name: String,
    /// `(element name, value)` pairs in declaration order
    pub elements: Vec<(String, ElementValue)>,
}

/// The value of an annotation element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    /// `B`
    Byte(i8),
    /// `C`
    Char(char),
    /// `D`
    Double(f64),
    /// `F`
    Float(f32),
    /// `I`
    Int(i32),
    /// `J`
    Long(i64),
    /// `S`
    Short(i16),
    /// `Z`
    Boolean(bool),
    /// `s`
    String(String),
    /// `e`, enum type as a Java name plus the constant
    Enum {
        /// Enum type
        type_name: String,
        /// Constant name
        const_name: String,
    },
    /// `c`, a class literal as a Java type name (`void` allowed)
    Class(String),
    /// `@`
    Annotation(Box<Annotation>),
    /// `[`
    Array(Vec<ElementValue>),
}

/// Where in a declaration or expression a type annotation applies (JVMS §4.7.20.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetInfo {
    /// Type parameter of a generic class or method
    TypeParameter(u8),
    /// Superclass (`65535`) or the index of an implemented interface
    Supertype(u16),
    /// Bound of a type parameter
    TypeParameterBound {
        /// Which type parameter
        type_parameter: u8,
        /// Which of its bounds
        bound: u8,
    },
    /// Field type, return type or receiver type
    Empty,
    /// Formal parameter type
    FormalParameter(u8),
    /// Type in the `throws` clause
    Throws(u16),
    /// Local variable or resource variable, with its live ranges
    LocalVariable(Vec<LocalVariableTarget>),
    /// Exception parameter, indexing the exception table
    Catch(u16),
    /// `instanceof`, `new` or method reference expression at a bytecode offset
    Offset(u16),
    /// Type argument of a cast, constructor or method invocation
    TypeArgument {
        /// Bytecode offset
        offset: u16,
        /// Which type argument
        index: u8,
    },
}

/// One live range of an annotated local variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalVariableTarget {
    /// First bytecode offset of the range
    pub start_pc: u16,
    /// Length of the range
    pub length: u16,
    /// Local variable slot
    pub index: u16,
}

/// One step into a nested type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypePathEntry {
    /// 0 array, 1 nested, 2 wildcard bound, 3 type argument
    pub kind: u8,
    /// Type argument index for kind 3, otherwise 0
    pub argument_index: u8,
}

/// An annotation on a use of a type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    /// Raw `target_type`
    pub target_type: u8,
    /// Decoded `target_info`
    pub target: TargetInfo,
    /// Path to the annotated part of the type
    pub path: Vec<TypePathEntry>,
    /// The annotation itself
    pub annotation: Annotation,
}

/// Decode a `u2` count followed by that many annotations.
///
/// # Errors
/// Returns an error if the data is truncated or references invalid constants.
pub fn parse_annotations(parser: &mut Parser, pool: &ConstantPool) -> Result<Vec<Annotation>> {
    let count = parser.read_u2()?;
    let mut annotations = Vec::with_capacity(count as usize);
    for _ in 0..count {
        annotations.push(parse_annotation(parser, pool, 0)?);
    }
    Ok(annotations)
}

/// Decode a `u1` parameter count followed by an annotation list per parameter.
///
/// # Errors
/// Returns an error if the data is truncated or references invalid constants.
pub fn parse_parameter_annotations(
    parser: &mut Parser,
    pool: &ConstantPool,
) -> Result<Vec<Vec<Annotation>>> {
    let count = parser.read_u1()?;
    let mut parameters = Vec::with_capacity(count as usize);
    for _ in 0..count {
        parameters.push(parse_annotations(parser, pool)?);
    }
    Ok(parameters)
}

/// Decode a `u2` count followed by that many type annotations.
///
/// # Errors
/// Returns an error if the data is truncated, uses an unknown target type or references
/// invalid constants.
pub fn parse_type_annotations(
    parser: &mut Parser,
    pool: &ConstantPool,
) -> Result<Vec<TypeAnnotation>> {
    let count = parser.read_u2()?;
    let mut annotations = Vec::with_capacity(count as usize);
    for _ in 0..count {
        annotations.push(parse_type_annotation(parser, pool)?);
    }
    Ok(annotations)
}

/// Decode one element value, as found in `AnnotationDefault`.
///
/// # Errors
/// Returns an error if the data is truncated or references invalid constants.
pub fn parse_element_value(parser: &mut Parser, pool: &ConstantPool) -> Result<ElementValue> {
    parse_element_value_at(parser, pool, 0)
}

fn parse_annotation(parser: &mut Parser, pool: &ConstantPool, depth: usize) -> Result<Annotation> {
    if depth > MAX_ANNOTATION_DEPTH {
        return Err(Error::RecursionLimit(MAX_ANNOTATION_DEPTH));
    }

    let type_name = type_name(pool.utf8(parser.read_u2()?)?)?;
    let count = parser.read_u2()?;
    let mut elements = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name = pool.utf8(parser.read_u2()?)?.to_string();
        let value = parse_element_value_at(parser, pool, depth + 1)?;
        elements.push((name, value));
    }

    Ok(Annotation {
        type_name,
        elements,
    })
}

fn parse_element_value_at(
    parser: &mut Parser,
    pool: &ConstantPool,
    depth: usize,
) -> Result<ElementValue> {
    if depth > MAX_ANNOTATION_DEPTH {
        return Err(Error::RecursionLimit(MAX_ANNOTATION_DEPTH));
    }

    let tag = parser.read_u1()?;
    let value = match tag {
        // Narrow integral values are stored as CONSTANT_Integer and truncated, like the JVM does
        b'B' => ElementValue::Byte(pool.integer(parser.read_u2()?)? as i8),
        b'C' => {
            let value = pool.integer(parser.read_u2()?)?;
            ElementValue::Char(
                u32::try_from(value)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER),
            )
        }
        b'D' => ElementValue::Double(pool.double(parser.read_u2()?)?),
        b'F' => ElementValue::Float(pool.float(parser.read_u2()?)?),
        b'I' => ElementValue::Int(pool.integer(parser.read_u2()?)?),
        b'J' => ElementValue::Long(pool.long(parser.read_u2()?)?),
        b'S' => ElementValue::Short(pool.integer(parser.read_u2()?)? as i16),
        b'Z' => ElementValue::Boolean(pool.integer(parser.read_u2()?)? != 0),
        b's' => ElementValue::String(pool.utf8(parser.read_u2()?)?.to_string()),
        b'e' => {
            let type_name = type_name(pool.utf8(parser.read_u2()?)?)?;
            let const_name = pool.utf8(parser.read_u2()?)?.to_string();
            ElementValue::Enum {
                type_name,
                const_name,
            }
        }
        b'c' => {
            let descriptor = pool.utf8(parser.read_u2()?)?;
            if descriptor == "V" {
                ElementValue::Class("void".to_string())
            } else {
                ElementValue::Class(FieldType::parse(descriptor)?.to_string())
            }
        }
        b'@' => ElementValue::Annotation(Box::new(parse_annotation(parser, pool, depth + 1)?)),
        b'[' => {
            let count = parser.read_u2()?;
            let mut values = Vec::with_capacity(count as usize);
            for _ in 0..count {
                values.push(parse_element_value_at(parser, pool, depth + 1)?);
            }
            ElementValue::Array(values)
        }
        _ => {
            return Err(malformed_error!(
                "Unknown element value tag {:#04x}",
                tag
            ))
        }
    };

    Ok(value)
}

fn parse_type_annotation(parser: &mut Parser, pool: &ConstantPool) -> Result<TypeAnnotation> {
    let target_type = parser.read_u1()?;
    let target = match target_type {
        0x00 | 0x01 => TargetInfo::TypeParameter(parser.read_u1()?),
        0x10 => TargetInfo::Supertype(parser.read_u2()?),
        0x11 | 0x12 => TargetInfo::TypeParameterBound {
            type_parameter: parser.read_u1()?,
            bound: parser.read_u1()?,
        },
        0x13..=0x15 => TargetInfo::Empty,
        0x16 => TargetInfo::FormalParameter(parser.read_u1()?),
        0x17 => TargetInfo::Throws(parser.read_u2()?),
        0x40 | 0x41 => {
            let count = parser.read_u2()?;
            let mut ranges = Vec::with_capacity(count as usize);
            for _ in 0..count {
                ranges.push(LocalVariableTarget {
                    start_pc: parser.read_u2()?,
                    length: parser.read_u2()?,
                    index: parser.read_u2()?,
                });
            }
            TargetInfo::LocalVariable(ranges)
        }
        0x42 => TargetInfo::Catch(parser.read_u2()?),
        0x43..=0x46 => TargetInfo::Offset(parser.read_u2()?),
        0x47..=0x4B => TargetInfo::TypeArgument {
            offset: parser.read_u2()?,
            index: parser.read_u1()?,
        },
        _ => {
            return Err(malformed_error!(
                "Unknown type annotation target {:#04x}",
                target_type
            ))
        }
    };

    let path_length = parser.read_u1()?;
    let mut path = Vec::with_capacity(path_length as usize);
    for _ in 0..path_length {
        path.push(TypePathEntry {
            kind: parser.read_u1()?,
            argument_index: parser.read_u1()?,
        });
    }

    let annotation = parse_annotation(parser, pool, 0)?;

    Ok(TypeAnnotation {
        target_type,
        target,
        path,
        annotation,
    })
}

fn type_name(descriptor: &str) -> Result<String> {
    Ok(FieldType::parse(descriptor)?.to_string())
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.type_name)?;
        if self.elements.is_empty() {
            return Ok(());
        }

        write!(f, "(")?;
        for (position, (name, value)) in self.elements.iter().enumerate() {
            if position > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for ElementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementValue::Byte(value) => write!(f, "(byte) {value}"),
            ElementValue::Char(value) => {
                let quoted = quote(&value.to_string());
                write!(f, "'{}'", &quoted[1..quoted.len() - 1])
            }
            ElementValue::Double(value) => write!(f, "{value:?}d"),
            ElementValue::Float(value) => write!(f, "{value:?}f"),
            ElementValue::Int(value) => write!(f, "{value}"),
            ElementValue::Long(value) => write!(f, "{value}L"),
            ElementValue::Short(value) => write!(f, "(short) {value}"),
            ElementValue::Boolean(value) => write!(f, "{value}"),
            ElementValue::String(value) => write!(f, "{}", quote(value)),
            ElementValue::Enum {
                type_name,
                const_name,
            } => write!(f, "{type_name}.{const_name}"),
            ElementValue::Class(name) => write!(f, "{name}.class"),
            ElementValue::Annotation(annotation) => write!(f, "{annotation}"),
            ElementValue::Array(values) => {
                write!(f, "{{")?;
                for (position, value) in values.iter().enumerate() {
                    if position > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl fmt::Display for TargetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetInfo::TypeParameter(index) => write!(f, "type parameter {index}"),
            TargetInfo::Supertype(index) => write!(f, "supertype {index}"),
            TargetInfo::TypeParameterBound {
                type_parameter,
                bound,
            } => write!(f, "type parameter {type_parameter} bound {bound}"),
            TargetInfo::Empty => write!(f, "empty"),
            TargetInfo::FormalParameter(index) => write!(f, "formal parameter {index}"),
            TargetInfo::Throws(index) => write!(f, "throws {index}"),
            TargetInfo::LocalVariable(ranges) => {
                write!(f, "local variable [")?;
                for (position, range) in ranges.iter().enumerate() {
                    if position > 0 {
                        write!(f, ", ")?;
                    }
                    write!(
                        f,
                        "start={} length={} index={}",
                        range.start_pc, range.length, range.index
                    )?;
                }
                write!(f, "]")
            }
            TargetInfo::Catch(index) => write!(f, "catch {index}"),
            TargetInfo::Offset(offset) => write!(f, "offset {offset}"),
            TargetInfo::TypeArgument { offset, index } => {
                write!(f, "type argument {index} at offset {offset}")
            }
        }
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x} {}", self.target_type, self.target)?;
        if !self.path.is_empty() {
            write!(f, " path [")?;
            for (position, entry) in self.path.iter().enumerate() {
                if position > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}:{}", entry.kind, entry.argument_index)?;
            }
            write!(f, "]")?;
        }
        write!(f, " {}", self.annotation)
    }
}
