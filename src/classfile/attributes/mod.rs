//! Attribute decoding (JVMS §4.7).
//!
//! Every attribute is a name, a `u4` length and that many bytes. The bytes are handed to the
//! decoder for the name as a separate [`Parser`], so a decoder can never read into the next
//! attribute. A decoder that needs more bytes than declared, or leaves some unread, produces
//! [`crate::Error::MalformedAttribute`]. Names without a decoder become
//! [`Attribute::Opaque`] and keep their raw bytes.
//!
//! # Key Types
//! - [`Attribute`] - Closed set of decoded attributes plus the opaque fallback
//! - [`AttributeKind`] - The recognised attribute names
//! - [`code::CodeAttribute`] - Bytecode, exception table and nested attributes of a method
//! - [`annotations::Annotation`] - Decoded annotations and element values
//! - [`module::ModuleAttribute`] - Module declarations from `module-info.class`
//! - [`stackmap::StackMapFrame`] - Verifier frames from `StackMapTable`

pub mod annotations;
pub mod code;
pub mod module;
pub mod stackmap;

use std::str::FromStr;

use strum::{AsRefStr, EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::{
    classfile::{
        constantpool::{ConstantPool, ConstantPoolEntry},
        flags::{InnerClassAccessFlags, ParameterAccessFlags},
    },
    file::parser::{decode_modified_utf8, Parser},
    Error, Result,
};
use annotations::{
    parse_annotations, parse_element_value, parse_parameter_annotations, parse_type_annotations,
    Annotation, ElementValue, TypeAnnotation,
};
use code::CodeAttribute;
use module::ModuleAttribute;
use stackmap::StackMapFrame;

/// Attribute lists nested deeper than this (a `Code` inside a record component inside ...)
/// are rejected with [`Error::RecursionLimit`].
pub const MAX_ATTRIBUTE_DEPTH: usize = 16;

/// Names of the attributes this crate decodes.
///
/// The variant names are the attribute names as they appear in the constant pool.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, AsRefStr, IntoStaticStr, EnumString, EnumIter, EnumCount,
)]
pub enum AttributeKind {
    ConstantValue,
    Code,
    StackMapTable,
    Exceptions,
    InnerClasses,
    EnclosingMethod,
    Synthetic,
    Signature,
    SourceFile,
    SourceDebugExtension,
    LineNumberTable,
    LocalVariableTable,
    LocalVariableTypeTable,
    Deprecated,
    RuntimeVisibleAnnotations,
    RuntimeInvisibleAnnotations,
    RuntimeVisibleParameterAnnotations,
    RuntimeInvisibleParameterAnnotations,
    RuntimeVisibleTypeAnnotations,
    RuntimeInvisibleTypeAnnotations,
    AnnotationDefault,
    BootstrapMethods,
    MethodParameters,
    Module,
    ModulePackages,
    ModuleMainClass,
    NestHost,
    NestMembers,
    Record,
    PermittedSubclasses,
}

/// A decoded attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// Constant pool index of a field's constant value
    ConstantValue(u16),
    /// Method body
    Code(Box<CodeAttribute>),
    /// Verifier frames of a method body
    StackMapTable(Vec<StackMapFrame>),
    /// Checked exceptions a method declares
    Exceptions(Vec<String>),
    /// Inner class table
    InnerClasses(Vec<InnerClass>),
    /// Enclosing class and, for local and anonymous classes, the enclosing method
    EnclosingMethod {
        /// Enclosing class
        class: String,
        /// Name and descriptor of the enclosing method, if any
        method: Option<(String, String)>,
    },
    /// Compiler generated member or class
    Synthetic,
    /// Generic signature
    Signature(String),
    /// Source file name
    SourceFile(String),
    /// Extended debug information, e.g. an SMAP
    SourceDebugExtension(String),
    /// Bytecode offset to source line mapping
    LineNumberTable(Vec<LineNumber>),
    /// Local variable names and descriptors
    LocalVariableTable(Vec<LocalVariable>),
    /// Local variable generic signatures
    LocalVariableTypeTable(Vec<LocalVariable>),
    /// Deprecated marker
    Deprecated,
    /// Annotations retained at runtime
    RuntimeVisibleAnnotations(Vec<Annotation>),
    /// Annotations retained in the class file only
    RuntimeInvisibleAnnotations(Vec<Annotation>),
    /// Runtime visible annotations per method parameter
    RuntimeVisibleParameterAnnotations(Vec<Vec<Annotation>>),
    /// Class file only annotations per method parameter
    RuntimeInvisibleParameterAnnotations(Vec<Vec<Annotation>>),
    /// Runtime visible type annotations
    RuntimeVisibleTypeAnnotations(Vec<TypeAnnotation>),
    /// Class file only type annotations
    RuntimeInvisibleTypeAnnotations(Vec<TypeAnnotation>),
    /// Default value of an annotation interface element
    AnnotationDefault(ElementValue),
    /// Bootstrap methods of dynamic constants and call sites
    BootstrapMethods(Vec<BootstrapMethod>),
    /// Formal parameter names and flags
    MethodParameters(Vec<MethodParameter>),
    /// Module declaration
    Module(Box<ModuleAttribute>),
    /// Packages of a module
    ModulePackages(Vec<String>),
    /// Main class of a module
    ModuleMainClass(String),
    /// Host of the nest this class belongs to
    NestHost(String),
    /// Members of the nest this class hosts
    NestMembers(Vec<String>),
    /// Record components in declaration order
    Record(Vec<RecordComponent>),
    /// Permitted direct subclasses of a sealed class, in declaration order
    PermittedSubclasses(Vec<String>),
    /// Any attribute without a decoder
    Opaque {
        /// Attribute name
        name: String,
        /// Raw attribute bytes
        data: Vec<u8>,
    },
}

impl Attribute {
    /// The kind of a recognised attribute, `None` for [`Attribute::Opaque`].
    #[must_use]
    pub fn kind(&self) -> Option<AttributeKind> {
        let kind = match self {
            Attribute::ConstantValue(_) => AttributeKind::ConstantValue,
            Attribute::Code(_) => AttributeKind::Code,
            Attribute::StackMapTable(_) => AttributeKind::StackMapTable,
            Attribute::Exceptions(_) => AttributeKind::Exceptions,
            Attribute::InnerClasses(_) => AttributeKind::InnerClasses,
            Attribute::EnclosingMethod { .. } => AttributeKind::EnclosingMethod,
            Attribute::Synthetic => AttributeKind::Synthetic,
            Attribute::Signature(_) => AttributeKind::Signature,
            Attribute::SourceFile(_) => AttributeKind::SourceFile,
            Attribute::SourceDebugExtension(_) => AttributeKind::SourceDebugExtension,
            Attribute::LineNumberTable(_) => AttributeKind::LineNumberTable,
            Attribute::LocalVariableTable(_) => AttributeKind::LocalVariableTable,
            Attribute::LocalVariableTypeTable(_) => AttributeKind::LocalVariableTypeTable,
            Attribute::Deprecated => AttributeKind::Deprecated,
            Attribute::RuntimeVisibleAnnotations(_) => AttributeKind::RuntimeVisibleAnnotations,
            Attribute::RuntimeInvisibleAnnotations(_) => {
                AttributeKind::RuntimeInvisibleAnnotations
            }
            Attribute::RuntimeVisibleParameterAnnotations(_) => {
                AttributeKind::RuntimeVisibleParameterAnnotations
            }
            Attribute::RuntimeInvisibleParameterAnnotations(_) => {
                AttributeKind::RuntimeInvisibleParameterAnnotations
            }
            Attribute::RuntimeVisibleTypeAnnotations(_) => {
                AttributeKind::RuntimeVisibleTypeAnnotations
            }
            Attribute::RuntimeInvisibleTypeAnnotations(_) => {
                AttributeKind::RuntimeInvisibleTypeAnnotations
            }
            Attribute::AnnotationDefault(_) => AttributeKind::AnnotationDefault,
            Attribute::BootstrapMethods(_) => AttributeKind::BootstrapMethods,
            Attribute::MethodParameters(_) => AttributeKind::MethodParameters,
            Attribute::Module(_) => AttributeKind::Module,
            Attribute::ModulePackages(_) => AttributeKind::ModulePackages,
            Attribute::ModuleMainClass(_) => AttributeKind::ModuleMainClass,
            Attribute::NestHost(_) => AttributeKind::NestHost,
            Attribute::NestMembers(_) => AttributeKind::NestMembers,
            Attribute::Record(_) => AttributeKind::Record,
            Attribute::PermittedSubclasses(_) => AttributeKind::PermittedSubclasses,
            Attribute::Opaque { .. } => return None,
        };
        Some(kind)
    }

    /// The attribute name as stored in the class file.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Attribute::Opaque { name, .. } => name,
            _ => self.kind().map_or("", <&'static str>::from),
        }
    }
}

/// One row of the `InnerClasses` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClass {
    /// The inner class
    pub inner: String,
    /// Declaring class, absent for local and anonymous classes
    pub outer: Option<String>,
    /// Simple name, absent for anonymous classes
    pub name: Option<String>,
    /// Declared modifiers
    pub flags: InnerClassAccessFlags,
}

/// One row of the `LineNumberTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumber {
    /// First bytecode offset of the line
    pub start_pc: u16,
    /// Source line
    pub line_number: u16,
}

/// One row of the `LocalVariableTable` or `LocalVariableTypeTable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariable {
    /// First bytecode offset where the variable is live
    pub start_pc: u16,
    /// Length of the live range
    pub length: u16,
    /// Variable name
    pub name: String,
    /// Field descriptor, or generic signature in the type table
    pub descriptor: String,
    /// Local variable slot
    pub index: u16,
}

/// One row of the `BootstrapMethods` table.
///
/// The indices are resolved when a dynamic constant that uses this entry is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapMethod {
    /// `CONSTANT_MethodHandle` of the bootstrap method
    pub method_ref: u16,
    /// Static arguments passed to the bootstrap method
    pub arguments: Vec<u16>,
}

/// One row of the `MethodParameters` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParameter {
    /// Parameter name, absent for unnamed parameters
    pub name: Option<String>,
    /// Parameter flags
    pub flags: ParameterAccessFlags,
}

/// A record component.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordComponent {
    /// Component name
    pub name: String,
    /// Field descriptor of the component
    pub descriptor: String,
    /// Attributes of the component (Signature, annotations)
    pub attributes: Vec<Attribute>,
}

/// Decode a `u2` attribute count followed by that many attributes.
///
/// # Errors
/// Returns [`Error::TruncatedInput`] if an attribute header or body runs past the input, and
/// the decoder's error for a malformed attribute body.
pub fn parse_attributes(parser: &mut Parser, pool: &ConstantPool) -> Result<Vec<Attribute>> {
    parse_attributes_at(parser, pool, 0)
}

fn parse_attributes_at(
    parser: &mut Parser,
    pool: &ConstantPool,
    depth: usize,
) -> Result<Vec<Attribute>> {
    if depth > MAX_ATTRIBUTE_DEPTH {
        return Err(Error::RecursionLimit(MAX_ATTRIBUTE_DEPTH));
    }

    let count = parser.read_u2()?;
    let mut attributes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name_index = parser.read_u2()?;
        let length = parser.read_u4()? as usize;
        let data = parser.read_bytes(length)?;
        let name = pool.utf8(name_index)?;
        attributes.push(parse_attribute(name, data, pool, depth)?);
    }
    Ok(attributes)
}

/// Decode a single attribute body.
///
/// Running out of bytes inside `data`, leaving bytes unread, or structural errors inside the
/// body are reported as [`Error::MalformedAttribute`] naming the attribute.
fn parse_attribute(
    name: &str,
    data: &[u8],
    pool: &ConstantPool,
    depth: usize,
) -> Result<Attribute> {
    let Ok(kind) = AttributeKind::from_str(name) else {
        return Ok(Attribute::Opaque {
            name: name.to_string(),
            data: data.to_vec(),
        });
    };

    let mut parser = Parser::new(data);
    let attribute = match decode(kind, &mut parser, pool, depth) {
        Ok(attribute) => attribute,
        Err(Error::TruncatedInput) => {
            return Err(malformed_attribute!(
                name,
                "body needs more than the declared {} bytes",
                data.len()
            ))
        }
        Err(Error::Malformed { message, .. }) => return Err(malformed_attribute!(name, message)),
        Err(error) => return Err(error),
    };

    if parser.has_more_data() {
        return Err(malformed_attribute!(
            name,
            "{} of {} declared bytes left unread",
            parser.remaining(),
            data.len()
        ));
    }

    Ok(attribute)
}

fn decode(
    kind: AttributeKind,
    parser: &mut Parser,
    pool: &ConstantPool,
    depth: usize,
) -> Result<Attribute> {
    let attribute = match kind {
        AttributeKind::ConstantValue => {
            let index = parser.read_u2()?;
            match pool.get(index)? {
                ConstantPoolEntry::Integer(_)
                | ConstantPoolEntry::Float(_)
                | ConstantPoolEntry::Long(_)
                | ConstantPoolEntry::Double(_)
                | ConstantPoolEntry::String { .. } => Attribute::ConstantValue(index),
                other => {
                    return Err(cp_index_error!(
                        index,
                        "expected a constant value, found {}",
                        other.kind()
                    ))
                }
            }
        }
        AttributeKind::Code => Attribute::Code(Box::new(code::parse_code(
            parser,
            pool,
            |parser, pool| parse_attributes_at(parser, pool, depth + 1),
        )?)),
        AttributeKind::StackMapTable => {
            Attribute::StackMapTable(stackmap::parse_stack_map_table(parser, pool)?)
        }
        AttributeKind::Exceptions => Attribute::Exceptions(class_names(parser, pool)?),
        AttributeKind::InnerClasses => {
            let count = parser.read_u2()?;
            let mut classes = Vec::with_capacity(count as usize);
            for _ in 0..count {
                classes.push(InnerClass {
                    inner: pool.class_name(parser.read_u2()?)?.to_string(),
                    outer: pool
                        .optional_class_name(parser.read_u2()?)?
                        .map(ToString::to_string),
                    name: pool.optional_utf8(parser.read_u2()?)?.map(ToString::to_string),
                    flags: InnerClassAccessFlags::from_bits_retain(parser.read_u2()?),
                });
            }
            Attribute::InnerClasses(classes)
        }
        AttributeKind::EnclosingMethod => {
            let class = pool.class_name(parser.read_u2()?)?.to_string();
            let method_index = parser.read_u2()?;
            let method = if method_index == 0 {
                None
            } else {
                let (name, descriptor) = pool.name_and_type(method_index)?;
                Some((name.to_string(), descriptor.to_string()))
            };
            Attribute::EnclosingMethod { class, method }
        }
        AttributeKind::Synthetic => Attribute::Synthetic,
        AttributeKind::Signature => Attribute::Signature(pool.utf8(parser.read_u2()?)?.to_string()),
        AttributeKind::SourceFile => {
            Attribute::SourceFile(pool.utf8(parser.read_u2()?)?.to_string())
        }
        AttributeKind::SourceDebugExtension => {
            let data = parser.read_bytes(parser.remaining())?;
            Attribute::SourceDebugExtension(decode_modified_utf8(data))
        }
        AttributeKind::LineNumberTable => {
            let count = parser.read_u2()?;
            let mut lines = Vec::with_capacity(count as usize);
            for _ in 0..count {
                lines.push(LineNumber {
                    start_pc: parser.read_u2()?,
                    line_number: parser.read_u2()?,
                });
            }
            Attribute::LineNumberTable(lines)
        }
        AttributeKind::LocalVariableTable => {
            Attribute::LocalVariableTable(local_variables(parser, pool)?)
        }
        AttributeKind::LocalVariableTypeTable => {
            Attribute::LocalVariableTypeTable(local_variables(parser, pool)?)
        }
        AttributeKind::Deprecated => Attribute::Deprecated,
        AttributeKind::RuntimeVisibleAnnotations => {
            Attribute::RuntimeVisibleAnnotations(parse_annotations(parser, pool)?)
        }
        AttributeKind::RuntimeInvisibleAnnotations => {
            Attribute::RuntimeInvisibleAnnotations(parse_annotations(parser, pool)?)
        }
        AttributeKind::RuntimeVisibleParameterAnnotations => {
            Attribute::RuntimeVisibleParameterAnnotations(parse_parameter_annotations(
                parser, pool,
            )?)
        }
        AttributeKind::RuntimeInvisibleParameterAnnotations => {
            Attribute::RuntimeInvisibleParameterAnnotations(parse_parameter_annotations(
                parser, pool,
            )?)
        }
        AttributeKind::RuntimeVisibleTypeAnnotations => {
            Attribute::RuntimeVisibleTypeAnnotations(parse_type_annotations(parser, pool)?)
        }
        AttributeKind::RuntimeInvisibleTypeAnnotations => {
            Attribute::RuntimeInvisibleTypeAnnotations(parse_type_annotations(parser, pool)?)
        }
        AttributeKind::AnnotationDefault => {
            Attribute::AnnotationDefault(parse_element_value(parser, pool)?)
        }
        AttributeKind::BootstrapMethods => {
            let count = parser.read_u2()?;
            let mut methods = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let method_ref = parser.read_u2()?;
                let argument_count = parser.read_u2()?;
                let mut arguments = Vec::with_capacity(argument_count as usize);
                for _ in 0..argument_count {
                    arguments.push(parser.read_u2()?);
                }
                methods.push(BootstrapMethod {
                    method_ref,
                    arguments,
                });
            }
            Attribute::BootstrapMethods(methods)
        }
        AttributeKind::MethodParameters => {
            let count = parser.read_u1()?;
            let mut parameters = Vec::with_capacity(count as usize);
            for _ in 0..count {
                parameters.push(MethodParameter {
                    name: pool.optional_utf8(parser.read_u2()?)?.map(ToString::to_string),
                    flags: ParameterAccessFlags::from_bits_retain(parser.read_u2()?),
                });
            }
            Attribute::MethodParameters(parameters)
        }
        AttributeKind::Module => Attribute::Module(Box::new(module::parse_module(parser, pool)?)),
        AttributeKind::ModulePackages => {
            let count = parser.read_u2()?;
            let mut packages = Vec::with_capacity(count as usize);
            for _ in 0..count {
                packages.push(pool.package_name(parser.read_u2()?)?.to_string());
            }
            Attribute::ModulePackages(packages)
        }
        AttributeKind::ModuleMainClass => {
            Attribute::ModuleMainClass(pool.class_name(parser.read_u2()?)?.to_string())
        }
        AttributeKind::NestHost => {
            Attribute::NestHost(pool.class_name(parser.read_u2()?)?.to_string())
        }
        AttributeKind::NestMembers => Attribute::NestMembers(class_names(parser, pool)?),
        AttributeKind::Record => {
            let count = parser.read_u2()?;
            let mut components = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let name = pool.utf8(parser.read_u2()?)?.to_string();
                let descriptor = pool.utf8(parser.read_u2()?)?.to_string();
                let attributes = parse_attributes_at(parser, pool, depth + 1)?;
                components.push(RecordComponent {
                    name,
                    descriptor,
                    attributes,
                });
            }
            Attribute::Record(components)
        }
        AttributeKind::PermittedSubclasses => {
            Attribute::PermittedSubclasses(class_names(parser, pool)?)
        }
    };

    Ok(attribute)
}

fn class_names(parser: &mut Parser, pool: &ConstantPool) -> Result<Vec<String>> {
    let count = parser.read_u2()?;
    let mut names = Vec::with_capacity(count as usize);
    for _ in 0..count {
        names.push(pool.class_name(parser.read_u2()?)?.to_string());
    }
    Ok(names)
}

fn local_variables(parser: &mut Parser, pool: &ConstantPool) -> Result<Vec<LocalVariable>> {
    let count = parser.read_u2()?;
    let mut variables = Vec::with_capacity(count as usize);
    for _ in 0..count {
        variables.push(LocalVariable {
            start_pc: parser.read_u2()?,
            length: parser.read_u2()?,
            name: pool.utf8(parser.read_u2()?)?.to_string(),
            descriptor: pool.utf8(parser.read_u2()?)?.to_string(),
            index: parser.read_u2()?,
        });
    }
    Ok(variables)
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::test::PoolBuilder;

    /// Encode a single attribute list with one entry.
    fn attribute_list(name_index: u16, body: &[u8]) -> Vec<u8> {
        let mut data = 1_u16.to_be_bytes().to_vec();
        data.extend_from_slice(&name_index.to_be_bytes());
        data.extend_from_slice(&(body.len() as u32).to_be_bytes());
        data.extend_from_slice(body);
        data
    }

    fn decode_single(pool: &mut PoolBuilder, name: &str, body: &[u8]) -> Result<Attribute> {
        let name_index = pool.utf8(name);
        let data = attribute_list(name_index, body);
        let pool = pool.build();
        let mut parser = Parser::new(&data);
        let mut attributes = parse_attributes(&mut parser, &pool)?;
        assert!(!parser.has_more_data());
        Ok(attributes.remove(0))
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in AttributeKind::iter() {
            assert_eq!(AttributeKind::from_str(kind.as_ref()).unwrap(), kind);
        }
        assert_eq!(AttributeKind::COUNT, 30);
        assert!(AttributeKind::from_str("Unknown").is_err());
    }

    #[test]
    fn decoded_attribute_names() {
        assert_eq!(Attribute::Synthetic.name(), "Synthetic");
        assert_eq!(Attribute::Deprecated.name(), "Deprecated");
        assert_eq!(
            Attribute::SourceFile("Main.java".to_string()).name(),
            "SourceFile"
        );

        let name: &'static str = AttributeKind::LocalVariableTypeTable.into();
        assert_eq!(name, "LocalVariableTypeTable");
    }

    #[test]
    fn unknown_attribute_is_opaque() {
        let mut pool = PoolBuilder::new();
        let attribute = decode_single(&mut pool, "Custom", &[1, 2, 3]).unwrap();

        assert_eq!(
            attribute,
            Attribute::Opaque {
                name: "Custom".to_string(),
                data: vec![1, 2, 3],
            }
        );
        assert_eq!(attribute.name(), "Custom");
        assert_eq!(attribute.kind(), None);
    }

    #[test]
    fn source_file_and_signature() {
        let mut pool = PoolBuilder::new();
        let file = pool.utf8("Main.java");
        let attribute = decode_single(&mut pool, "SourceFile", &file.to_be_bytes()).unwrap();
        assert_eq!(attribute, Attribute::SourceFile("Main.java".to_string()));
        assert_eq!(attribute.name(), "SourceFile");
    }

    #[test]
    fn length_mismatch_is_malformed() {
        let mut pool = PoolBuilder::new();
        let file = pool.utf8("Main.java");
        let mut body = file.to_be_bytes().to_vec();
        body.push(0);

        assert!(matches!(
            decode_single(&mut pool, "SourceFile", &body),
            Err(Error::MalformedAttribute { attribute, .. }) if attribute == "SourceFile"
        ));
        assert!(matches!(
            decode_single(&mut PoolBuilder::new(), "SourceFile", &[0]),
            Err(Error::MalformedAttribute { attribute, .. }) if attribute == "SourceFile"
        ));
    }

    #[test]
    fn body_past_input_is_truncated() {
        let mut pool = PoolBuilder::new();
        let name = pool.utf8("Deprecated");
        let mut data = attribute_list(name, &[]);
        // claim 4 bytes that are not there
        data[7] = 4;
        let pool = pool.build();

        assert!(matches!(
            parse_attributes(&mut Parser::new(&data), &pool),
            Err(Error::TruncatedInput)
        ));
    }

    #[test]
    fn inner_classes_keep_absent_names() {
        let mut pool = PoolBuilder::new();
        let inner = pool.class("Outer$1");
        let named = pool.class("Outer$Inner");
        let outer = pool.class("Outer");
        let simple = pool.utf8("Inner");

        let mut body = 2_u16.to_be_bytes().to_vec();
        for value in [inner, 0, 0, 0x0000, named, outer, simple, 0x0009] {
            body.extend_from_slice(&value.to_be_bytes());
        }

        let Attribute::InnerClasses(classes) =
            decode_single(&mut pool, "InnerClasses", &body).unwrap()
        else {
            panic!("expected InnerClasses");
        };

        assert_eq!(classes[0].inner, "Outer$1");
        assert_eq!(classes[0].outer, None);
        assert_eq!(classes[0].name, None);
        assert_eq!(classes[1].outer.as_deref(), Some("Outer"));
        assert_eq!(classes[1].name.as_deref(), Some("Inner"));
        assert_eq!(
            classes[1].flags,
            InnerClassAccessFlags::PUBLIC | InnerClassAccessFlags::STATIC
        );
    }

    #[test]
    fn record_components_in_order() {
        let mut pool = PoolBuilder::new();
        let x = pool.utf8("x");
        let y = pool.utf8("y");
        let int = pool.utf8("I");
        let string = pool.utf8("Ljava/lang/String;");

        let mut body = 2_u16.to_be_bytes().to_vec();
        for value in [x, int, 0, y, string, 0] {
            body.extend_from_slice(&value.to_be_bytes());
        }

        let Attribute::Record(components) = decode_single(&mut pool, "Record", &body).unwrap()
        else {
            panic!("expected Record");
        };

        let names: Vec<&str> = components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(components[1].descriptor, "Ljava/lang/String;");
        assert!(components[0].attributes.is_empty());
    }

    #[test]
    fn permitted_subclasses_in_order() {
        let mut pool = PoolBuilder::new();
        let circle = pool.class("shapes/Circle");
        let square = pool.class("shapes/Square");
        let mut body = 2_u16.to_be_bytes().to_vec();
        body.extend_from_slice(&square.to_be_bytes());
        body.extend_from_slice(&circle.to_be_bytes());

        assert_eq!(
            decode_single(&mut pool, "PermittedSubclasses", &body).unwrap(),
            Attribute::PermittedSubclasses(vec![
                "shapes/Square".to_string(),
                "shapes/Circle".to_string()
            ])
        );
    }

    #[test]
    fn constant_value_kind_is_checked() {
        let mut pool = PoolBuilder::new();
        let value = pool.integer(7);
        assert_eq!(
            decode_single(&mut pool, "ConstantValue", &value.to_be_bytes()).unwrap(),
            Attribute::ConstantValue(value)
        );

        let mut pool = PoolBuilder::new();
        let class = pool.class("A");
        assert!(matches!(
            decode_single(&mut pool, "ConstantValue", &class.to_be_bytes()),
            Err(Error::InvalidConstantPoolIndex { .. })
        ));
    }

    #[test]
    fn bootstrap_methods_keep_indices() {
        let mut pool = PoolBuilder::new();
        let mut body = 1_u16.to_be_bytes().to_vec();
        for value in [12_u16, 2, 3, 4] {
            body.extend_from_slice(&value.to_be_bytes());
        }

        assert_eq!(
            decode_single(&mut pool, "BootstrapMethods", &body).unwrap(),
            Attribute::BootstrapMethods(vec![BootstrapMethod {
                method_ref: 12,
                arguments: vec![3, 4],
            }])
        );
    }

    #[test]
    fn method_parameters() {
        let mut pool = PoolBuilder::new();
        let name = pool.utf8("value");
        let mut body = vec![2];
        for value in [name, 0x0010, 0, 0x1000] {
            body.extend_from_slice(&value.to_be_bytes());
        }

        let Attribute::MethodParameters(parameters) =
            decode_single(&mut pool, "MethodParameters", &body).unwrap()
        else {
            panic!("expected MethodParameters");
        };
        assert_eq!(parameters[0].name.as_deref(), Some("value"));
        assert_eq!(parameters[0].flags, ParameterAccessFlags::FINAL);
        assert_eq!(parameters[1].name, None);
        assert_eq!(parameters[1].flags, ParameterAccessFlags::SYNTHETIC);
    }

    #[test]
    fn annotations_nested() {
        let mut pool = PoolBuilder::new();
        let outer = pool.utf8("Lx/Outer;");
        let inner = pool.utf8("Lx/Inner;");
        let value = pool.utf8("value");
        let items = pool.utf8("items");
        let text = pool.utf8("hi");
        let one = pool.integer(1);

        // @x.Outer(value=@x.Inner(value="hi"), items={1, 1})
        let mut body = Vec::new();
        for value in [1_u16, outer, 2, value] {
            body.extend_from_slice(&value.to_be_bytes());
        }
        body.push(b'@');
        for value in [inner, 1, value] {
            body.extend_from_slice(&value.to_be_bytes());
        }
        body.push(b's');
        body.extend_from_slice(&text.to_be_bytes());
        body.extend_from_slice(&items.to_be_bytes());
        body.push(b'[');
        body.extend_from_slice(&2_u16.to_be_bytes());
        for _ in 0..2 {
            body.push(b'I');
            body.extend_from_slice(&one.to_be_bytes());
        }

        let Attribute::RuntimeVisibleAnnotations(annotations) =
            decode_single(&mut pool, "RuntimeVisibleAnnotations", &body).unwrap()
        else {
            panic!("expected annotations");
        };

        assert_eq!(
            annotations[0].to_string(),
            "@x.Outer(value=@x.Inner(value=\"hi\"), items={1, 1})"
        );
    }

    #[test]
    fn annotation_depth_is_limited() {
        let mut pool = PoolBuilder::new();
        let value = pool.utf8("v");

        // An array nested far deeper than the limit
        let mut body = Vec::new();
        for _ in 0..200 {
            body.push(b'[');
            body.extend_from_slice(&1_u16.to_be_bytes());
        }
        body.push(b's');
        body.extend_from_slice(&value.to_be_bytes());

        assert!(matches!(
            decode_single(&mut pool, "AnnotationDefault", &body),
            Err(Error::RecursionLimit(_))
        ));
    }

    #[test]
    fn element_value_rendering() {
        let mut pool = PoolBuilder::new();
        let color = pool.utf8("Lx/Color;");
        let red = pool.utf8("RED");
        let string = pool.utf8("Ljava/lang/String;");
        let void = pool.utf8("V");
        let c = pool.integer('q' as i32);
        let flag = pool.integer(1);

        let cases: Vec<(Vec<u8>, &str)> = vec![
            (
                [vec![b'e'], color.to_be_bytes().to_vec(), red.to_be_bytes().to_vec()].concat(),
                "x.Color.RED",
            ),
            (
                [vec![b'c'], string.to_be_bytes().to_vec()].concat(),
                "java.lang.String.class",
            ),
            ([vec![b'c'], void.to_be_bytes().to_vec()].concat(), "void.class"),
            ([vec![b'C'], c.to_be_bytes().to_vec()].concat(), "'q'"),
            ([vec![b'Z'], flag.to_be_bytes().to_vec()].concat(), "true"),
            ([vec![b'B'], flag.to_be_bytes().to_vec()].concat(), "(byte) 1"),
        ];

        for (body, expected) in cases {
            let Attribute::AnnotationDefault(value) =
                decode_single(&mut pool, "AnnotationDefault", &body).unwrap()
            else {
                panic!("expected AnnotationDefault");
            };
            assert_eq!(value.to_string(), expected);
        }
    }

    #[test]
    fn unknown_element_tag_names_the_attribute() {
        let mut pool = PoolBuilder::new();
        assert!(matches!(
            decode_single(&mut pool, "AnnotationDefault", &[b'x', 0, 1]),
            Err(Error::MalformedAttribute { attribute, .. }) if attribute == "AnnotationDefault"
        ));
    }

    #[test]
    fn type_annotation_targets() {
        let mut pool = PoolBuilder::new();
        let kind = pool.utf8("Lx/NonNull;");

        // formal parameter 1, path [3:0], @x.NonNull
        let mut body = 1_u16.to_be_bytes().to_vec();
        body.extend_from_slice(&[0x16, 1, 1, 3, 0]);
        body.extend_from_slice(&kind.to_be_bytes());
        body.extend_from_slice(&0_u16.to_be_bytes());

        let Attribute::RuntimeVisibleTypeAnnotations(annotations) =
            decode_single(&mut pool, "RuntimeVisibleTypeAnnotations", &body).unwrap()
        else {
            panic!("expected type annotations");
        };

        assert_eq!(
            annotations[0].to_string(),
            "0x16 formal parameter 1 path [3:0] @x.NonNull"
        );
    }
}
