//! Field and method descriptors (JVMS §4.3).
//!
//! Descriptors are the compact type encoding used throughout the class file: `I` for `int`,
//! `Ljava/lang/String;` for a class type, `[[D` for `double[][]` and `(IJ)V` for a method that
//! takes an `int` and a `long` and returns nothing. The renderer uses the parsed form to print
//! source-style declarations.

use std::fmt;

use crate::Result;

/// A decoded field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// `B`
    Byte,
    /// `C`
    Char,
    /// `D`
    Double,
    /// `F`
    Float,
    /// `I`
    Int,
    /// `J`
    Long,
    /// `S`
    Short,
    /// `Z`
    Boolean,
    /// `L<internal name>;`
    Object(String),
    /// `[<component>`
    Array(Box<FieldType>),
}

impl FieldType {
    /// Parse a complete field descriptor.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `descriptor` is not exactly one field type.
    pub fn parse(descriptor: &str) -> Result<FieldType> {
        let mut chars = descriptor.char_indices().peekable();
        let field_type = parse_field_type(descriptor, &mut chars)?;
        if chars.peek().is_some() {
            return Err(malformed_error!(
                "Trailing characters in field descriptor - {}",
                descriptor
            ));
        }
        Ok(field_type)
    }

    /// Parse a `CONSTANT_Class` name, which is either an internal name or an array descriptor.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for an invalid array descriptor.
    pub fn from_class_name(name: &str) -> Result<FieldType> {
        if name.starts_with('[') {
            Self::parse(name)
        } else {
            Ok(FieldType::Object(name.to_string()))
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Byte => write!(f, "byte"),
            FieldType::Char => write!(f, "char"),
            FieldType::Double => write!(f, "double"),
            FieldType::Float => write!(f, "float"),
            FieldType::Int => write!(f, "int"),
            FieldType::Long => write!(f, "long"),
            FieldType::Short => write!(f, "short"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Object(name) => write!(f, "{}", java_name(name)),
            FieldType::Array(component) => write!(f, "{component}[]"),
        }
    }
}

/// A decoded method descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Parameter types in declaration order
    pub parameters: Vec<FieldType>,
    /// Return type, `None` for `void`
    pub return_type: Option<FieldType>,
}

impl MethodDescriptor {
    /// Parse a method descriptor such as `(ILjava/lang/String;)V`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `descriptor` is not a valid method descriptor.
    pub fn parse(descriptor: &str) -> Result<MethodDescriptor> {
        let mut chars = descriptor.char_indices().peekable();
        if !matches!(chars.next(), Some((_, '('))) {
            return Err(malformed_error!(
                "Method descriptor does not start with '(' - {}",
                descriptor
            ));
        }

        let mut parameters = Vec::new();
        loop {
            match chars.peek() {
                Some((_, ')')) => {
                    chars.next();
                    break;
                }
                Some(_) => parameters.push(parse_field_type(descriptor, &mut chars)?),
                None => {
                    return Err(malformed_error!(
                        "Unterminated parameter list - {}",
                        descriptor
                    ))
                }
            }
        }

        let return_type = if matches!(chars.peek(), Some((_, 'V'))) {
            chars.next();
            None
        } else {
            Some(parse_field_type(descriptor, &mut chars)?)
        };

        if chars.peek().is_some() {
            return Err(malformed_error!(
                "Trailing characters in method descriptor - {}",
                descriptor
            ));
        }

        Ok(MethodDescriptor {
            parameters,
            return_type,
        })
    }

    /// Comma separated parameter list, e.g. `int, java.lang.String[]`.
    #[must_use]
    pub fn parameter_list(&self) -> String {
        self.parameters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Return type as source text, `void` when absent.
    #[must_use]
    pub fn return_name(&self) -> String {
        match &self.return_type {
            Some(return_type) => return_type.to_string(),
            None => "void".to_string(),
        }
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}){}", self.parameter_list(), self.return_name())
    }
}

/// Convert an internal name (`java/lang/String`) to its binary name (`java.lang.String`).
#[must_use]
pub fn java_name(internal: &str) -> String {
    internal.replace('/', ".")
}

fn parse_field_type(
    descriptor: &str,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<FieldType> {
    let mut dimensions = 0usize;
    while matches!(chars.peek(), Some((_, '['))) {
        chars.next();
        dimensions += 1;
        if dimensions > 255 {
            return Err(malformed_error!(
                "More than 255 array dimensions - {}",
                descriptor
            ));
        }
    }

    let mut field_type = match chars.next() {
        Some((_, 'B')) => FieldType::Byte,
        Some((_, 'C')) => FieldType::Char,
        Some((_, 'D')) => FieldType::Double,
        Some((_, 'F')) => FieldType::Float,
        Some((_, 'I')) => FieldType::Int,
        Some((_, 'J')) => FieldType::Long,
        Some((_, 'S')) => FieldType::Short,
        Some((_, 'Z')) => FieldType::Boolean,
        Some((start, 'L')) => {
            let body = &descriptor[start + 1..];
            let Some(end) = body.find(';') else {
                return Err(malformed_error!(
                    "Unterminated class type - {}",
                    descriptor
                ));
            };
            if end == 0 {
                return Err(malformed_error!("Empty class name - {}", descriptor));
            }
            for _ in 0..=end {
                chars.next();
            }
            FieldType::Object(body[..end].to_string())
        }
        Some((_, other)) => {
            return Err(malformed_error!(
                "Unexpected '{}' in descriptor - {}",
                other,
                descriptor
            ))
        }
        None => {
            return Err(malformed_error!(
                "Descriptor ended early - {}",
                descriptor
            ))
        }
    };

    for _ in 0..dimensions {
        field_type = FieldType::Array(Box::new(field_type));
    }

    Ok(field_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn parse_primitives() {
        for (descriptor, name) in [
            ("B", "byte"),
            ("C", "char"),
            ("D", "double"),
            ("F", "float"),
            ("I", "int"),
            ("J", "long"),
            ("S", "short"),
            ("Z", "boolean"),
        ] {
            assert_eq!(FieldType::parse(descriptor).unwrap().to_string(), name);
        }
    }

    #[test]
    fn parse_object_and_arrays() {
        let field = FieldType::parse("[[Ljava/lang/String;").unwrap();
        assert_eq!(field.to_string(), "java.lang.String[][]");
        assert_eq!(
            field,
            FieldType::Array(Box::new(FieldType::Array(Box::new(FieldType::Object(
                "java/lang/String".to_string()
            )))))
        );
    }

    #[test]
    fn parse_method() {
        let method = MethodDescriptor::parse("(I[JLjava/util/List;)Ljava/lang/Object;").unwrap();
        assert_eq!(method.parameters.len(), 3);
        assert_eq!(method.parameter_list(), "int, long[], java.util.List");
        assert_eq!(method.return_name(), "java.lang.Object");
        assert_eq!(
            method.to_string(),
            "(int, long[], java.util.List)java.lang.Object"
        );
    }

    #[test]
    fn parse_void_method() {
        let method = MethodDescriptor::parse("()V").unwrap();
        assert!(method.parameters.is_empty());
        assert_eq!(method.return_type, None);
        assert_eq!(method.to_string(), "()void");
    }

    #[test]
    fn class_names() {
        assert_eq!(
            FieldType::from_class_name("java/lang/Runnable")
                .unwrap()
                .to_string(),
            "java.lang.Runnable"
        );
        assert_eq!(
            FieldType::from_class_name("[I").unwrap().to_string(),
            "int[]"
        );
    }

    #[test]
    fn invalid_descriptors() {
        for descriptor in ["", "X", "Ljava/lang/String", "L;", "II", "[", "V"] {
            assert!(
                matches!(FieldType::parse(descriptor), Err(Error::Malformed { .. })),
                "{descriptor}"
            );
        }
        for descriptor in ["I)V", "(I", "(I)", "(I)VV", "(V)V"] {
            assert!(
                matches!(
                    MethodDescriptor::parse(descriptor),
                    Err(Error::Malformed { .. })
                ),
                "{descriptor}"
            );
        }
    }
}
