//! The `StackMapTable` attribute (JVMS §4.7.4).
//!
//! Frames are kept in their compressed form, each with the offset delta to the previous
//! frame. Frame types 128 to 246 are reserved and rejected.

use std::fmt;

use crate::{classfile::constantpool::ConstantPool, file::parser::Parser, Result};

/// Type of a local variable or stack slot as seen by the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationType {
    /// Unusable slot
    Top,
    /// `int`, `short`, `char`, `byte` or `boolean`
    Integer,
    /// `float`
    Float,
    /// `double`, occupying two slots
    Double,
    /// `long`, occupying two slots
    Long,
    /// The `null` reference
    Null,
    /// `this` inside a constructor before the super constructor ran
    UninitializedThis,
    /// Instance of the named class or array type
    Object(String),
    /// Result of the `new` instruction at the given offset before its constructor ran
    Uninitialized(u16),
}

impl fmt::Display for VerificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationType::Top => write!(f, "top"),
            VerificationType::Integer => write!(f, "int"),
            VerificationType::Float => write!(f, "float"),
            VerificationType::Double => write!(f, "double"),
            VerificationType::Long => write!(f, "long"),
            VerificationType::Null => write!(f, "null"),
            VerificationType::UninitializedThis => write!(f, "this"),
            VerificationType::Object(name) => write!(f, "class {name}"),
            VerificationType::Uninitialized(offset) => write!(f, "uninitialized {offset}"),
        }
    }
}

/// One compressed stack map frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackMapFrame {
    /// Types 0-63, and type 251 when `extended` is set
    Same {
        /// Offset delta to the previous frame
        offset_delta: u16,
        /// Encoded as `same_frame_extended`
        extended: bool,
    },
    /// Types 64-127, and type 247 when `extended` is set
    SameLocals1StackItem {
        /// Offset delta to the previous frame
        offset_delta: u16,
        /// The single stack entry
        stack: VerificationType,
        /// Encoded as `same_locals_1_stack_item_frame_extended`
        extended: bool,
    },
    /// Types 248-250, dropping the last `chopped` locals
    Chop {
        /// Offset delta to the previous frame
        offset_delta: u16,
        /// Number of removed locals, 1 to 3
        chopped: u8,
    },
    /// Types 252-254, adding 1 to 3 locals
    Append {
        /// Offset delta to the previous frame
        offset_delta: u16,
        /// Added locals
        locals: Vec<VerificationType>,
    },
    /// Type 255
    Full {
        /// Offset delta to the previous frame
        offset_delta: u16,
        /// All locals
        locals: Vec<VerificationType>,
        /// Complete operand stack
        stack: Vec<VerificationType>,
    },
}

impl StackMapFrame {
    /// The encoded offset delta of this frame.
    #[must_use]
    pub fn offset_delta(&self) -> u16 {
        match self {
            StackMapFrame::Same { offset_delta, .. }
            | StackMapFrame::SameLocals1StackItem { offset_delta, .. }
            | StackMapFrame::Chop { offset_delta, .. }
            | StackMapFrame::Append { offset_delta, .. }
            | StackMapFrame::Full { offset_delta, .. } => *offset_delta,
        }
    }
}

fn write_types(f: &mut fmt::Formatter<'_>, types: &[VerificationType]) -> fmt::Result {
    write!(f, "[")?;
    for (position, kind) in types.iter().enumerate() {
        if position > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{kind}")?;
    }
    write!(f, "]")
}

impl fmt::Display for StackMapFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackMapFrame::Same {
                offset_delta,
                extended,
            } => {
                let name = if *extended { "same_frame_extended" } else { "same_frame" };
                write!(f, "{name} offset_delta={offset_delta}")
            }
            StackMapFrame::SameLocals1StackItem {
                offset_delta,
                stack,
                extended,
            } => {
                let name = if *extended {
                    "same_locals_1_stack_item_frame_extended"
                } else {
                    "same_locals_1_stack_item_frame"
                };
                write!(f, "{name} offset_delta={offset_delta} stack=[{stack}]")
            }
            StackMapFrame::Chop {
                offset_delta,
                chopped,
            } => write!(f, "chop_frame offset_delta={offset_delta} chopped={chopped}"),
            StackMapFrame::Append {
                offset_delta,
                locals,
            } => {
                write!(f, "append_frame offset_delta={offset_delta} locals=")?;
                write_types(f, locals)
            }
            StackMapFrame::Full {
                offset_delta,
                locals,
                stack,
            } => {
                write!(f, "full_frame offset_delta={offset_delta} locals=")?;
                write_types(f, locals)?;
                write!(f, " stack=")?;
                write_types(f, stack)
            }
        }
    }
}

/// Decode the frames of a `StackMapTable` body.
pub(crate) fn parse_stack_map_table(
    parser: &mut Parser,
    pool: &ConstantPool,
) -> Result<Vec<StackMapFrame>> {
    let count = parser.read_u2()?;
    let mut frames = Vec::with_capacity(count as usize);
    for _ in 0..count {
        frames.push(parse_frame(parser, pool)?);
    }
    Ok(frames)
}

fn parse_frame(parser: &mut Parser, pool: &ConstantPool) -> Result<StackMapFrame> {
    let frame_type = parser.read_u1()?;
    let frame = match frame_type {
        0..=63 => StackMapFrame::Same {
            offset_delta: u16::from(frame_type),
            extended: false,
        },
        64..=127 => StackMapFrame::SameLocals1StackItem {
            offset_delta: u16::from(frame_type - 64),
            stack: parse_verification_type(parser, pool)?,
            extended: false,
        },
        128..=246 => {
            return Err(malformed_error!(
                "Reserved stack map frame type {}",
                frame_type
            ))
        }
        247 => StackMapFrame::SameLocals1StackItem {
            offset_delta: parser.read_u2()?,
            stack: parse_verification_type(parser, pool)?,
            extended: true,
        },
        248..=250 => StackMapFrame::Chop {
            offset_delta: parser.read_u2()?,
            chopped: 251 - frame_type,
        },
        251 => StackMapFrame::Same {
            offset_delta: parser.read_u2()?,
            extended: true,
        },
        252..=254 => {
            let offset_delta = parser.read_u2()?;
            let locals = parse_verification_types(parser, pool, usize::from(frame_type - 251))?;
            StackMapFrame::Append {
                offset_delta,
                locals,
            }
        }
        255 => {
            let offset_delta = parser.read_u2()?;
            let local_count = parser.read_u2()?;
            let locals = parse_verification_types(parser, pool, usize::from(local_count))?;
            let stack_count = parser.read_u2()?;
            let stack = parse_verification_types(parser, pool, usize::from(stack_count))?;
            StackMapFrame::Full {
                offset_delta,
                locals,
                stack,
            }
        }
    };

    Ok(frame)
}

fn parse_verification_types(
    parser: &mut Parser,
    pool: &ConstantPool,
    count: usize,
) -> Result<Vec<VerificationType>> {
    // every entry takes at least one byte
    parser.ensure_remaining(count)?;

    let mut types = Vec::with_capacity(count);
    for _ in 0..count {
        types.push(parse_verification_type(parser, pool)?);
    }
    Ok(types)
}

fn parse_verification_type(parser: &mut Parser, pool: &ConstantPool) -> Result<VerificationType> {
    let tag = parser.read_u1()?;
    let kind = match tag {
        0 => VerificationType::Top,
        1 => VerificationType::Integer,
        2 => VerificationType::Float,
        3 => VerificationType::Double,
        4 => VerificationType::Long,
        5 => VerificationType::Null,
        6 => VerificationType::UninitializedThis,
        7 => VerificationType::Object(pool.class_name(parser.read_u2()?)?.to_string()),
        8 => VerificationType::Uninitialized(parser.read_u2()?),
        _ => return Err(malformed_error!("Unknown verification type tag {}", tag)),
    };
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test::PoolBuilder, Error};

    fn parse(pool: &ConstantPool, data: &[u8]) -> Result<Vec<StackMapFrame>> {
        let mut parser = Parser::new(data);
        let frames = parse_stack_map_table(&mut parser, pool)?;
        assert!(!parser.has_more_data());
        Ok(frames)
    }

    #[test]
    fn compact_frames() {
        let pool = PoolBuilder::new().build();
        // same(5), same_locals_1_stack_item(2, int), chop 2 (+7), same_extended(+300)
        let data = [0, 4, 5, 66, 1, 249, 0, 7, 251, 0x01, 0x2C];
        let frames = parse(&pool, &data).unwrap();

        assert_eq!(
            frames,
            vec![
                StackMapFrame::Same {
                    offset_delta: 5,
                    extended: false
                },
                StackMapFrame::SameLocals1StackItem {
                    offset_delta: 2,
                    stack: VerificationType::Integer,
                    extended: false
                },
                StackMapFrame::Chop {
                    offset_delta: 7,
                    chopped: 2
                },
                StackMapFrame::Same {
                    offset_delta: 300,
                    extended: true
                },
            ]
        );
        assert_eq!(frames[3].offset_delta(), 300);
    }

    #[test]
    fn full_frame_with_objects() {
        let mut builder = PoolBuilder::new();
        let string = builder.class("java/lang/String");
        let pool = builder.build();

        let [high, low] = string.to_be_bytes();
        // full_frame delta 9, locals [this-class, long], stack [uninitialized 3]
        let data = [0, 1, 255, 0, 9, 0, 2, 7, high, low, 4, 0, 1, 8, 0, 3];
        let frames = parse(&pool, &data).unwrap();

        assert_eq!(
            frames[0].to_string(),
            "full_frame offset_delta=9 locals=[class java/lang/String, long] stack=[uninitialized 3]"
        );
    }

    #[test]
    fn append_frame() {
        let pool = PoolBuilder::new().build();
        let frames = parse(&pool, &[0, 1, 253, 0, 4, 1, 2]).unwrap();
        assert_eq!(
            frames[0].to_string(),
            "append_frame offset_delta=4 locals=[int, float]"
        );
    }

    #[test]
    fn reserved_frame_type() {
        let pool = PoolBuilder::new().build();
        assert!(matches!(
            parse(&pool, &[0, 1, 200]),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn unknown_verification_tag() {
        let pool = PoolBuilder::new().build();
        assert!(matches!(
            parse(&pool, &[0, 1, 64, 9]),
            Err(Error::Malformed { .. })
        ));
    }
}
