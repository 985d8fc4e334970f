//! The `Code` attribute (JVMS §4.7.3).

use crate::{
    classfile::{attributes::Attribute, constantpool::ConstantPool},
    disassembler::{constant_operand, decode_code, Instruction, Operand},
    file::parser::Parser,
    Result,
};

/// The longest code array a method may have.
pub const MAX_CODE_LENGTH: usize = 65535;

/// A method body.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeAttribute {
    /// Maximum operand stack depth
    pub max_stack: u16,
    /// Number of local variable slots
    pub max_locals: u16,
    /// Length of the code array in bytes
    pub code_length: u32,
    /// Decoded instructions in offset order
    pub instructions: Vec<Instruction>,
    /// Exception handlers in table order
    pub exception_table: Vec<ExceptionHandler>,
    /// Nested attributes (LineNumberTable, LocalVariableTable, StackMapTable, ...)
    pub attributes: Vec<Attribute>,
}

impl CodeAttribute {
    /// Find a nested attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attribute| attribute.name() == name)
    }
}

/// One row of the exception table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionHandler {
    /// First covered offset
    pub start_pc: u16,
    /// First offset after the covered range
    pub end_pc: u16,
    /// Offset of the handler
    pub handler_pc: u16,
    /// Caught class, `None` for a `finally` handler
    pub catch_type: Option<String>,
}

/// Every constant pool operand must reference an entry of the kind its opcode expects.
fn check_constant_operands(instructions: &[Instruction], pool: &ConstantPool) -> Result<()> {
    for instruction in instructions {
        let Some(kind) = constant_operand(instruction.opcode) else {
            continue;
        };
        for operand in &instruction.operands {
            if let Operand::Constant(index) = operand {
                pool.operand(*index, kind)?;
            }
        }
    }
    Ok(())
}

/// Decode a `Code` attribute body. Nested attributes are decoded with `parse_nested`, which
/// carries the nesting depth of the caller.
pub(crate) fn parse_code<F>(
    parser: &mut Parser,
    pool: &ConstantPool,
    parse_nested: F,
) -> Result<CodeAttribute>
where
    F: FnOnce(&mut Parser, &ConstantPool) -> Result<Vec<Attribute>>,
{
    let max_stack = parser.read_u2()?;
    let max_locals = parser.read_u2()?;
    let code_length = parser.read_u4()?;
    if code_length == 0 || code_length as usize > MAX_CODE_LENGTH {
        return Err(malformed_error!("Invalid code length {}", code_length));
    }

    let code = parser.read_bytes(code_length as usize)?;
    let instructions = decode_code(code)?;
    check_constant_operands(&instructions, pool)?;

    let handler_count = parser.read_u2()?;
    let mut exception_table = Vec::with_capacity(handler_count as usize);
    for _ in 0..handler_count {
        exception_table.push(ExceptionHandler {
            start_pc: parser.read_u2()?,
            end_pc: parser.read_u2()?,
            handler_pc: parser.read_u2()?,
            catch_type: pool
                .optional_class_name(parser.read_u2()?)?
                .map(ToString::to_string),
        });
    }

    let attributes = parse_nested(parser, pool)?;

    Ok(CodeAttribute {
        max_stack,
        max_locals,
        code_length,
        instructions,
        exception_table,
        attributes,
    })
}
