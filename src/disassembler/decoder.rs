//! Bytecode decoding.
//!
//! Decoding is a linear sweep over the code array of a `Code` attribute: every byte belongs to
//! exactly one instruction, so the stream is decoded front to back and each branch target is
//! then checked against the set of instruction start offsets.
//!
//! # Example: Decoding a Single Instruction
//!
//! ```rust
//! use classscope::{Parser, disassembler::{decode_instruction, Operand}};
//!
//! let code = [0x10, 0xFE]; // bipush -2
//! let mut parser = Parser::new(&code);
//! let instruction = decode_instruction(&mut parser)?;
//! assert_eq!(instruction.mnemonic, "bipush");
//! assert_eq!(instruction.operands, vec![Operand::Immediate(-2)]);
//! # Ok::<(), classscope::Error>(())
//! ```
//!
//! # Example: Decoding a Code Array
//!
//! ```rust
//! use classscope::disassembler::decode_code;
//!
//! let code = [0x03, 0x3C, 0xB1]; // iconst_0, istore_1, return
//! let instructions = decode_code(&code)?;
//! assert_eq!(instructions.len(), 3);
//! assert_eq!(instructions[2].offset, 2);
//! # Ok::<(), classscope::Error>(())
//! ```

use crate::{
    disassembler::{
        instruction::array_type_name,
        opcodes::{opcode_info, WIDE},
        visitedmap::VisitedMap,
        Instruction, Operand, OperandType,
    },
    file::parser::Parser,
    Error, Result,
};

/// Decode every instruction of a code array.
///
/// Offsets are relative to the start of `code`, which is also the reference point for the
/// padding of `tableswitch` and `lookupswitch`.
///
/// # Errors
/// Returns [`Error::MalformedCode`] for unknown opcodes, instructions that run past the end of
/// `code`, invalid `wide` forms and branch targets that are not instruction boundaries.
pub fn decode_code(code: &[u8]) -> Result<Vec<Instruction>> {
    let mut parser = Parser::new(code);
    let mut boundaries = VisitedMap::new(code.len());
    let mut instructions = Vec::new();

    while parser.has_more_data() {
        boundaries.set(parser.pos());
        instructions.push(decode_instruction(&mut parser)?);
    }

    for instruction in &instructions {
        for target in instruction.branch_targets() {
            if !boundaries.get(target as usize) {
                return Err(malformed_code!(
                    instruction.offset as usize,
                    "{} targets offset {} which is not an instruction boundary",
                    instruction.mnemonic,
                    target
                ));
            }
        }
    }

    Ok(instructions)
}

/// Decode the instruction at the parser's position.
///
/// The parser must start at the beginning of the code array so that switch padding is
/// computed from the right origin.
///
/// # Errors
/// Returns [`Error::MalformedCode`] if the opcode is unknown, the operands run past the end of
/// the data, or the instruction is otherwise invalid.
pub fn decode_instruction(parser: &mut Parser) -> Result<Instruction> {
    let start = parser.pos();
    match decode_at(parser, start) {
        Err(Error::TruncatedInput) => Err(malformed_code!(
            start,
            "instruction runs past the end of the code array"
        )),
        result => result,
    }
}

fn decode_at(parser: &mut Parser, start: usize) -> Result<Instruction> {
    let offset = code_offset(start)?;
    let mut opcode = parser.read_u1()?;
    let mut wide = false;

    if opcode == WIDE {
        wide = true;
        opcode = parser.peek_byte()?;
        let widened = opcode_info(opcode).map(|info| info.operands);
        if !matches!(
            widened,
            Some(OperandType::Local | OperandType::Increment)
        ) {
            return Err(malformed_code!(
                start,
                "wide prefix before opcode {:#04x}",
                opcode
            ));
        }
        parser.advance_by(1)?;
    }

    let Some(info) = opcode_info(opcode) else {
        return Err(malformed_code!(start, "unknown opcode {:#04x}", opcode));
    };

    let mut operands = Vec::new();
    match info.operands {
        OperandType::None => {}
        OperandType::Byte => operands.push(Operand::Immediate(i32::from(parser.read_i1()?))),
        OperandType::Short => operands.push(Operand::Immediate(i32::from(parser.read_i2()?))),
        OperandType::ConstantU1 => operands.push(Operand::Constant(u16::from(parser.read_u1()?))),
        OperandType::ConstantU2 => operands.push(Operand::Constant(parser.read_u2()?)),
        OperandType::Local => operands.push(Operand::Local(read_local(parser, wide)?)),
        OperandType::Increment => {
            operands.push(Operand::Local(read_local(parser, wide)?));
            let increment = if wide {
                i32::from(parser.read_i2()?)
            } else {
                i32::from(parser.read_i1()?)
            };
            operands.push(Operand::Immediate(increment));
        }
        OperandType::Branch => {
            let delta = i64::from(parser.read_i2()?);
            operands.push(Operand::Branch(branch_target(start, delta)?));
        }
        OperandType::BranchWide => {
            let delta = i64::from(parser.read_i4()?);
            operands.push(Operand::Branch(branch_target(start, delta)?));
        }
        OperandType::ArrayType => {
            let code = parser.read_u1()?;
            if array_type_name(code).is_none() {
                return Err(malformed_code!(start, "invalid newarray type {}", code));
            }
            operands.push(Operand::ArrayType(code));
        }
        OperandType::InvokeInterface => {
            operands.push(Operand::Constant(parser.read_u2()?));
            operands.push(Operand::Immediate(i32::from(parser.read_u1()?)));
            parser.advance_by(1)?;
        }
        OperandType::InvokeDynamic => {
            operands.push(Operand::Constant(parser.read_u2()?));
            parser.advance_by(2)?;
        }
        OperandType::MultiANewArray => {
            operands.push(Operand::Constant(parser.read_u2()?));
            operands.push(Operand::Immediate(i32::from(parser.read_u1()?)));
        }
        OperandType::TableSwitch => operands.push(decode_table_switch(parser, start)?),
        OperandType::LookupSwitch => operands.push(decode_lookup_switch(parser, start)?),
        OperandType::Wide => {
            return Err(malformed_code!(start, "wide prefix applied to wide"));
        }
    }

    let size = code_offset(parser.pos() - start)?;

    Ok(Instruction {
        offset,
        opcode,
        mnemonic: info.mnemonic,
        wide,
        size,
        operands,
    })
}

fn read_local(parser: &mut Parser, wide: bool) -> Result<u16> {
    if wide {
        parser.read_u2()
    } else {
        Ok(u16::from(parser.read_u1()?))
    }
}

fn decode_table_switch(parser: &mut Parser, start: usize) -> Result<Operand> {
    parser.align(4)?;
    let default = branch_target(start, i64::from(parser.read_i4()?))?;
    let low = parser.read_i4()?;
    let high = parser.read_i4()?;
    if high < low {
        return Err(malformed_code!(
            start,
            "tableswitch high {} is below low {}",
            high,
            low
        ));
    }

    let count = usize::try_from(i64::from(high) - i64::from(low) + 1)
        .map_err(|_| malformed_code!(start, "tableswitch range too large"))?;
    parser.ensure_remaining(count.saturating_mul(4))?;

    let mut cases = Vec::with_capacity(count);
    for value in low..=high {
        cases.push((value, branch_target(start, i64::from(parser.read_i4()?))?));
    }

    Ok(Operand::Switch { default, cases })
}

fn decode_lookup_switch(parser: &mut Parser, start: usize) -> Result<Operand> {
    parser.align(4)?;
    let default = branch_target(start, i64::from(parser.read_i4()?))?;
    let pairs = parser.read_i4()?;
    let Ok(count) = usize::try_from(pairs) else {
        return Err(malformed_code!(start, "negative lookupswitch pair count {}", pairs));
    };
    parser.ensure_remaining(count.saturating_mul(8))?;

    let mut cases = Vec::with_capacity(count);
    for _ in 0..count {
        let value = parser.read_i4()?;
        cases.push((value, branch_target(start, i64::from(parser.read_i4()?))?));
    }

    Ok(Operand::Switch { default, cases })
}

fn branch_target(start: usize, delta: i64) -> Result<u32> {
    let target = i64::try_from(start).unwrap_or(i64::MAX).saturating_add(delta);
    u32::try_from(target)
        .map_err(|_| malformed_code!(start, "branch target {} is outside the code array", target))
}

fn code_offset(offset: usize) -> Result<u32> {
    u32::try_from(offset).map_err(|_| malformed_code!(offset, "offset exceeds the code length limit"))
}
