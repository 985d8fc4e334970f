//! JVM bytecode decoding.
//!
//! This module turns the code array of a `Code` attribute into a list of typed instructions.
//! Operands stay symbolic: constant pool indices are kept as indices and resolved by the
//! renderer, branch offsets are converted to absolute targets within the code array.
//!
//! # Key Types
//! - [`Instruction`] - A decoded instruction with offset, size and operands
//! - [`Operand`] - Constant pool references, local slots, immediates, branch targets, switch tables
//! - [`OperandType`] - Operand layout of an opcode, as listed in [`OPCODES`]
//! - [`ConstantOperand`] - Constant pool entry kinds an opcode may reference
//!
//! # Main Functions
//! - [`decode_instruction`] - Decode a single instruction
//! - [`decode_code`] - Decode and validate a complete code array
//!
//! # Example
//! ```rust
//! use classscope::disassembler::decode_code;
//!
//! let code = [0x2A, 0xB7, 0x00, 0x01, 0xB1]; // aload_0, invokespecial #1, return
//! let instructions = decode_code(&code)?;
//! for instruction in &instructions {
//!     println!("{}: {}", instruction.offset, instruction.mnemonic);
//! }
//! # Ok::<(), classscope::Error>(())
//! ```

mod decoder;
mod instruction;
mod opcodes;
mod visitedmap;

pub use decoder::{decode_code, decode_instruction};
pub use instruction::{
    array_type_name, ConstantOperand, Instruction, OpcodeInfo, Operand, OperandType,
};
pub use opcodes::{constant_operand, opcode_info, OPCODES, OPCODE_COUNT};
