//! Opcode table for the JVM instruction set (JVMS §6.5).
//!
//! Opcodes `0x00` to `0xC9` are defined. Everything above, including the reserved
//! `breakpoint`, `impdep1` and `impdep2`, must not appear in a class file and is rejected by the
//! decoder.

use crate::disassembler::instruction::{ConstantOperand, OpcodeInfo, OperandType};

/// Number of defined opcodes; valid opcodes are `0..OPCODE_COUNT`.
pub const OPCODE_COUNT: usize = 0xCA;

/// `wide` prefix
pub const WIDE: u8 = 0xC4;

const fn op(mnemonic: &'static str, operands: OperandType) -> OpcodeInfo {
    OpcodeInfo { mnemonic, operands }
}

/// Operand layout of every defined opcode, indexed by opcode.
pub static OPCODES: [OpcodeInfo; OPCODE_COUNT] = [
    /* 0x00 */ op("nop", OperandType::None),
    /* 0x01 */ op("aconst_null", OperandType::None),
    /* 0x02 */ op("iconst_m1", OperandType::None),
    /* 0x03 */ op("iconst_0", OperandType::None),
    /* 0x04 */ op("iconst_1", OperandType::None),
    /* 0x05 */ op("iconst_2", OperandType::None),
    /* 0x06 */ op("iconst_3", OperandType::None),
    /* 0x07 */ op("iconst_4", OperandType::None),
    /* 0x08 */ op("iconst_5", OperandType::None),
    /* 0x09 */ op("lconst_0", OperandType::None),
    /* 0x0A */ op("lconst_1", OperandType::None),
    /* 0x0B */ op("fconst_0", OperandType::None),
    /* 0x0C */ op("fconst_1", OperandType::None),
    /* 0x0D */ op("fconst_2", OperandType::None),
    /* 0x0E */ op("dconst_0", OperandType::None),
    /* 0x0F */ op("dconst_1", OperandType::None),
    /* 0x10 */ op("bipush", OperandType::Byte),
    /* 0x11 */ op("sipush", OperandType::Short),
    /* 0x12 */ op("ldc", OperandType::ConstantU1),
    /* 0x13 */ op("ldc_w", OperandType::ConstantU2),
    /* 0x14 */ op("ldc2_w", OperandType::ConstantU2),
    /* 0x15 */ op("iload", OperandType::Local),
    /* 0x16 */ op("lload", OperandType::Local),
    /* 0x17 */ op("fload", OperandType::Local),
    /* 0x18 */ op("dload", OperandType::Local),
    /* 0x19 */ op("aload", OperandType::Local),
    /* 0x1A */ op("iload_0", OperandType::None),
    /* 0x1B */ op("iload_1", OperandType::None),
    /* 0x1C */ op("iload_2", OperandType::None),
    /* 0x1D */ op("iload_3", OperandType::None),
    /* 0x1E */ op("lload_0", OperandType::None),
    /* 0x1F */ op("lload_1", OperandType::None),
    /* 0x20 */ op("lload_2", OperandType::None),
    /* 0x21 */ op("lload_3", OperandType::None),
    /* 0x22 */ op("fload_0", OperandType::None),
    /* 0x23 */ op("fload_1", OperandType::None),
    /* 0x24 */ op("fload_2", OperandType::None),
    /* 0x25 */ op("fload_3", OperandType::None),
    /* 0x26 */ op("dload_0", OperandType::None),
    /* 0x27 */ op("dload_1", OperandType::None),
    /* 0x28 */ op("dload_2", OperandType::None),
    /* 0x29 */ op("dload_3", OperandType::None),
    /* 0x2A */ op("aload_0", OperandType::None),
    /* 0x2B */ op("aload_1", OperandType::None),
    /* 0x2C */ op("aload_2", OperandType::None),
    /* 0x2D */ op("aload_3", OperandType::None),
    /* 0x2E */ op("iaload", OperandType::None),
    /* 0x2F */ op("laload", OperandType::None),
    /* 0x30 */ op("faload", OperandType::None),
    /* 0x31 */ op("daload", OperandType::None),
    /* 0x32 */ op("aaload", OperandType::None),
    /* 0x33 */ op("baload", OperandType::None),
    /* 0x34 */ op("caload", OperandType::None),
    /* 0x35 */ op("saload", OperandType::None),
    /* 0x36 */ op("istore", OperandType::Local),
    /* 0x37 */ op("lstore", OperandType::Local),
    /* 0x38 */ op("fstore", OperandType::Local),
    /* 0x39 */ op("dstore", OperandType::Local),
    /* 0x3A */ op("astore", OperandType::Local),
    /* 0x3B */ op("istore_0", OperandType::None),
    /* 0x3C */ op("istore_1", OperandType::None),
    /* 0x3D */ op("istore_2", OperandType::None),
    /* 0x3E */ op("istore_3", OperandType::None),
    /* 0x3F */ op("lstore_0", OperandType::None),
    /* 0x40 */ op("lstore_1", OperandType::None),
    /* 0x41 */ op("lstore_2", OperandType::None),
    /* 0x42 */ op("lstore_3", OperandType::None),
    /* 0x43 */ op("fstore_0", OperandType::None),
    /* 0x44 */ op("fstore_1", OperandType::None),
    /* 0x45 */ op("fstore_2", OperandType::None),
    /* 0x46 */ op("fstore_3", OperandType::None),
    /* 0x47 */ op("dstore_0", OperandType::None),
    /* 0x48 */ op("dstore_1", OperandType::None),
    /* 0x49 */ op("dstore_2", OperandType::None),
    /* 0x4A */ op("dstore_3", OperandType::None),
    /* 0x4B */ op("astore_0", OperandType::None),
    /* 0x4C */ op("astore_1", OperandType::None),
    /* 0x4D */ op("astore_2", OperandType::None),
    /* 0x4E */ op("astore_3", OperandType::None),
    /* 0x4F */ op("iastore", OperandType::None),
    /* 0x50 */ op("lastore", OperandType::None),
    /* 0x51 */ op("fastore", OperandType::None),
    /* 0x52 */ op("dastore", OperandType::None),
    /* 0x53 */ op("aastore", OperandType::None),
    /* 0x54 */ op("bastore", OperandType::None),
    /* 0x55 */ op("castore", OperandType::None),
    /* 0x56 */ op("sastore", OperandType::None),
    /* 0x57 */ op("pop", OperandType::None),
    /* 0x58 */ op("pop2", OperandType::None),
    /* 0x59 */ op("dup", OperandType::None),
    /* 0x5A */ op("dup_x1", OperandType::None),
    /* 0x5B */ op("dup_x2", OperandType::None),
    /* 0x5C */ op("dup2", OperandType::None),
    /* 0x5D */ op("dup2_x1", OperandType::None),
    /* 0x5E */ op("dup2_x2", OperandType::None),
    /* 0x5F */ op("swap", OperandType::None),
    /* 0x60 */ op("iadd", OperandType::None),
    /* 0x61 */ op("ladd", OperandType::None),
    /* 0x62 */ op("fadd", OperandType::None),
    /* 0x63 */ op("dadd", OperandType::None),
    /* 0x64 */ op("isub", OperandType::None),
    /* 0x65 */ op("lsub", OperandType::None),
    /* 0x66 */ op("fsub", OperandType::None),
    /* 0x67 */ op("dsub", OperandType::None),
    /* 0x68 */ op("imul", OperandType::None),
    /* 0x69 */ op("lmul", OperandType::None),
    /* 0x6A */ op("fmul", OperandType::None),
    /* 0x6B */ op("dmul", OperandType::None),
    /* 0x6C */ op("idiv", OperandType::None),
    /* 0x6D */ op("ldiv", OperandType::None),
    /* 0x6E */ op("fdiv", OperandType::None),
    /* 0x6F */ op("ddiv", OperandType::None),
    /* 0x70 */ op("irem", OperandType::None),
    /* 0x71 */ op("lrem", OperandType::None),
    /* 0x72 */ op("frem", OperandType::None),
    /* 0x73 */ op("drem", OperandType::None),
    /* 0x74 */ op("ineg", OperandType::None),
    /* 0x75 */ op("lneg", OperandType::None),
    /* 0x76 */ op("fneg", OperandType::None),
    /* 0x77 */ op("dneg", OperandType::None),
    /* 0x78 */ op("ishl", OperandType::None),
    /* 0x79 */ op("lshl", OperandType::None),
    /* 0x7A */ op("ishr", OperandType::None),
    /* 0x7B */ op("lshr", OperandType::None),
    /* 0x7C */ op("iushr", OperandType::None),
    /* 0x7D */ op("lushr", OperandType::None),
    /* 0x7E */ op("iand", OperandType::None),
    /* 0x7F */ op("land", OperandType::None),
    /* 0x80 */ op("ior", OperandType::None),
    /* 0x81 */ op("lor", OperandType::None),
    /* 0x82 */ op("ixor", OperandType::None),
    /* 0x83 */ op("lxor", OperandType::None),
    /* 0x84 */ op("iinc", OperandType::Increment),
    /* 0x85 */ op("i2l", OperandType::None),
    /* 0x86 */ op("i2f", OperandType::None),
    /* 0x87 */ op("i2d", OperandType::None),
    /* 0x88 */ op("l2i", OperandType::None),
    /* 0x89 */ op("l2f", OperandType::None),
    /* 0x8A */ op("l2d", OperandType::None),
    /* 0x8B */ op("f2i", OperandType::None),
    /* 0x8C */ op("f2l", OperandType::None),
    /* 0x8D */ op("f2d", OperandType::None),
    /* 0x8E */ op("d2i", OperandType::None),
    /* 0x8F */ op("d2l", OperandType::None),
    /* 0x90 */ op("d2f", OperandType::None),
    /* 0x91 */ op("i2b", OperandType::None),
    /* 0x92 */ op("i2c", OperandType::None),
    /* 0x93 */ op("i2s", OperandType::None),
    /* 0x94 */ op("lcmp", OperandType::None),
    /* 0x95 */ op("fcmpl", OperandType::None),
    /* 0x96 */ op("fcmpg", OperandType::None),
    /* 0x97 */ op("dcmpl", OperandType::None),
    /* 0x98 */ op("dcmpg", OperandType::None),
    /* 0x99 */ op("ifeq", OperandType::Branch),
    /* 0x9A */ op("ifne", OperandType::Branch),
    /* 0x9B */ op("iflt", OperandType::Branch),
    /* 0x9C */ op("ifge", OperandType::Branch),
    /* 0x9D */ op("ifgt", OperandType::Branch),
    /* 0x9E */ op("ifle", OperandType::Branch),
    /* 0x9F */ op("if_icmpeq", OperandType::Branch),
    /* 0xA0 */ op("if_icmpne", OperandType::Branch),
    /* 0xA1 */ op("if_icmplt", OperandType::Branch),
    /* 0xA2 */ op("if_icmpge", OperandType::Branch),
    /* 0xA3 */ op("if_icmpgt", OperandType::Branch),
    /* 0xA4 */ op("if_icmple", OperandType::Branch),
    /* 0xA5 */ op("if_acmpeq", OperandType::Branch),
    /* 0xA6 */ op("if_acmpne", OperandType::Branch),
    /* 0xA7 */ op("goto", OperandType::Branch),
    /* 0xA8 */ op("jsr", OperandType::Branch),
    /* 0xA9 */ op("ret", OperandType::Local),
    /* 0xAA */ op("tableswitch", OperandType::TableSwitch),
    /* 0xAB */ op("lookupswitch", OperandType::LookupSwitch),
    /* 0xAC */ op("ireturn", OperandType::None),
    /* 0xAD */ op("lreturn", OperandType::None),
    /* 0xAE */ op("freturn", OperandType::None),
    /* 0xAF */ op("dreturn", OperandType::None),
    /* 0xB0 */ op("areturn", OperandType::None),
    /* 0xB1 */ op("return", OperandType::None),
    /* 0xB2 */ op("getstatic", OperandType::ConstantU2),
    /* 0xB3 */ op("putstatic", OperandType::ConstantU2),
    /* 0xB4 */ op("getfield", OperandType::ConstantU2),
    /* 0xB5 */ op("putfield", OperandType::ConstantU2),
    /* 0xB6 */ op("invokevirtual", OperandType::ConstantU2),
    /* 0xB7 */ op("invokespecial", OperandType::ConstantU2),
    /* 0xB8 */ op("invokestatic", OperandType::ConstantU2),
    /* 0xB9 */ op("invokeinterface", OperandType::InvokeInterface),
    /* 0xBA */ op("invokedynamic", OperandType::InvokeDynamic),
    /* 0xBB */ op("new", OperandType::ConstantU2),
    /* 0xBC */ op("newarray", OperandType::ArrayType),
    /* 0xBD */ op("anewarray", OperandType::ConstantU2),
    /* 0xBE */ op("arraylength", OperandType::None),
    /* 0xBF */ op("athrow", OperandType::None),
    /* 0xC0 */ op("checkcast", OperandType::ConstantU2),
    /* 0xC1 */ op("instanceof", OperandType::ConstantU2),
    /* 0xC2 */ op("monitorenter", OperandType::None),
    /* 0xC3 */ op("monitorexit", OperandType::None),
    /* 0xC4 */ op("wide", OperandType::Wide),
    /* 0xC5 */ op("multianewarray", OperandType::MultiANewArray),
    /* 0xC6 */ op("ifnull", OperandType::Branch),
    /* 0xC7 */ op("ifnonnull", OperandType::Branch),
    /* 0xC8 */ op("goto_w", OperandType::BranchWide),
    /* 0xC9 */ op("jsr_w", OperandType::BranchWide),
];

/// Look up the description of `opcode`, `None` if it is not a defined instruction.
#[must_use]
pub fn opcode_info(opcode: u8) -> Option<&'static OpcodeInfo> {
    OPCODES.get(opcode as usize)
}

/// Kind of constant pool entry referenced by `opcode`, `None` for opcodes without a
/// constant pool operand.
#[must_use]
pub fn constant_operand(opcode: u8) -> Option<ConstantOperand> {
    let kind = match opcode {
        0x12 | 0x13 => ConstantOperand::Loadable,
        0x14 => ConstantOperand::WideLoadable,
        0xB2..=0xB5 => ConstantOperand::Field,
        0xB6..=0xB8 => ConstantOperand::Method,
        0xB9 => ConstantOperand::InterfaceMethod,
        0xBA => ConstantOperand::CallSite,
        0xBB | 0xBD | 0xC0 | 0xC1 | 0xC5 => ConstantOperand::Class,
        _ => return None,
    };
    Some(kind)
}
