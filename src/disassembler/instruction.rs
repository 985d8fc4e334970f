//! Decoded bytecode instructions and their operands.

use crate::classfile::constantpool::ConstantPoolEntry;

/// Shape of the operand bytes that follow an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandType {
    /// No operands
    None,
    /// Signed byte immediate (`bipush`)
    Byte,
    /// Signed 16-bit immediate (`sipush`)
    Short,
    /// One byte constant pool index (`ldc`)
    ConstantU1,
    /// Two byte constant pool index
    ConstantU2,
    /// Local variable slot, widened to two bytes by `wide`
    Local,
    /// Local slot plus signed increment (`iinc`)
    Increment,
    /// Signed 16-bit branch offset
    Branch,
    /// Signed 32-bit branch offset (`goto_w`, `jsr_w`)
    BranchWide,
    /// Primitive array type code (`newarray`)
    ArrayType,
    /// Interface method index, argument count and a zero byte
    InvokeInterface,
    /// Call site index followed by two zero bytes
    InvokeDynamic,
    /// Class index and dimension count (`multianewarray`)
    MultiANewArray,
    /// Padded jump table
    TableSwitch,
    /// Padded match/offset pairs
    LookupSwitch,
    /// Prefix that widens the following instruction
    Wide,
}

/// Constant pool entry kinds an instruction operand may reference (JVMS §6.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantOperand {
    /// `CONSTANT_Class` (`new`, `checkcast`, `instanceof`, `anewarray`, `multianewarray`)
    Class,
    /// `CONSTANT_Fieldref` (`getfield`, `putfield`, `getstatic`, `putstatic`)
    Field,
    /// `CONSTANT_Methodref` or `CONSTANT_InterfaceMethodref`
    Method,
    /// `CONSTANT_InterfaceMethodref` (`invokeinterface`)
    InterfaceMethod,
    /// `CONSTANT_InvokeDynamic` (`invokedynamic`)
    CallSite,
    /// Single-slot loadable constant (`ldc`, `ldc_w`)
    Loadable,
    /// Two-slot loadable constant (`ldc2_w`)
    WideLoadable,
}

impl ConstantOperand {
    /// Whether `entry` may be referenced by an operand of this kind.
    #[must_use]
    pub fn accepts(self, entry: &ConstantPoolEntry) -> bool {
        use ConstantPoolEntry as Entry;

        match self {
            ConstantOperand::Class => matches!(entry, Entry::Class { .. }),
            ConstantOperand::Field => matches!(entry, Entry::FieldRef { .. }),
            ConstantOperand::Method => {
                matches!(entry, Entry::MethodRef { .. } | Entry::InterfaceMethodRef { .. })
            }
            ConstantOperand::InterfaceMethod => matches!(entry, Entry::InterfaceMethodRef { .. }),
            ConstantOperand::CallSite => matches!(entry, Entry::InvokeDynamic { .. }),
            ConstantOperand::Loadable => matches!(
                entry,
                Entry::Integer(_)
                    | Entry::Float(_)
                    | Entry::String { .. }
                    | Entry::Class { .. }
                    | Entry::MethodType { .. }
                    | Entry::MethodHandle { .. }
                    | Entry::Dynamic { .. }
            ),
            ConstantOperand::WideLoadable => {
                matches!(entry, Entry::Long(_) | Entry::Double(_) | Entry::Dynamic { .. })
            }
        }
    }

    /// Description of the accepted entry kinds, as used in error messages.
    #[must_use]
    pub fn expected(self) -> &'static str {
        match self {
            ConstantOperand::Class => "Class",
            ConstantOperand::Field => "FieldRef",
            ConstantOperand::Method => "MethodRef or InterfaceMethodRef",
            ConstantOperand::InterfaceMethod => "InterfaceMethodRef",
            ConstantOperand::CallSite => "InvokeDynamic",
            ConstantOperand::Loadable => "a loadable single-slot constant",
            ConstantOperand::WideLoadable => "Long, Double or Dynamic",
        }
    }
}

/// Static description of one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    /// Mnemonic as written in the JVM specification
    pub mnemonic: &'static str,
    /// Operand layout
    pub operands: OperandType,
}

/// One decoded operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Constant pool index, resolved when rendering
    Constant(u16),
    /// Local variable slot
    Local(u16),
    /// Immediate integer (push value, increment, dimension or argument count)
    Immediate(i32),
    /// `newarray` element type code
    ArrayType(u8),
    /// Absolute branch target within the code array
    Branch(u32),
    /// Switch table with absolute targets
    Switch {
        /// Target when no case matches
        default: u32,
        /// `(match value, target)` in table order
        cases: Vec<(i32, u32)>,
    },
}

/// A single decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Offset from the start of the code array
    pub offset: u32,
    /// The opcode, after a `wide` prefix the widened one
    pub opcode: u8,
    /// Mnemonic of `opcode`
    pub mnemonic: &'static str,
    /// Set if the instruction carried a `wide` prefix
    pub wide: bool,
    /// Total size in bytes, including prefix and padding
    pub size: u32,
    /// Operands in encoding order
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// All branch targets of this instruction, including switch defaults.
    #[must_use]
    pub fn branch_targets(&self) -> Vec<u32> {
        let mut targets = Vec::new();
        for operand in &self.operands {
            match operand {
                Operand::Branch(target) => targets.push(*target),
                Operand::Switch { default, cases } => {
                    targets.push(*default);
                    targets.extend(cases.iter().map(|(_, target)| *target));
                }
                _ => {}
            }
        }
        targets
    }

    /// Offset of the instruction that follows this one.
    #[must_use]
    pub fn next_offset(&self) -> u32 {
        self.offset + self.size
    }
}

/// Name of a `newarray` element type code.
#[must_use]
pub fn array_type_name(code: u8) -> Option<&'static str> {
    match code {
        4 => Some("boolean"),
        5 => Some("char"),
        6 => Some("float"),
        7 => Some("double"),
        8 => Some("byte"),
        9 => Some("short"),
        10 => Some("int"),
        11 => Some("long"),
        _ => None,
    }
}
