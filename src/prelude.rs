//! # classscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types from the
//! classscope library. Import this module to get quick access to the essential types for
//! class file inspection.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all classscope operations
pub use crate::Error;

/// The result type used throughout classscope
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Disassembly entry points
pub use crate::{
    disassemble, disassemble_all, disassemble_path, disassemble_reader, disassemble_with,
};

/// Listing output and its configuration
pub use crate::{DisassemblyConfig, Printer};

/// Low-level file parsing utilities
pub use crate::{File, Parser};

// ================================================================================================
// Class Model
// ================================================================================================

/// The parsed class and its constant pool
pub use crate::classfile::{
    constantpool::{ConstantPool, ConstantPoolEntry, ReferenceKind},
    ClassFile,
};

/// Fields and methods
pub use crate::classfile::member::{FieldInfo, MethodInfo};

/// Access flags
pub use crate::classfile::flags::{
    ClassAccessFlags, ExportsFlags, FieldAccessFlags, InnerClassAccessFlags, MethodAccessFlags,
    ModuleFlags, ParameterAccessFlags, RequiresFlags,
};

/// Descriptors
pub use crate::classfile::descriptor::{FieldType, MethodDescriptor};

/// Attributes
pub use crate::classfile::attributes::{
    annotations::{Annotation, ElementValue, TypeAnnotation},
    code::{CodeAttribute, ExceptionHandler},
    module::ModuleAttribute,
    stackmap::{StackMapFrame, VerificationType},
    Attribute, AttributeKind, BootstrapMethod, InnerClass, RecordComponent,
};

// ================================================================================================
// Bytecode
// ================================================================================================

/// Decoded instructions
pub use crate::disassembler::{decode_code, decode_instruction, Instruction, Operand};
