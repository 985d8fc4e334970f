//! Shared test support: a byte-level class file builder plus conveniences that turn the
//! built bytes into crate types.


pub use builder::*;

use crate::{classfile::constantpool::ConstantPool, file::parser::Parser, ClassFile};

impl PoolBuilder {
    /// Parse the built pool.
    pub fn build(&self) -> ConstantPool {
        let data = self.bytes();
        ConstantPool::parse(&mut Parser::new(&data)).expect("builder produced an invalid pool")
    }
}

impl ClassBuilder {
    /// Parse the built class.
    pub fn parse(&self) -> ClassFile {
        ClassFile::parse(&self.build()).expect("builder produced an invalid class")
    }
}
