//! The `Module` attribute of `module-info.class` (JVMS §4.7.25).

use crate::{
    classfile::{
        constantpool::ConstantPool,
        flags::{ExportsFlags, ModuleFlags, RequiresFlags},
    },
    file::parser::Parser,
    Result,
};

/// A module declaration with all names resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleAttribute {
    /// Module name
    pub name: String,
    /// Module flags
    pub flags: ModuleFlags,
    /// Module version, if recorded
    pub version: Option<String>,
    /// `requires` directives
    pub requires: Vec<Requires>,
    /// `exports` directives
    pub exports: Vec<Exports>,
    /// `opens` directives
    pub opens: Vec<Exports>,
    /// Service interfaces this module uses
    pub uses: Vec<String>,
    /// `provides` directives
    pub provides: Vec<Provides>,
}

/// A `requires` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requires {
    /// Required module
    pub module: String,
    /// Directive flags
    pub flags: RequiresFlags,
    /// Version of the required module at compile time
    pub version: Option<String>,
}

/// An `exports` or `opens` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exports {
    /// Exported or opened package, in internal form
    pub package: String,
    /// Directive flags
    pub flags: ExportsFlags,
    /// Target modules; empty when unqualified
    pub to: Vec<String>,
}

/// A `provides` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provides {
    /// Service interface
    pub service: String,
    /// Implementation classes
    pub with: Vec<String>,
}

pub(crate) fn parse_module(parser: &mut Parser, pool: &ConstantPool) -> Result<ModuleAttribute> {
    let name = pool.module_name(parser.read_u2()?)?.to_string();
    let flags = ModuleFlags::from_bits_retain(parser.read_u2()?);
    let version = optional_string(parser, pool)?;

    let count = parser.read_u2()?;
    let mut requires = Vec::with_capacity(count as usize);
    for _ in 0..count {
        requires.push(Requires {
            module: pool.module_name(parser.read_u2()?)?.to_string(),
            flags: RequiresFlags::from_bits_retain(parser.read_u2()?),
            version: optional_string(parser, pool)?,
        });
    }

    let exports = parse_exports(parser, pool)?;
    let opens = parse_exports(parser, pool)?;

    let count = parser.read_u2()?;
    let mut uses = Vec::with_capacity(count as usize);
    for _ in 0..count {
        uses.push(pool.class_name(parser.read_u2()?)?.to_string());
    }

    let count = parser.read_u2()?;
    let mut provides = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let service = pool.class_name(parser.read_u2()?)?.to_string();
        let with_count = parser.read_u2()?;
        let mut with = Vec::with_capacity(with_count as usize);
        for _ in 0..with_count {
            with.push(pool.class_name(parser.read_u2()?)?.to_string());
        }
        provides.push(Provides { service, with });
    }

    Ok(ModuleAttribute {
        name,
        flags,
        version,
        requires,
        exports,
        opens,
        uses,
        provides,
    })
}

fn optional_string(parser: &mut Parser, pool: &ConstantPool) -> Result<Option<String>> {
    Ok(pool.optional_utf8(parser.read_u2()?)?.map(ToString::to_string))
}

fn parse_exports(parser: &mut Parser, pool: &ConstantPool) -> Result<Vec<Exports>> {
    let count = parser.read_u2()?;
    let mut exports = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let package = pool.package_name(parser.read_u2()?)?.to_string();
        let flags = ExportsFlags::from_bits_retain(parser.read_u2()?);
        let to_count = parser.read_u2()?;
        let mut to = Vec::with_capacity(to_count as usize);
        for _ in 0..to_count {
            to.push(pool.module_name(parser.read_u2()?)?.to_string());
        }
        exports.push(Exports { package, flags, to });
    }
    Ok(exports)
}
