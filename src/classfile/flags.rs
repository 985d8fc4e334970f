//! Access and property flags for classes, members, parameters and modules.
//!
//! The class file format reuses bit positions with different meanings depending on where the
//! flags appear (`0x0020` is `ACC_SUPER` on a class, `ACC_SYNCHRONIZED` on a method and
//! `ACC_OPEN` on a module), so each location gets its own flag type. All types are created with
//! `from_bits_retain`, which keeps bits the format does not define; [`describe`] renders those
//! as raw hex next to the recognised names.

use bitflags::{bitflags, Flags};

bitflags! {
    /// `access_flags` of a `ClassFile`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClassAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const MODULE = 0x8000;
    }
}

bitflags! {
    /// `access_flags` of a `field_info`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const VOLATILE = 0x0040;
        const TRANSIENT = 0x0080;
        const SYNTHETIC = 0x1000;
        const ENUM = 0x4000;
    }
}

bitflags! {
    /// `access_flags` of a `method_info`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const BRIDGE = 0x0040;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
    }
}

bitflags! {
    /// `inner_class_access_flags` of an `InnerClasses` entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InnerClassAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
    }
}

bitflags! {
    /// `access_flags` of a `MethodParameters` entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParameterAccessFlags: u16 {
        const FINAL = 0x0010;
        const SYNTHETIC = 0x1000;
        const MANDATED = 0x8000;
    }
}

bitflags! {
    /// `module_flags` of a `Module` attribute.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModuleFlags: u16 {
        const OPEN = 0x0020;
        const SYNTHETIC = 0x1000;
        const MANDATED = 0x8000;
    }
}

bitflags! {
    /// `requires_flags` of a module dependency.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RequiresFlags: u16 {
        const TRANSITIVE = 0x0020;
        const STATIC_PHASE = 0x0040;
        const SYNTHETIC = 0x1000;
        const MANDATED = 0x8000;
    }
}

bitflags! {
    /// `exports_flags` / `opens_flags` of a module package entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ExportsFlags: u16 {
        const SYNTHETIC = 0x1000;
        const MANDATED = 0x8000;
    }
}

/// Render flags as `(0x0021) ACC_PUBLIC, ACC_SUPER`.
///
/// Bits without a name are appended as a single hex value, so the raw value can always be
/// reconstructed from the output.
pub fn describe<F>(flags: &F) -> String
where
    F: Flags<Bits = u16>,
{
    let raw = flags.bits();
    let mut parts: Vec<String> = flags
        .iter_names()
        .map(|(name, _)| format!("ACC_{name}"))
        .collect();

    let unknown = raw & !F::all().bits();
    if unknown != 0 {
        parts.push(format!("{unknown:#06x}"));
    }

    if parts.is_empty() {
        format!("({raw:#06x})")
    } else {
        format!("({raw:#06x}) {}", parts.join(", "))
    }
}

fn visibility(public: bool, private: bool, protected: bool) -> Option<&'static str> {
    if public {
        Some("public")
    } else if private {
        Some("private")
    } else if protected {
        Some("protected")
    } else {
        None
    }
}

impl ClassAccessFlags {
    /// Source-level modifiers, excluding the kind keyword (`class`, `interface`, ...).
    #[must_use]
    pub fn modifiers(&self) -> Vec<&'static str> {
        let mut modifiers = Vec::new();
        if self.contains(Self::PUBLIC) {
            modifiers.push("public");
        }
        // Interfaces are implicitly abstract
        if self.contains(Self::ABSTRACT) && !self.contains(Self::INTERFACE) {
            modifiers.push("abstract");
        }
        if self.contains(Self::FINAL) {
            modifiers.push("final");
        }
        modifiers
    }
}

impl FieldAccessFlags {
    /// Source-level modifiers in canonical order.
    #[must_use]
    pub fn modifiers(&self) -> Vec<&'static str> {
        let mut modifiers: Vec<&'static str> = visibility(
            self.contains(Self::PUBLIC),
            self.contains(Self::PRIVATE),
            self.contains(Self::PROTECTED),
        )
        .into_iter()
        .collect();

        for (flag, keyword) in [
            (Self::STATIC, "static"),
            (Self::FINAL, "final"),
            (Self::TRANSIENT, "transient"),
            (Self::VOLATILE, "volatile"),
        ] {
            if self.contains(flag) {
                modifiers.push(keyword);
            }
        }
        modifiers
    }
}

impl MethodAccessFlags {
    /// Source-level modifiers in canonical order.
    #[must_use]
    pub fn modifiers(&self) -> Vec<&'static str> {
        let mut modifiers: Vec<&'static str> = visibility(
            self.contains(Self::PUBLIC),
            self.contains(Self::PRIVATE),
            self.contains(Self::PROTECTED),
        )
        .into_iter()
        .collect();

        for (flag, keyword) in [
            (Self::ABSTRACT, "abstract"),
            (Self::STATIC, "static"),
            (Self::FINAL, "final"),
            (Self::SYNCHRONIZED, "synchronized"),
            (Self::NATIVE, "native"),
            (Self::STRICT, "strictfp"),
        ] {
            if self.contains(flag) {
                modifiers.push(keyword);
            }
        }
        modifiers
    }
}
